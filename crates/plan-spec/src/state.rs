use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::{FieldId, FormField, SetField};

/// Current values of the five form fields.
///
/// Single-choice fields hold option codes. Nothing is validated on update; an
/// empty string is a valid value for every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub student_name: String,
    pub exam_date: String,
    pub subject: String,
    pub time_period: String,
    pub teacher_name: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::StudentName => &self.student_name,
            FieldId::ExamDate => &self.exam_date,
            FieldId::Subject => &self.subject,
            FieldId::TimePeriod => &self.time_period,
            FieldId::TeacherName => &self.teacher_name,
        }
    }

    /// Returns a copy of the state with only `field` replaced.
    pub fn with_field(&self, field: FieldId, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            FieldId::StudentName => &mut next.student_name,
            FieldId::ExamDate => &mut next.exam_date,
            FieldId::Subject => &mut next.subject,
            FieldId::TimePeriod => &mut next.time_period,
            FieldId::TeacherName => &mut next.teacher_name,
        };
        *slot = value.into();
        next
    }

    pub fn apply(&self, command: SetField) -> Self {
        tracing::debug!(field = %command.field, "field updated");
        self.with_field(command.field, command.value)
    }

    /// All fields in display order, each able to produce its own update command.
    pub fn fields(&self) -> Vec<FormField<'_>> {
        FieldId::ALL
            .into_iter()
            .map(|id| FormField {
                id,
                label: id.label(),
                kind: id.kind(),
                current_value: self.value(id),
                options: id.table().map(|table| table.choices),
            })
            .collect()
    }

    /// Freezes the current values for export.
    pub fn snapshot(&self, generated_date: NaiveDate) -> ExportSnapshot {
        ExportSnapshot {
            student_name: self.student_name.clone(),
            exam_date: self.exam_date.clone(),
            subject: self.subject.clone(),
            time_period: self.time_period.clone(),
            teacher_name: self.teacher_name.clone(),
            generated_date,
        }
    }
}

/// Immutable copy of the form taken when an export starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    student_name: String,
    exam_date: String,
    subject: String,
    time_period: String,
    teacher_name: String,
    generated_date: NaiveDate,
}

impl ExportSnapshot {
    /// Raw stored value of `field`.
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::StudentName => &self.student_name,
            FieldId::ExamDate => &self.exam_date,
            FieldId::Subject => &self.subject,
            FieldId::TimePeriod => &self.time_period,
            FieldId::TeacherName => &self.teacher_name,
        }
    }

    /// Value of `field` with option codes resolved to labels.
    pub fn resolved(&self, field: FieldId) -> &str {
        field.display_value(self.value(field))
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn generated_date(&self) -> NaiveDate {
        self.generated_date
    }

    pub fn display_date(&self) -> String {
        format_date(self.generated_date)
    }
}

/// Short Hebrew-locale date, `D.M.YYYY` without zero padding.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d.%-m.%Y").to_string()
}
