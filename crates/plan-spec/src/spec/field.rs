use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::options::{Choice, ChoiceTable, EXAM_PERIODS, SUBJECTS, TIME_PERIODS};

/// Identifies one of the five form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    StudentName,
    ExamDate,
    Subject,
    TimePeriod,
    TeacherName,
}

impl FieldId {
    /// Display and export order.
    pub const ALL: [FieldId; 5] = [
        FieldId::StudentName,
        FieldId::ExamDate,
        FieldId::Subject,
        FieldId::TimePeriod,
        FieldId::TeacherName,
    ];

    /// Key used in answers files and render payloads.
    pub fn key(&self) -> &'static str {
        match self {
            FieldId::StudentName => "studentName",
            FieldId::ExamDate => "examDate",
            FieldId::Subject => "subject",
            FieldId::TimePeriod => "timePeriod",
            FieldId::TeacherName => "teacherName",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldId::StudentName => "שם התלמיד",
            FieldId::ExamDate => "מועד בגרות",
            FieldId::Subject => "מקצוע",
            FieldId::TimePeriod => "פרק הזמן",
            FieldId::TeacherName => "שם המורה",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self.table() {
            Some(_) => FieldKind::SingleChoice,
            None => FieldKind::FreeText,
        }
    }

    /// Option table for single-choice fields.
    pub fn table(&self) -> Option<&'static ChoiceTable> {
        match self {
            FieldId::ExamDate => Some(&EXAM_PERIODS),
            FieldId::Subject => Some(&SUBJECTS),
            FieldId::TimePeriod => Some(&TIME_PERIODS),
            FieldId::StudentName | FieldId::TeacherName => None,
        }
    }

    /// Maps a stored value to the text shown for it.
    pub fn display_value<'a>(&self, value: &'a str) -> &'a str {
        match self.table() {
            Some(table) => table.resolve(value),
            None => value,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}'; expected one of studentName, examDate, subject, timePeriod, teacherName")]
pub struct UnknownField(pub String);

impl FromStr for FieldId {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|id| id.key() == value.trim())
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

/// Input control used for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    FreeText,
    SingleChoice,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::FreeText => "free_text",
            FieldKind::SingleChoice => "single_choice",
        }
    }
}

/// Command replacing the value of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetField {
    pub field: FieldId,
    pub value: String,
}

impl SetField {
    pub fn new(field: FieldId, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Read-only view of one field, as handed to a rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField<'a> {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: FieldKind,
    pub current_value: &'a str,
    pub options: Option<&'static [Choice]>,
}

impl FormField<'_> {
    /// Change handler: builds the command that stores `value` in this field.
    pub fn on_change(&self, value: impl Into<String>) -> SetField {
        SetField::new(self.id, value)
    }

    pub fn display_value(&self) -> &str {
        self.id.display_value(self.current_value)
    }
}
