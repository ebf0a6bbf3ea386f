use serde::Serialize;
use serde_json::Value;

use crate::spec::field::FieldId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIssue {
    pub field: Option<String>,
    pub path: String,
    pub message: String,
    pub code: String,
}

/// Findings about an answers document. Advisory only: export never consults it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    pub errors: Vec<CheckIssue>,
    pub unresolved_codes: Vec<CheckIssue>,
    pub unknown_fields: Vec<String>,
}

pub fn check(answers: &Value) -> CheckReport {
    let Some(answers_map) = answers.as_object() else {
        return CheckReport {
            valid: false,
            errors: vec![CheckIssue {
                field: None,
                path: "/".into(),
                message: "answers must be a JSON object".into(),
                code: "not_an_object".into(),
            }],
            unresolved_codes: Vec::new(),
            unknown_fields: Vec::new(),
        };
    };

    let mut errors = Vec::new();
    let mut unresolved_codes = Vec::new();

    for field in FieldId::ALL {
        let Some(value) = answers_map.get(field.key()) else {
            continue;
        };
        let Some(text) = value.as_str() else {
            errors.push(issue(field, "value must be a string", "type_mismatch"));
            continue;
        };
        if let Some(table) = field.table()
            && !text.is_empty()
            && !table.contains(text)
        {
            unresolved_codes.push(issue(
                field,
                &format!(
                    "'{}' is not one of: {}",
                    text,
                    table.codes().collect::<Vec<_>>().join(", ")
                ),
                "unknown_option",
            ));
        }
    }

    let unknown_fields: Vec<String> = answers_map
        .keys()
        .filter(|key| key.parse::<FieldId>().is_err())
        .cloned()
        .collect();

    CheckReport {
        valid: errors.is_empty() && unresolved_codes.is_empty() && unknown_fields.is_empty(),
        errors,
        unresolved_codes,
        unknown_fields,
    }
}

fn issue(field: FieldId, message: &str, code: &str) -> CheckIssue {
    CheckIssue {
        field: Some(field.key().to_string()),
        path: format!("/{}", field.key()),
        message: message.into(),
        code: code.into(),
    }
}
