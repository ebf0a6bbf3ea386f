use serde_json::json;

use plan_spec::check;

#[test]
fn known_codes_pass() {
    let report = check(&json!({
        "studentName": "דנה",
        "examDate": "summer2024",
        "subject": "autocad",
        "timePeriod": "aug2025",
        "teacherName": ""
    }));
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn empty_values_are_not_reported() {
    let report = check(&json!({ "examDate": "", "subject": "" }));
    assert!(report.valid);
}

#[test]
fn unresolved_codes_and_unknown_fields_are_reported() {
    let report = check(&json!({
        "examDate": "unknown_code",
        "teacherName": 7,
        "date": "1.1.2025"
    }));
    assert!(!report.valid);
    assert_eq!(report.unresolved_codes.len(), 1);
    assert_eq!(report.unresolved_codes[0].path, "/examDate");
    assert_eq!(report.errors[0].code, "type_mismatch");
    assert_eq!(report.unknown_fields, vec!["date"]);
}

#[test]
fn non_object_answers_are_rejected() {
    let report = check(&json!(["studentName"]));
    assert!(!report.valid);
    assert_eq!(report.errors[0].code, "not_an_object");
}
