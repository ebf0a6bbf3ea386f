use std::sync::LazyLock;

use chrono::NaiveDate;
use handlebars::Handlebars;
use plan_spec::format_date;
use regex::Regex;
use serde_json::json;

use crate::error::FileNameError;

pub const FILE_NAME_PREFIX: &str = "תכנית-לימודים-";
pub const DEFAULT_FILE_NAME_TEMPLATE: &str = "{{prefix}}{{student}}-{{date}}.docx";

const TEMPLATE_NAME: &str = "file_name";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F\x7F]"#).expect("valid pattern"));

/// Replaces characters that are not allowed in file names with `_`.
pub fn sanitize(component: &str) -> String {
    UNSAFE_CHARS.replace_all(component, "_").into_owned()
}

/// Renders export file names from a handlebars template.
///
/// Available variables: `prefix`, `student` and `date` (`D.M.YYYY`).
pub struct FileNamer {
    registry: Handlebars<'static>,
}

impl FileNamer {
    pub fn new(template: &str) -> Result<Self, FileNameError> {
        let mut registry = registry();
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(Box::new)?;
        Ok(Self { registry })
    }

    pub fn file_name(&self, student_name: &str, date: NaiveDate) -> Result<String, FileNameError> {
        let data = json!({
            "prefix": FILE_NAME_PREFIX,
            "student": student_name.trim(),
            "date": format_date(date),
        });
        let rendered = self
            .registry
            .render(TEMPLATE_NAME, &data)
            .map_err(Box::new)?;
        let name = sanitize(rendered.trim());
        if name.is_empty() || name == "." || name == ".." {
            return Err(FileNameError::Empty);
        }
        Ok(name)
    }
}

impl Default for FileNamer {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME_TEMPLATE).expect("built-in template parses")
    }
}

fn registry() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    registry.set_strict_mode(true);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn default_name_has_prefix_student_and_date() {
        let name = FileNamer::default().file_name("דנה", date()).unwrap();
        assert_eq!(name, "תכנית-לימודים-דנה-15.1.2025.docx");
        assert!(name.starts_with(FILE_NAME_PREFIX));
        assert!(!name.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|']));
    }

    #[test]
    fn default_matches_the_explicit_default_template() {
        let explicit = FileNamer::new(DEFAULT_FILE_NAME_TEMPLATE).unwrap();
        assert_eq!(
            FileNamer::default().file_name("רונית", date()).unwrap(),
            explicit.file_name("רונית", date()).unwrap()
        );
    }

    #[test]
    fn path_separators_in_student_name_are_replaced() {
        let name = FileNamer::default()
            .file_name("../דנה/כהן:א", date())
            .unwrap();
        assert_eq!(name, "תכנית-לימודים-.._דנה_כהן_א-15.1.2025.docx");
    }

    #[test]
    fn empty_student_name_still_yields_a_name() {
        let name = FileNamer::default().file_name("", date()).unwrap();
        assert_eq!(name, "תכנית-לימודים--15.1.2025.docx");
    }

    #[test]
    fn custom_templates_are_supported() {
        let namer = FileNamer::new("{{student}} ({{date}}).docx").unwrap();
        assert_eq!(
            namer.file_name("רונית", date()).unwrap(),
            "רונית (15.1.2025).docx"
        );
    }

    #[test]
    fn unknown_variables_fail_in_strict_mode() {
        let namer = FileNamer::new("{{teacher}}.docx").unwrap();
        assert!(matches!(
            namer.file_name("דנה", date()),
            Err(FileNameError::Render(_))
        ));
    }

    #[test]
    fn malformed_templates_are_rejected() {
        assert!(matches!(
            FileNamer::new("{{prefix"),
            Err(FileNameError::Template(_))
        ));
    }
}
