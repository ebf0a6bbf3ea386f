use std::sync::Arc;

use plan_spec::ExportSnapshot;

use crate::{
    asset::LOGO_SIZE,
    assemble::assemble,
    block::{Alignment, DocumentBlock, ImageFormat, ImageRun},
};

const PREVIEW_WIDTH: usize = 48;

/// Text preview of the document a snapshot would export to. Needs no assets.
pub fn preview(snapshot: &ExportSnapshot) -> String {
    let placeholder = ImageRun {
        data: Arc::from(Vec::new()),
        format: ImageFormat::Png,
        width: LOGO_SIZE,
        height: LOGO_SIZE,
    };
    render_preview(&assemble(snapshot, placeholder))
}

/// Plain-text rendering of an assembled block list, one line per block.
pub fn render_preview(blocks: &[DocumentBlock]) -> String {
    blocks
        .iter()
        .map(preview_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview_line(block: &DocumentBlock) -> String {
    if block.images().next().is_some() {
        return align("[logo]", block.alignment);
    }
    if block.border.is_some() {
        return "─".repeat(PREVIEW_WIDTH);
    }
    align(&block.plain_text(), block.alignment)
}

fn align(text: &str, alignment: Option<Alignment>) -> String {
    let width = text.chars().count();
    let padding = PREVIEW_WIDTH.saturating_sub(width);
    match alignment {
        Some(Alignment::Center) => format!("{}{}", " ".repeat(padding / 2), text),
        Some(Alignment::Right) => format!("{}{}", " ".repeat(padding), text),
        Some(Alignment::Left) | None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use plan_spec::{FieldId, FormState};

    use super::*;
    use crate::assemble::{FOOTER, field_line};

    #[test]
    fn field_lines_are_right_aligned() {
        let preview = render_preview(&[field_line("מקצוע", "אומנות")]);
        assert!(preview.ends_with("אומנות  :מקצוע"));
        assert_eq!(preview.chars().count(), PREVIEW_WIDTH);
    }

    #[test]
    fn snapshot_preview_has_logo_title_fields_and_footer() {
        let state = FormState::new().with_field(FieldId::Subject, "english");
        let text = preview(&state.snapshot(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0].trim(), "[logo]");
        assert_eq!(lines[2].trim(), plan_spec::FORM_TITLE);
        assert_eq!(lines[4].trim(), "31.12.2024");
        assert_eq!(lines[8].trim(), "אנגלית  :מקצוע");
        assert_eq!(lines[12].trim(), FOOTER);
    }
}
