use plan_spec::{ExportSnapshot, FORM_TITLE, FieldId};

use crate::block::{
    Alignment, Border, BorderEdge, DocumentBlock, HeadingLevel, ImageRun, TextRun,
};

pub const DECORATIVE_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━";
pub const FOOTER: &str = "מסמך זה הופק באופן אוטומטי";
pub const VALUE_LABEL_SEPARATOR: &str = "  ";

const MUTED: &str = "666666";
const VALUE_COLOR: &str = "333333";
const RULE_COLOR: &str = "CCCCCC";
const TITLE_SIZE: u32 = 36;
const BODY_SIZE: u32 = 24;
const FOOTER_SIZE: u32 = 20;

/// Builds the full paragraph sequence for a snapshot.
///
/// Layout: logo, rule, title, rule, date, separator, the five field lines in
/// display order, separator, footer.
pub fn assemble(snapshot: &ExportSnapshot, logo: ImageRun) -> Vec<DocumentBlock> {
    let mut blocks = Vec::with_capacity(FieldId::ALL.len() + 8);
    blocks.extend(preamble(snapshot, logo));
    blocks.extend(FieldId::ALL.map(|field| field_line(field.label(), snapshot.resolved(field))));
    blocks.extend(closing());
    blocks
}

fn preamble(snapshot: &ExportSnapshot, logo: ImageRun) -> [DocumentBlock; 6] {
    [
        DocumentBlock::aligned(Alignment::Center)
            .spacing(0, 200)
            .push(logo),
        decorative_rule(200),
        DocumentBlock::aligned(Alignment::Center)
            .heading(HeadingLevel::Heading1)
            .bidirectional(false)
            .spacing(0, 200)
            .push(
                TextRun::new(FORM_TITLE)
                    .size(TITLE_SIZE)
                    .bold()
                    .color("000000")
                    .right_to_left(false),
            ),
        decorative_rule(400),
        DocumentBlock::aligned(Alignment::Right)
            .spacing(0, 200)
            .push(
                TextRun::new(snapshot.display_date())
                    .size(BODY_SIZE)
                    .color(MUTED),
            ),
        DocumentBlock::new().spacing(200, 200).border(Border {
            edge: BorderEdge::Top,
            size: 1,
            color: RULE_COLOR,
        }),
    ]
}

fn decorative_rule(after: u32) -> DocumentBlock {
    DocumentBlock::aligned(Alignment::Center)
        .spacing(0, after)
        .push(TextRun::new(DECORATIVE_RULE).color(MUTED))
}

/// Value first, then separator, colon and bold label.
pub fn field_line(label: &str, value: &str) -> DocumentBlock {
    DocumentBlock::aligned(Alignment::Right)
        .spacing(200, 100)
        .bidirectional(false)
        .indent_right(360)
        .push(
            TextRun::new(value)
                .size(BODY_SIZE)
                .right_to_left(false)
                .color(VALUE_COLOR),
        )
        .push(TextRun::new(VALUE_LABEL_SEPARATOR).size(BODY_SIZE))
        .push(TextRun::new(":").size(BODY_SIZE).bold().right_to_left(false))
        .push(TextRun::new(label).size(BODY_SIZE).bold().right_to_left(false))
}

fn closing() -> [DocumentBlock; 2] {
    [
        DocumentBlock::new().spacing(200, 400).border(Border {
            edge: BorderEdge::Bottom,
            size: 1,
            color: RULE_COLOR,
        }),
        DocumentBlock::aligned(Alignment::Center)
            .spacing(400, 0)
            .bidirectional(false)
            .push(
                TextRun::new(FOOTER)
                    .size(FOOTER_SIZE)
                    .color(MUTED)
                    .right_to_left(false),
            ),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use plan_spec::FormState;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::block::{ImageFormat, Inline};

    fn logo() -> ImageRun {
        ImageRun {
            data: Arc::from(&b"\x89PNG\r\n\x1a\nfake"[..]),
            format: ImageFormat::Png,
            width: 120,
            height: 120,
        }
    }

    fn snapshot(state: FormState) -> ExportSnapshot {
        state.snapshot(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap())
    }

    fn field_lines(blocks: &[DocumentBlock]) -> Vec<String> {
        blocks[6..11].iter().map(DocumentBlock::plain_text).collect()
    }

    #[test]
    fn scenario_lines_resolve_labels_in_fixed_order() {
        let state = FormState::new()
            .with_field(FieldId::TeacherName, "רונית")
            .with_field(FieldId::TimePeriod, "jan2025")
            .with_field(FieldId::Subject, "math")
            .with_field(FieldId::ExamDate, "winter2024")
            .with_field(FieldId::StudentName, "דנה");
        let blocks = assemble(&snapshot(state), logo());

        assert_eq!(blocks.len(), 13);
        assert_eq!(
            field_lines(&blocks),
            vec![
                "דנה  :שם התלמיד",
                "בגרות חורף 2024  :מועד בגרות",
                "מתמטיקה  :מקצוע",
                "ינואר 2025  :פרק הזמן",
                "רונית  :שם המורה",
            ]
        );
    }

    #[test]
    fn unknown_exam_code_falls_back_to_raw_value() {
        let state = FormState::new().with_field(FieldId::ExamDate, "unknown_code");
        let blocks = assemble(&snapshot(state), logo());
        assert_eq!(field_lines(&blocks)[1], "unknown_code  :מועד בגרות");
    }

    #[test]
    fn empty_form_keeps_labels_and_order() {
        let blocks = assemble(&snapshot(FormState::new()), logo());
        assert_eq!(
            field_lines(&blocks),
            vec![
                "  :שם התלמיד",
                "  :מועד בגרות",
                "  :מקצוע",
                "  :פרק הזמן",
                "  :שם המורה",
            ]
        );
    }

    #[test]
    fn preamble_and_closing_are_fixed() {
        let blocks = assemble(&snapshot(FormState::new()), logo());

        assert_eq!(blocks[0].images().count(), 1);
        assert_eq!(blocks[0].alignment, Some(Alignment::Center));
        assert_eq!(blocks[1].plain_text(), DECORATIVE_RULE);
        assert_eq!(blocks[2].plain_text(), FORM_TITLE);
        assert_eq!(blocks[2].heading, Some(HeadingLevel::Heading1));
        assert_eq!(blocks[3].spacing.after, 400);
        assert_eq!(blocks[4].plain_text(), "9.3.2025");
        assert_eq!(blocks[4].alignment, Some(Alignment::Right));
        assert_eq!(blocks[5].border.map(|border| border.edge), Some(BorderEdge::Top));
        assert_eq!(blocks[11].border.map(|border| border.edge), Some(BorderEdge::Bottom));
        assert_eq!(blocks[12].plain_text(), FOOTER);
    }

    #[test]
    fn field_line_puts_value_before_bold_label() {
        let block = field_line("מקצוע", "אומנות");
        let runs = block
            .inlines
            .iter()
            .map(|inline| match inline {
                Inline::Text(run) => (run.text.as_str(), run.bold),
                Inline::Image(_) => panic!("unexpected image"),
            })
            .collect::<Vec<_>>();
        assert_eq!(
            runs,
            vec![("אומנות", false), ("  ", false), (":", true), ("מקצוע", true)]
        );
        assert_eq!(block.indent_right, Some(360));
    }
}
