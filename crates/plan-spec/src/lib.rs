#![allow(missing_docs)]

pub mod render;
pub mod spec;
pub mod state;
pub mod validate;

pub use render::{
    FORM_ID, FORM_TITLE, RenderAction, RenderField, RenderPayload, RenderStatus,
    build_render_payload, render_card, render_json_ui, render_text,
};
pub use spec::{
    Choice, ChoiceTable, EXAM_PERIODS, FieldId, FieldKind, FormField, SUBJECTS, SetField,
    TIME_PERIODS, UnknownField,
};
pub use state::{ExportSnapshot, FormState, format_date};
pub use validate::{CheckIssue, CheckReport, check};
