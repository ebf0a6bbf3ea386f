pub mod field;
pub mod options;

pub use field::{FieldId, FieldKind, FormField, SetField, UnknownField};
pub use options::{Choice, ChoiceTable, EXAM_PERIODS, SUBJECTS, TIME_PERIODS};
