#![allow(missing_docs)]

pub mod assemble;
pub mod asset;
pub mod block;
pub mod docx;
pub mod error;
pub mod export;
pub mod filename;
pub mod preview;
pub mod save;

pub use assemble::{DECORATIVE_RULE, FOOTER, assemble, field_line};
pub use asset::{AssetSource, FsAssetSource, LOGO_SIZE, load_logo};
pub use block::{
    Alignment, Border, BorderEdge, DocumentBlock, HeadingLevel, ImageFormat, ImageRun, Inline,
    PageLayout, Spacing, TextRun,
};
pub use docx::{DocumentWriter, DocxWriter};
pub use error::{AssetError, ExportError, FileNameError, SaveError, WriteError};
pub use export::{ExportOutcome, Exporter, FsExporter};
pub use filename::{DEFAULT_FILE_NAME_TEMPLATE, FILE_NAME_PREFIX, FileNamer, sanitize};
pub use preview::{preview, render_preview};
pub use save::{DirectorySaveTarget, SaveTarget};
