use std::path::PathBuf;

use plan_spec::ExportSnapshot;

use crate::{
    asset::{AssetSource, FsAssetSource, load_logo},
    assemble::assemble,
    block::PageLayout,
    docx::{DocumentWriter, DocxWriter},
    error::ExportError,
    filename::FileNamer,
    save::{DirectorySaveTarget, SaveTarget},
};

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub file_name: String,
    pub path: PathBuf,
    pub size: usize,
}

/// Runs the export pipeline: fetch logo, assemble, pack, name, save.
///
/// Each call is independent; the only shared state is read-only. A failure at
/// any step returns before anything is saved.
pub struct Exporter<A, W, S> {
    assets: A,
    writer: W,
    target: S,
    namer: FileNamer,
    logo_path: PathBuf,
    layout: PageLayout,
}

pub type FsExporter = Exporter<FsAssetSource, DocxWriter, DirectorySaveTarget>;

impl<A, W, S> Exporter<A, W, S>
where
    A: AssetSource,
    W: DocumentWriter,
    S: SaveTarget,
{
    pub fn new(assets: A, writer: W, target: S, logo_path: impl Into<PathBuf>) -> Self {
        Self {
            assets,
            writer,
            target,
            namer: FileNamer::default(),
            logo_path: logo_path.into(),
            layout: PageLayout::default(),
        }
    }

    pub fn with_file_namer(mut self, namer: FileNamer) -> Self {
        self.namer = namer;
        self
    }

    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub async fn export(&self, snapshot: &ExportSnapshot) -> Result<ExportOutcome, ExportError> {
        tracing::info!(
            student = snapshot.student_name(),
            date = %snapshot.generated_date(),
            "export started"
        );
        let result = self.run(snapshot).await;
        match &result {
            Ok(outcome) => tracing::info!(
                path = %outcome.path.display(),
                bytes = outcome.size,
                "export finished"
            ),
            Err(err) => tracing::warn!(error = %err, "export failed"),
        }
        result
    }

    async fn run(&self, snapshot: &ExportSnapshot) -> Result<ExportOutcome, ExportError> {
        let logo = load_logo(&self.assets, &self.logo_path).await?;
        let blocks = assemble(snapshot, logo);
        let bytes = self.writer.write(&blocks, &self.layout)?;
        let file_name = self
            .namer
            .file_name(snapshot.student_name(), snapshot.generated_date())?;
        let path = self.target.save(&bytes, &file_name)?;
        Ok(ExportOutcome {
            file_name,
            path,
            size: bytes.len(),
        })
    }
}
