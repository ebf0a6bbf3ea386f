use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    block::{ImageFormat, ImageRun},
    error::AssetError,
};

/// Logo size in the generated document, in pixels.
pub const LOGO_SIZE: u32 = 120;

/// Source of static binary assets fetched at export time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch(&self, path: &Path) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from the local filesystem, relative to `root`.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for FsAssetSource {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait]
impl AssetSource for FsAssetSource {
    async fn fetch(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        let full_path = self.root.join(path);
        tracing::debug!(path = %full_path.display(), "fetching asset");
        tokio::fs::read(&full_path)
            .await
            .map_err(|source| AssetError::Read {
                path: full_path,
                source,
            })
    }
}

/// Fetches the logo and wraps it as a fixed-size image run.
pub async fn load_logo<A>(source: &A, path: &Path) -> Result<ImageRun, AssetError>
where
    A: AssetSource + ?Sized,
{
    let bytes = source.fetch(path).await?;
    if bytes.is_empty() {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    let format =
        ImageFormat::detect(&bytes).ok_or_else(|| AssetError::UnsupportedFormat(path.to_path_buf()))?;
    Ok(ImageRun {
        data: bytes.into(),
        format,
        width: LOGO_SIZE,
        height: LOGO_SIZE,
    })
}
