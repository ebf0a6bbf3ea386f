use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("asset '{0}' is empty")]
    Empty(PathBuf),
    #[error("asset '{0}' is not a PNG or JPEG image")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write package part '{part}': {source}")]
    Part {
        part: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize package part '{part}': {message}")]
    Xml { part: String, message: String },
    #[error("zip packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to create output directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum FileNameError {
    #[error("invalid file name template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("failed to render file name: {0}")]
    Render(#[from] Box<handlebars::RenderError>),
    #[error("file name template produced an empty name")]
    Empty,
}

/// Why an export attempt produced no file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("logo could not be loaded: {0}")]
    Asset(#[from] AssetError),
    #[error("document could not be packed: {0}")]
    Write(#[from] WriteError),
    #[error("file name could not be built: {0}")]
    FileName(#[from] FileNameError),
    #[error("document could not be saved: {0}")]
    Save(#[from] SaveError),
}
