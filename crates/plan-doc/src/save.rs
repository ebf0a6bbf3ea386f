use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::SaveError;

/// Destination for a finished document.
pub trait SaveTarget: Send + Sync {
    /// Stores `bytes` under `file_name` and returns where they ended up.
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf, SaveError>;
}

/// Saves documents into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf, SaveError> {
        fs::create_dir_all(&self.dir).map_err(|source| SaveError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).map_err(|source| SaveError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = DirectorySaveTarget::new(dir.path().join("a").join("b"));
        let path = target.save(b"doc", "plan.docx").expect("save");
        assert_eq!(fs::read(path).expect("read back"), b"doc");
    }
}
