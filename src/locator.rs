// In: src/locator.rs

//! Resolves request filenames to files below a fixed data root.

use std::path::{Component, Path, PathBuf};

use crate::error::RowsError;

#[derive(Debug, Clone)]
pub struct StorageLocator {
    root: PathBuf,
}

impl StorageLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Joins `filename` onto the root.
    ///
    /// # Errors
    /// * `InvalidRequest` if `filename` is empty, absolute, or climbs out of the root.
    /// * `NotFound` if the resolved path is not an existing file.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, RowsError> {
        let relative = Path::new(filename);
        if filename.is_empty() {
            return Err(RowsError::InvalidRequest("filename is empty".into()));
        }
        let confined = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !confined {
            return Err(RowsError::InvalidRequest(format!(
                "filename '{}' escapes the data root",
                filename
            )));
        }

        let path = self.root.join(relative);
        if !path.is_file() {
            log::debug!("no file at '{}'", path.display());
            return Err(RowsError::NotFound(path));
        }
        Ok(path)
    }
}
