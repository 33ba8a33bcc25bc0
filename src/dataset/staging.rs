//! All-or-nothing file output.

use crate::preprocessing::error::PreprocessingError;
use log::debug;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A set of output files written to temporary files beside their destinations.
///
/// Nothing is visible at a destination path until [`StagedWrites::commit`]
/// renames every staged file into place, in staging order. Dropping an
/// uncommitted set removes the temporary files and any destination directory
/// staging had to create.
///
/// # Example
/// ```ignore
/// let mut staged = StagedWrites::new();
/// staged.stage_with("data/silver/credit.parquet", |file| write_parquet(&silver, file))?;
/// staged.stage_bytes("artifacts/scaler.bin", &scaler_bytes)?;
/// let written = staged.commit()?;
/// ```
#[derive(Debug, Default)]
pub struct StagedWrites {
    staged: Vec<(NamedTempFile, PathBuf)>,
    /// Directories created while staging, parents before children.
    created_dirs: Vec<PathBuf>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Stage `dest` by letting `write` fill a temporary file in the same directory.
    ///
    /// The destination directory is created if absent.
    pub fn stage_with<F>(&mut self, dest: impl AsRef<Path>, write: F) -> Result<(), PreprocessingError>
    where
        F: FnOnce(&mut File) -> Result<(), PreprocessingError>,
    {
        let dest = dest.as_ref();
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        self.create_dir(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| PreprocessingError::io(&dir, e))?;
        write(tmp.as_file_mut())?;
        tmp.as_file_mut()
            .flush()
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| PreprocessingError::io(dest, e))?;

        debug!("staged {} at {}", dest.display(), tmp.path().display());
        self.staged.push((tmp, dest.to_path_buf()));
        Ok(())
    }

    /// Stage `dest` with the given contents.
    pub fn stage_bytes(&mut self, dest: impl AsRef<Path>, bytes: &[u8]) -> Result<(), PreprocessingError> {
        let dest = dest.as_ref().to_path_buf();
        self.stage_with(&dest, |file| {
            file.write_all(bytes)
                .map_err(|e| PreprocessingError::io(&dest, e))
        })
    }

    /// Rename every staged file onto its destination, in staging order.
    ///
    /// Stage the file consumers look for last: if a rename fails, the files
    /// staged after it are never made visible.
    pub fn commit(mut self) -> Result<Vec<PathBuf>, PreprocessingError> {
        let staged = std::mem::take(&mut self.staged);
        let mut written = Vec::with_capacity(staged.len());
        for (tmp, dest) in staged {
            tmp.persist(&dest)
                .map_err(|e| PreprocessingError::io(&dest, e.error))?;
            written.push(dest);
        }
        self.created_dirs.clear();
        Ok(written)
    }

    /// `create_dir_all`, remembering which directories did not exist before.
    fn create_dir(&mut self, dir: &Path) -> Result<(), PreprocessingError> {
        let missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|d| !d.as_os_str().is_empty() && !d.exists())
            .map(Path::to_path_buf)
            .collect();
        std::fs::create_dir_all(dir).map_err(|e| PreprocessingError::io(dir, e))?;
        self.created_dirs.extend(missing.into_iter().rev());
        Ok(())
    }
}

impl Drop for StagedWrites {
    fn drop(&mut self) {
        // Temporary files go first so the directories can be empty. Directories
        // holding an already renamed file are not empty and stay.
        self.staged.clear();
        for dir in self.created_dirs.iter().rev() {
            if std::fs::remove_dir(dir).is_ok() {
                debug!("removed staging directory {}", dir.display());
            }
        }
    }
}
