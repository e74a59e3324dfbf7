use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rule::{Rewrite, SubstitutionRule};

/// The file-I/O shell around a [`SubstitutionRule`]: scoped read, pure
/// transform, scoped write back to the same path.
#[derive(Debug, Clone)]
pub struct Patcher {
    file: PathBuf,
    rule: SubstitutionRule,
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("failed to read {file}: {source}")]
    Read {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error("{file} is not valid UTF-8: {source}")]
    Utf8 {
        file: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[error("failed to write {file}: {source}")]
    Write {
        file: PathBuf,
        source: std::io::Error,
    },
}

/// Result of running the patcher against its target file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "PatchOutcome should be checked for patched/unchanged"]
pub enum PatchOutcome {
    /// The file was rewritten with one inserted line per matched block.
    Patched { file: PathBuf, insertions: usize },
    /// No block matched; the file was left untouched.
    Unchanged { file: PathBuf },
}

impl PatchOutcome {
    pub fn file(&self) -> &Path {
        match self {
            PatchOutcome::Patched { file, .. } | PatchOutcome::Unchanged { file } => file,
        }
    }
}

impl Patcher {
    pub fn new(file: impl Into<PathBuf>, rule: SubstitutionRule) -> Self {
        Self {
            file: file.into(),
            rule,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Read the target and apply the rule without writing anything.
    ///
    /// Returns the original text alongside the rewrite, for diff output.
    pub fn preview(&self) -> Result<(String, Rewrite), PatchError> {
        let bytes = fs::read(&self.file).map_err(|source| PatchError::Read {
            file: self.file.clone(),
            source,
        })?;

        let source = String::from_utf8(bytes).map_err(|source| PatchError::Utf8 {
            file: self.file.clone(),
            source,
        })?;

        let rewrite = self.rule.apply(&source);
        Ok((source, rewrite))
    }

    /// Read, transform, and overwrite the target file in place.
    ///
    /// A rewrite with zero insertions is byte-identical to the input, so the
    /// write is skipped and the file's mtime is left alone.
    pub fn apply(&self) -> Result<PatchOutcome, PatchError> {
        let (_, rewrite) = self.preview()?;

        if !rewrite.changed() {
            return Ok(PatchOutcome::Unchanged {
                file: self.file.clone(),
            });
        }

        atomic_write(&self.file, rewrite.text.as_bytes()).map_err(|source| PatchError::Write {
            file: self.file.clone(),
            source,
        })?;

        // Bump mtime so incremental compilation picks up the change.
        let now = filetime::FileTime::now();
        filetime::set_file_mtime(&self.file, now).map_err(|source| PatchError::Write {
            file: self.file.clone(),
            source,
        })?;

        Ok(PatchOutcome::Patched {
            file: self.file.clone(),
            insertions: rewrite.insertions,
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the original file is left intact.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Tempfile in the same directory so the rename stays on one filesystem.
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut temp = match parent {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new_in(".")?,
    };

    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
