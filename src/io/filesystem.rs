use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::core::Note;

pub const DEFAULT_SUFFIX: &str = ".txt";

/// Extension of program source files, never listed as notes.
pub const SOURCE_EXTENSION: &str = "rs";

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed listing directory {path}: {source}")]
    List {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed reading file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed writing file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Flat directory of notes, one file per note.
#[derive(Debug, Clone)]
pub struct NoteStore {
    root: PathBuf,
}

impl NoteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans the directory on every call; sorted case-insensitively by name.
    pub fn list_notes(&self) -> Result<Vec<Note>, IoError> {
        let entries = fs::read_dir(&self.root).map_err(|source| IoError::List {
            path: self.root.display().to_string(),
            source,
        })?;

        let mut notes = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| IoError::List {
                    path: self.root.display().to_string(),
                    source,
                })?
                .path();
            if path.is_file() && !is_program_source(&path) {
                notes.push(note_at(path)?);
            }
        }
        notes.sort_by_key(|n| n.name.to_lowercase());

        debug!(root = %self.root.display(), count = notes.len(), "scanned notes");
        Ok(notes)
    }

    /// Joins the literal name as a single segment under the root.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Looks a note up by name, exact match first, then case-insensitively.
    pub fn find(&self, raw: &str) -> Result<Option<Note>, IoError> {
        let name = normalize_name(raw);
        let notes = self.list_notes()?;
        if let Some(idx) = notes.iter().position(|n| n.name == name) {
            return Ok(notes.into_iter().nth(idx));
        }
        let wanted = name.to_lowercase();
        Ok(notes.into_iter().find(|n| n.name.to_lowercase() == wanted))
    }

    /// Where a note named `raw` would be created, and whether that path is taken.
    ///
    /// Unlisted files (program source, directories) still count as taken.
    pub fn create_target(&self, raw: &str) -> Result<(PathBuf, bool), IoError> {
        if let Some(note) = self.find(raw)? {
            return Ok((note.path, true));
        }
        let path = self.resolve(&normalize_name(raw));
        let taken = path.exists();
        Ok((path, taken))
    }

    pub fn read(&self, note: &Note) -> Result<String, IoError> {
        let bytes = fs::read(&note.path).map_err(|source| IoError::Read {
            path: note.path.display().to_string(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).to_string())
    }

    /// Replaces the file content with `text` plus one trailing newline.
    pub fn write(&self, path: &Path, text: &str) -> Result<(), IoError> {
        fs::write(path, format!("{text}\n")).map_err(|source| IoError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), bytes = text.len() + 1, "note written");
        Ok(())
    }

    /// Appends a newline, `text`, and a newline; never rewrites existing bytes.
    pub fn append(&self, path: &Path, text: &str) -> Result<(), IoError> {
        let map_err = |source: std::io::Error| IoError::Write {
            path: path.display().to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(map_err)?;
        file.write_all(format!("\n{text}\n").as_bytes())
            .map_err(map_err)?;
        info!(path = %path.display(), bytes = text.len() + 2, "note appended");
        Ok(())
    }
}

/// Appends [`DEFAULT_SUFFIX`] when `raw` has no extension.
///
/// A leading dot does not start an extension (`.todo` becomes `.todo.txt`),
/// and neither does a trailing one.
pub fn normalize_name(raw: &str) -> String {
    let name = raw.trim();
    let has_extension = match name.rfind('.') {
        Some(idx) => idx > 0 && idx + 1 < name.len(),
        None => false,
    };
    if has_extension {
        name.to_string()
    } else {
        format!("{name}{DEFAULT_SUFFIX}")
    }
}

pub fn contains_separator(raw: &str) -> bool {
    raw.contains('/') || raw.contains('\\')
}

fn note_at(path: PathBuf) -> Result<Note, IoError> {
    let size = fs::metadata(&path)
        .map_err(|source| IoError::Read {
            path: path.display().to_string(),
            source,
        })?
        .len();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(Note { name, path, size })
}

fn is_program_source(path: &Path) -> bool {
    path.extension().map(|e| e == SOURCE_EXTENSION).unwrap_or(false)
}
