use std::path::PathBuf;

use serde::Serialize;

/// A file in the notes directory. The file name is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub name: String,
    #[serde(skip)]
    pub path: PathBuf,
    pub size: u64,
}
