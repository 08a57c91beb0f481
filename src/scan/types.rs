//! Core types shared by the scan pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// One `name = id` declaration found in one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub id: u64,
    pub name: String,
    /// Path relative to the project root, `/`-separated.
    pub file: String,
}

impl Observation {
    pub fn new(id: u64, name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            file: file.into(),
        }
    }
}

/// An id inside a reserved range, used outside the range owner's subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedViolation {
    pub name: String,
    pub id: u64,
    pub file: String,
}

/// Why a single source file was not scanned.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is {size} bytes, over the {limit} byte limit", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("{} could not be decoded with any supported encoding", .path.display())]
    Undecodable { path: PathBuf },
}

/// Counters for one run, alongside the registry contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Distinct files read and parsed.
    pub files_scanned: usize,
    /// Files skipped because of a [`SourceError`].
    pub files_skipped: usize,
    /// Configured scan directories that were missing on disk.
    pub missing_dirs: Vec<String>,
}
