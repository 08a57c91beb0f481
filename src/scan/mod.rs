//! Scanning of a project tree for NetMsg id declarations.

mod extract;
mod registry;
mod runner;
mod source;
mod types;
mod walker;

pub use extract::{Declaration, DeclarationKind, Extractor, MAX_BLOCK_LEN, MAX_DIGITS, MAX_NAME_LEN};
pub use registry::Registry;
pub use runner::{Runner, ScanOutcome};
pub use source::{decode, read_source, SourceEncoding, ENCODINGS};
pub use types::{Observation, ReservedViolation, ScanStats, SourceError};
pub use walker::{relative_path, walk};
