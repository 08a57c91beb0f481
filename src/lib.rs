//! netmsg-check - NetMsg ID conflict checker.
//!
//! Scans a project's Lua sources for NetMsg id tables, finds ids declared
//! by more than one `(name, file)` pair, flags ids inside ranges reserved
//! for the SDK, and writes a text and a JSON report.
//!
//! # Architecture
//!
//! - `config`: immutable checker configuration (defaults or YAML)
//! - `scan`: directory walk, decoding, declaration extraction, registry
//! - `report`: text and JSON rendering, best-effort report writing
//! - `cli`: root resolution, operator prompts, the end-to-end run
//!
//! Extraction is pattern based, not a Lua parser. Missed or spurious
//! declarations are possible; the registry's bookkeeping does not depend
//! on extraction being exact.

pub mod cli;
pub mod config;
pub mod report;
pub mod scan;

pub use config::{Config, ReservedRange};
pub use report::{JsonReport, Report, ReportPaths};
pub use scan::{Extractor, Observation, Registry, ReservedViolation, Runner, ScanOutcome};
