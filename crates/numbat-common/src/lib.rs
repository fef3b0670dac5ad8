//! Common utilities shared by the numbat crates.
//!
//! This crate provides shared infrastructure used by the parser and the CLI:
//! - **Logging** - `simple_logger` setup driven by a verbosity count
//! - **Warning System** - deduplicated warnings for unsupported input

pub mod logging;
pub mod warning;
