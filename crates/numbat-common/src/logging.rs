//! Logger initialisation.
//!
//! Library crates only talk to the `log` facade; binaries call [`init`]
//! once at startup to install `simple_logger` as the backend.

use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Map a `-v` count to a level: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
#[must_use]
pub const fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install `simple_logger` at the level implied by `verbosity`.
///
/// Returns `false` if a logger was already installed; the existing logger
/// is left in place.
pub fn init(verbosity: u8) -> bool {
    SimpleLogger::new()
        .with_level(level_for_verbosity(verbosity))
        .without_timestamps()
        .init()
        .is_ok()
}
