//! Deduplicated warnings routed through the `log` facade.
//!
//! The same message is only reported once per process (or until
//! [`clear_warnings`] is called), so a stylesheet with hundreds of rules
//! using the same unsupported at-rule produces a single line.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about unsupported input (emits once per unique message).
///
/// Returns `true` if the warning was emitted, `false` if it had already
/// been seen.
///
/// # Example
/// ```
/// use numbat_common::warning::warn_once;
///
/// assert!(warn_once("grammar", "@gregable is not in the at-rule grammar"));
/// assert!(!warn_once("grammar", "@gregable is not in the at-rule grammar"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        log::warn!("[numbat {component}] {message}");
    }
    first_time
}

/// Clear all recorded warnings (call when starting on a new input).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
