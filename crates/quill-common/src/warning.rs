//! Engine diagnostics with colored terminal output.
//!
//! Each distinct message is printed once. HTML parse errors, rejected CSS
//! selectors and unknown properties all report through here, so a noisy
//! document does not flood stderr with the same line.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// When set, warnings are still deduplicated but nothing is printed.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Report a diagnostic for `component` (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("CSS", "unknown pseudo-class ':shiny'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if record(&format!("[{component}] {message}")) && !QUIET.load(Ordering::Relaxed) {
        eprintln!("{}", format!("[Quill {component}] ⚠ {message}").yellow());
    }
}

/// Insert `key` into the dedup set, returning `true` if it was new.
fn record(key: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key.to_string())
}

/// Silence (or re-enable) warning output for the whole process.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Clear all recorded warnings (call before parsing an unrelated document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deduplicates_per_component() {
        assert!(record("[test-a] dedup me"));
        assert!(!record("[test-a] dedup me"));
        assert!(record("[test-b] dedup me"));
    }
}
