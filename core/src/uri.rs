//! Locator normalization.
//!
//! Callers may pass anything from a full `http://host/path` URL down to a
//! bare path fragment. Normalization rewrites bare fragments into a
//! scheme-qualified form and leaves everything else untouched. Validation
//! happens later, at compilation, so a malformed locator is recorded as a
//! failure instead of interrupting the chain.

/// Normalize a caller-supplied locator.
///
/// An empty locator stays empty; it is rejected later, at URI validation.
/// A locator without the substring `http` is treated as a path: it gains a
/// leading `/` if missing and then the `http:/` prefix, so `host/path`
/// becomes `http://host/path`. Anything already mentioning `http` passes
/// through verbatim.
pub fn resolve(locator: &str) -> String {
    if locator.is_empty() || locator.contains("http") {
        return locator.to_string();
    }
    if locator.starts_with('/') {
        format!("http:/{locator}")
    } else {
        format!("http://{locator}")
    }
}
