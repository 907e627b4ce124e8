//! Redirect suppression policy.
//!
//! Each client owns one policy value; suppression is per-client state, not
//! a process-wide transport override. The transport consults the policy on
//! every candidate redirect before applying its own default decision.

use std::collections::HashSet;

/// Per-client redirect suppression: a blanket switch plus a set of status
/// codes that must never be followed.
#[derive(Debug, Clone, Default)]
pub struct RedirectPolicy {
    ignore_all: bool,
    ignored: HashSet<u16>,
}

impl RedirectPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one status code to the ignore set. Cumulative across calls.
    pub fn ignore_status(&mut self, status: u16) {
        self.ignored.insert(status);
    }

    /// Toggle blanket suppression of every redirect.
    pub fn set_ignore_all(&mut self, ignore: bool) {
        self.ignore_all = ignore;
    }

    pub fn ignores_all(&self) -> bool {
        self.ignore_all
    }

    /// Whether a response with `status` must not be followed, regardless of
    /// what the transport's default decision would be.
    pub fn suppresses(&self, status: u16) -> bool {
        self.ignore_all || self.ignored.contains(&status)
    }

    /// Back to construction-time defaults.
    pub fn reset(&mut self) {
        self.ignore_all = false;
        self.ignored.clear();
    }
}
