//! # Settings
//!
//! Persisted defaults applied to every request. Passed explicitly to the
//! builder and executor; nothing reads them from global state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::client::DEFAULT_TIMEOUT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Raw `Name: Value` lines sent before every request's own headers.
    pub default_headers: Vec<String>,
    pub timeout_secs: u64,
    pub history_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_headers: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            history_enabled: true,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Add a default header unless an identical line is already present.
    /// Returns whether the list changed.
    pub fn add_default_header(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() || self.default_headers.iter().any(|existing| existing == line) {
            return false;
        }
        self.default_headers.push(line.to_string());
        true
    }

    pub fn clear_default_headers(&mut self) {
        self.default_headers.clear();
    }
}
