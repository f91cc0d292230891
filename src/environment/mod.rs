//! # Template Variables
//!
//! `{{name}}` placeholders in template requests are replaced with values given
//! on the command line (`--var name=value`). Unknown placeholders are left as
//! they are so a typo shows up verbatim in the report.

use std::collections::BTreeMap;

use crate::error::ValidationError;

/// A set of variables available for interpolation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `KEY=VALUE` assignments; later keys override earlier ones.
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut variables = Self::new();
        for assignment in assignments {
            let (key, value) = parse_assignment(assignment.as_ref())?;
            variables.insert(key, value);
        }
        Ok(variables)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Interpolate `{{variable}}` placeholders in the given text.
    pub fn interpolate(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (key, value) in &self.values {
            result = result.replace(&format!("{{{{{key}}}}}"), value);
        }
        result
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), ValidationError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ValidationError::Variable(format!("Invalid variable `{raw}`, expected KEY=VALUE")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::Variable(format!("Variable name cannot be empty: `{raw}`")));
    }
    Ok((key.to_string(), value.to_string()))
}
