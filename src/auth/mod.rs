//! # Authentication
//!
//! Turns the authentication chosen for an ad-hoc request into the single
//! header line appended after all other headers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ValidationError;

/// Supported authentication methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthMethod {
    #[default]
    None,
    /// A raw `Name: Value` line.
    Header(String),
    BearerToken(String),
    BasicAuth {
        username: String,
        password: String,
    },
}

impl AuthMethod {
    /// Parse `user:password` as given on the command line. A missing password
    /// is treated as empty.
    pub fn basic_from_pair(pair: &str) -> Self {
        let (username, password) = pair.split_once(':').unwrap_or((pair, ""));
        AuthMethod::BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// The header line to send, or `None` when no authentication is set.
    pub fn header_line(&self) -> Result<Option<String>, ValidationError> {
        match self {
            AuthMethod::None => Ok(None),
            AuthMethod::Header(line) => {
                let raw = line.trim();
                let (name, _) = raw
                    .split_once(':')
                    .ok_or_else(|| ValidationError::Auth(format!("Invalid auth header format: `{raw}`")))?;
                if name.trim().is_empty() {
                    return Err(ValidationError::Auth(format!("Auth header name is empty: `{raw}`")));
                }
                Ok(Some(raw.to_string()))
            }
            AuthMethod::BearerToken(token) => {
                let token = token.trim();
                if token.is_empty() {
                    return Err(ValidationError::Auth("Bearer token cannot be empty".to_string()));
                }
                Ok(Some(format!("Authorization: Bearer {token}")))
            }
            AuthMethod::BasicAuth { username, password } => {
                let username = username.trim();
                if username.is_empty() {
                    return Err(ValidationError::Auth("Basic auth username cannot be empty".to_string()));
                }
                let encoded = STANDARD.encode(format!("{username}:{}", password.trim()));
                Ok(Some(format!("Authorization: Basic {encoded}")))
            }
        }
    }
}
