use serde::Serialize;

/// What came back from one request.
///
/// `status` is `None` exactly when `transport_error` is set: no HTTP response
/// was obtained at all. A 4xx/5xx status is an ordinary result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub status: Option<u16>,
    pub body: String,
    pub elapsed_ms: u128,
    pub size_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_error: Option<String>,
}

impl ExecutionResult {
    pub fn received(status: u16, body: String, elapsed_ms: u128, size_bytes: usize) -> Self {
        Self {
            status: Some(status),
            body,
            elapsed_ms,
            size_bytes,
            transport_error: None,
        }
    }

    pub fn transport_failure(message: impl Into<String>, elapsed_ms: u128) -> Self {
        Self {
            status: None,
            body: String::new(),
            elapsed_ms,
            size_bytes: 0,
            transport_error: Some(message.into()),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.transport_error.is_some()
    }

    /// Status rendered for display, `unavailable` when the transport failed.
    pub fn status_label(&self) -> String {
        match self.status {
            Some(code) => code.to_string(),
            None => "unavailable".to_string(),
        }
    }
}
