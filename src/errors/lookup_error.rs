use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorKind {
    Configuration,
    Transport,
    Timeout,
    Protocol,
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupError {
    pub kind: LookupErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl LookupError {
    pub fn new(
        kind: LookupErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Configuration, "CONFIGURATION", message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Transport, "TRANSPORT", message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Timeout, "TIMEOUT", message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Protocol, "PROTOCOL", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Internal, "INTERNAL", message)
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            LookupErrorKind::Transport | LookupErrorKind::Timeout
        )
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for LookupError {}
