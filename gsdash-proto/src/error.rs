//! Failure bodies returned by the write endpoints, and the user-facing
//! message built from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Errors decoding a server body.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The body was not the expected JSON shape.
    #[error("malformed body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation failure attached to a single field of a submitted script.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub ex_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ex_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl FieldError {
    /// A field error carrying only a message.
    pub fn new(ex_message: impl Into<String>) -> Self {
        Self {
            ex_message: ex_message.into(),
            ex_type: None,
            traceback: None,
        }
    }
}

/// The `message` member of an error body: either plain text or a
/// field-keyed mapping of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Fields(BTreeMap<String, FieldError>),
}

impl ErrorMessage {
    /// One display line per error, `field: message` for field errors.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text.clone()],
            Self::Fields(fields) => fields
                .iter()
                .map(|(field, err)| format!("{field}: {}", err.ex_message))
                .collect(),
        }
    }
}

/// Error body `{ "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: ErrorMessage,
}

impl ErrorBody {
    /// Body with a plain text message.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: ErrorMessage::Text(message.into()),
        }
    }

    /// Body with field-keyed validation errors.
    #[must_use]
    pub const fn fields(fields: BTreeMap<String, FieldError>) -> Self {
        Self {
            message: ErrorMessage::Fields(fields),
        }
    }

    /// Decode an error body.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Json`] when `bytes` is not an error body.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtoError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Build the notification text for a failed write: the prefix followed by
/// one line per server-reported error.
#[must_use]
pub fn failure_message(prefix: &str, message: Option<&ErrorMessage>) -> String {
    let mut text = prefix.to_string();
    if let Some(message) = message {
        for line in message.lines() {
            text.push('\n');
            text.push_str(&line);
        }
    }
    text
}
