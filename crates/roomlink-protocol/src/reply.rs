//! Reply kinds for pushes that await acknowledgement.

use serde_json::Value;

/// Error reason the backend uses for an expired or malformed credential.
pub const INVALID_TOKEN_REASON: &str = "invalid_token";

/// A terminal reply to a push.
///
/// The channel delivers at most one of these per push; pushes with an
/// unawaited policy never observe one.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Acknowledged, with the reply payload.
    Ok(Value),
    /// Refused, with the raw error payload.
    Error(Value),
}

impl Reply {
    /// The `reason` field of the error payload, if this is an error reply.
    #[must_use]
    pub fn error_reason(&self) -> Option<&str> {
        match self {
            Reply::Error(payload) => error_reason(payload),
            Reply::Ok(_) => None,
        }
    }
}

/// Read the `reason` field of an error payload.
#[must_use]
pub fn error_reason(payload: &Value) -> Option<&str> {
    payload.get("reason").and_then(Value::as_str)
}
