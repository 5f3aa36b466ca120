//! Session errors.

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by session operations.
///
/// There is no fatal path: guarded senders absorb their precondition
/// failures, expected negative outcomes resolve normally, and everything
/// else lands here for the caller to handle.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No channel has been bound yet.
    #[error("no channel bound")]
    NotBound,

    /// The channel went away before delivering a reply.
    #[error("channel closed before a reply arrived")]
    ChannelClosed,

    /// The backend refused the request; the raw error payload is attached.
    #[error("backend error: {0}")]
    ErrorReply(Value),
}
