//! Channel and socket handles.
//!
//! The session never constructs its transport: an externally owned channel
//! handle is bound after construction, once the connection is up. The handle
//! exposes push semantics in two flavors - fire-and-forget, or push with a
//! single "ok"/"error" reply delivered through a oneshot receiver.

use std::sync::Arc;

use roomlink_protocol::Reply;
use serde_json::Value;
use tokio::sync::oneshot;

/// The underlying connection a channel runs over.
pub trait SocketHandle: Send + Sync {
    /// Tear down the connection. Idempotent.
    fn disconnect(&self);
}

/// An externally owned handle to a named-message channel.
///
/// Implementations deliver at most one terminal reply per push. Dropping
/// the reply sender signals that the transport went away; never sending
/// leaves the receiver pending, which this crate deliberately does not time
/// out - timeout policy belongs to the transport or the caller.
pub trait ChannelHandle: Send + Sync {
    /// Push a named message, ignoring any reply.
    fn push(&self, event: &str, payload: Value);

    /// Push a named message and hand back the receiver for its reply.
    fn push_for_reply(&self, event: &str, payload: Value) -> oneshot::Receiver<Reply>;

    /// The socket this channel runs over.
    fn socket(&self) -> Arc<dyn SocketHandle>;
}
