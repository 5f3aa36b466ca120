//! # roomlink-protocol
//!
//! Outbound message definitions for the roomlink room-coordination protocol.
//!
//! This crate defines every message a session can push to the backend,
//! together with the reply handling each one expects:
//!
//! - `events:*` - fire-and-forget telemetry (entry, object spawn, profile
//!   update, support request)
//! - `subscribe` / `unsubscribe` - push-subscription management
//! - `message` - chat-style room messages
//! - `sign_in` / `sign_out` / `get_host` / `pin` / `unpin` - room requests
//!
//! Reply policies are encoded as data ([`ReplyPolicy`]) so asymmetric cases
//! (`unsubscribe` awaits a reply where `subscribe` does not) are visible in
//! one place instead of scattered across call sites.
//!
//! ## Example
//!
//! ```rust
//! use roomlink_protocol::{ClientMessage, ReplyPolicy};
//!
//! let message = ClientMessage::SignIn { token: "credential".into() };
//! assert_eq!(message.event(), "sign_in");
//! assert_eq!(message.reply_policy(), ReplyPolicy::ResolveOrReject);
//! ```

pub mod messages;
pub mod reply;
pub mod timing;

pub use messages::{
    ChatMessage, ClientMessage, EntryEvent, PinPayload, PinnedFile, ReplyPolicy, UnpinPayload,
    DEFAULT_MESSAGE_KIND,
};
pub use reply::{error_reason, Reply, INVALID_TOKEN_REASON};
pub use timing::EntryTimingFlags;
