//! Outbound message definitions.
//!
//! Every message the session can push is a [`ClientMessage`] variant: the
//! wire event name, payload shape, and reply policy live together so the
//! partial-inclusion rules (pin's file group, unpin's optional file id) and
//! the asymmetric reply cases are compiler-checked instead of implicit.
//!
//! Field casing follows the backend protocol per message: the entry event
//! uses camelCase keys, pin/unpin use snake_case, and chat messages carry a
//! literal `type` field.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::timing::EntryTimingFlags;

/// Default chat message kind.
pub const DEFAULT_MESSAGE_KIND: &str = "chat";

/// How the session treats replies to a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyPolicy {
    /// Fire-and-forget; replies, if any, are ignored.
    Unawaited,
    /// Wait for the "ok" reply to this specific push.
    ResolveOnOk,
    /// Wait for either reply kind and surface errors to the caller.
    ResolveOrReject,
}

/// Telemetry describing a room entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryEvent {
    /// Timing novelty relative to the previous entry.
    #[serde(flatten)]
    pub timing: EntryTimingFlags,
    /// Occupants already in the room when this client entered.
    pub initial_occupant_count: usize,
    /// `"Screen"`, or the name of the presenting immersive display.
    pub entry_display_type: String,
    /// The client's user-agent string.
    pub user_agent: String,
}

/// Fields promoting a pinned object's backing file.
///
/// Only ever sent as a complete group; see [`PinPayload::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedFile {
    /// Stored file identifier.
    pub file_id: String,
    /// Access token for the stored file, when one is needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_access_token: Option<String>,
    /// Token authorizing promotion of the file to pinned storage.
    pub promotion_token: String,
}

/// Payload for `pin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinPayload {
    /// Networked object id.
    pub id: String,
    /// Serialized glTF node for the pinned object.
    pub gltf_node: Value,
    /// File promotion group, present only when complete.
    #[serde(flatten)]
    pub file: Option<PinnedFile>,
}

impl PinPayload {
    /// Build a pin payload, attaching the file promotion group only when
    /// both the file id and the promotion token are present. A partial
    /// group is dropped entirely; the wire never sees a lone `file_id`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        gltf_node: Value,
        file_id: Option<String>,
        file_access_token: Option<String>,
        promotion_token: Option<String>,
    ) -> Self {
        let file = match (file_id, promotion_token) {
            (Some(file_id), Some(promotion_token)) => Some(PinnedFile {
                file_id,
                file_access_token,
                promotion_token,
            }),
            _ => None,
        };

        Self {
            id: id.into(),
            gltf_node,
            file,
        }
    }
}

/// Payload for `unpin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpinPayload {
    /// Networked object id.
    pub id: String,
    /// Backing file to release, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

/// A chat-style message relayed to everyone in the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message body.
    pub body: String,
    /// Message kind, `"chat"` by default.
    #[serde(rename = "type")]
    pub kind: String,
}

impl ChatMessage {
    /// Create a message of the given kind.
    #[must_use]
    pub fn new(body: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            kind: kind.into(),
        }
    }

    /// Create a message of the default `"chat"` kind.
    #[must_use]
    pub fn chat(body: impl Into<String>) -> Self {
        Self::new(body, DEFAULT_MESSAGE_KIND)
    }
}

/// An outbound message, one variant per wire event.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Room-entry telemetry.
    Entered(EntryEvent),
    /// An object of the given type was spawned.
    ObjectSpawned {
        /// Spawned object type label.
        object_type: String,
    },
    /// The client's profile changed.
    ProfileUpdated {
        /// The entire current profile object.
        profile: Value,
    },
    /// Register a push subscription.
    Subscribe {
        /// Opaque subscription object.
        subscription: Value,
    },
    /// Remove a push subscription.
    Unsubscribe {
        /// Opaque subscription object.
        subscription: Value,
    },
    /// Chat-style room message.
    Chat(ChatMessage),
    /// Sign in with a credential token.
    SignIn {
        /// Credential token.
        token: String,
    },
    /// Sign out.
    SignOut,
    /// Ask which host serves this room.
    GetHost,
    /// Pin an object.
    Pin(PinPayload),
    /// Unpin an object.
    Unpin(UnpinPayload),
    /// Ask the room's operators for help.
    RequestSupport,
}

impl ClientMessage {
    /// The wire event name this message is pushed under.
    #[must_use]
    pub fn event(&self) -> &'static str {
        match self {
            ClientMessage::Entered(_) => "events:entered",
            ClientMessage::ObjectSpawned { .. } => "events:object_spawned",
            ClientMessage::ProfileUpdated { .. } => "events:profile_updated",
            ClientMessage::Subscribe { .. } => "subscribe",
            ClientMessage::Unsubscribe { .. } => "unsubscribe",
            ClientMessage::Chat(_) => "message",
            ClientMessage::SignIn { .. } => "sign_in",
            ClientMessage::SignOut => "sign_out",
            ClientMessage::GetHost => "get_host",
            ClientMessage::Pin(_) => "pin",
            ClientMessage::Unpin(_) => "unpin",
            ClientMessage::RequestSupport => "events:request_support",
        }
    }

    /// How replies to this message are handled.
    #[must_use]
    pub fn reply_policy(&self) -> ReplyPolicy {
        match self {
            ClientMessage::Unsubscribe { .. } => ReplyPolicy::ResolveOnOk,
            ClientMessage::SignIn { .. } | ClientMessage::SignOut | ClientMessage::GetHost => {
                ReplyPolicy::ResolveOrReject
            }
            _ => ReplyPolicy::Unawaited,
        }
    }

    /// Serialize the payload pushed alongside the event name.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            ClientMessage::Entered(event) => to_value(event),
            ClientMessage::ObjectSpawned { object_type } => json!({ "object_type": object_type }),
            ClientMessage::ProfileUpdated { profile } => json!({ "profile": profile }),
            ClientMessage::Subscribe { subscription }
            | ClientMessage::Unsubscribe { subscription } => {
                json!({ "subscription": subscription })
            }
            ClientMessage::Chat(message) => to_value(message),
            ClientMessage::SignIn { token } => json!({ "token": token }),
            ClientMessage::Pin(payload) => to_value(payload),
            ClientMessage::Unpin(payload) => to_value(payload),
            ClientMessage::SignOut | ClientMessage::GetHost | ClientMessage::RequestSupport => {
                json!({})
            }
        }
    }
}

// Plain field structs serialize infallibly.
fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}
