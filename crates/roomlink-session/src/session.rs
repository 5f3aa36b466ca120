//! The channel session.
//!
//! One [`ChannelSession`] exists per room session. It is constructed with
//! its persistent store and host environment; the channel itself connects
//! asynchronously and is attached later with
//! [`bind_channel`](ChannelSession::bind_channel). Every operation either
//! pushes a message immediately or returns a future that settles when the
//! channel delivers the acknowledgement or error reply for that push.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;
use roomlink_protocol::{
    error_reason, ChatMessage, ClientMessage, EntryEvent, EntryTimingFlags, PinPayload, Reply,
    ReplyPolicy, UnpinPayload, DEFAULT_MESSAGE_KIND, INVALID_TOKEN_REASON,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::channel::ChannelHandle;
use crate::environment::{ClientEnvironment, SCREEN_DISPLAY};
use crate::error::SessionError;
use crate::store::SessionStore;

/// Session lifecycle state.
///
/// The channel reference and the signed-in flag only change through the
/// transition methods here, keeping the single-writer rule in one place.
enum SessionState {
    /// No channel bound yet; sends are skipped and requests fail fast.
    Unbound,
    /// A channel is bound and requests may be issued.
    Bound {
        channel: Arc<dyn ChannelHandle>,
        signed_in: bool,
    },
}

impl SessionState {
    /// Replace the channel unconditionally, preserving the signed-in flag.
    fn bind(&mut self, channel: Arc<dyn ChannelHandle>) {
        let signed_in = self.signed_in();
        *self = SessionState::Bound { channel, signed_in };
    }

    /// Record a sign-in or sign-out acknowledged by the backend.
    fn set_signed_in(&mut self, value: bool) {
        if let SessionState::Bound { signed_in, .. } = self {
            *signed_in = value;
        }
    }

    fn signed_in(&self) -> bool {
        matches!(self, SessionState::Bound { signed_in: true, .. })
    }

    fn channel(&self) -> Option<Arc<dyn ChannelHandle>> {
        match self {
            SessionState::Bound { channel, .. } => Some(Arc::clone(channel)),
            SessionState::Unbound => None,
        }
    }
}

/// A session-scoped client for one room's coordination channel.
///
/// The session is torn down with [`disconnect`](Self::disconnect), which
/// leaves in-memory state as-is: scope is the lifetime of the owning room
/// session, not the channel's reconnects.
pub struct ChannelSession {
    store: Arc<dyn SessionStore>,
    environment: Arc<dyn ClientEnvironment>,
    state: Mutex<SessionState>,
}

impl ChannelSession {
    /// Create a session over an externally owned store and environment.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, environment: Arc<dyn ClientEnvironment>) -> Self {
        Self {
            store,
            environment,
            state: Mutex::new(SessionState::Unbound),
        }
    }

    /// Attach or replace the channel handle.
    ///
    /// Idempotent; sign-in state survives a rebind.
    pub fn bind_channel(&self, channel: Arc<dyn ChannelHandle>) {
        debug!("binding channel");
        self.state().bind(channel);
    }

    /// Whether the backend has acknowledged a sign-in on this session.
    #[must_use]
    pub fn signed_in(&self) -> bool {
        self.state().signed_in()
    }

    /// Send the room-entry telemetry event.
    ///
    /// Timing novelty is computed fresh from the store's last-entry
    /// timestamp, in the client's local zone. Occupancy defaults to zero
    /// when no roster is available, and the display label is `"Screen"`
    /// unless an immersive display is presenting.
    pub async fn send_entry_event(&self) {
        if self.state().channel().is_none() {
            warn!("no channel bound before room entry; dropping entry event");
            return;
        }

        let entry_display_type = self
            .environment
            .active_immersive_display()
            .await
            .unwrap_or_else(|| SCREEN_DISPLAY.to_owned());

        let event = EntryEvent {
            timing: self.entry_timing_flags(),
            initial_occupant_count: self.environment.initial_occupant_count().unwrap_or(0),
            entry_display_type,
            user_agent: self.environment.user_agent(),
        };

        self.send_guarded(&ClientMessage::Entered(event));
    }

    /// Timing novelty flags for an entry happening now.
    #[must_use]
    pub fn entry_timing_flags(&self) -> EntryTimingFlags {
        let now = Local::now();
        let last = self
            .store
            .last_entered_at()
            .map(|at| at.with_timezone(&Local));
        EntryTimingFlags::compute(last.as_ref(), &now)
    }

    /// Report that an object of the given type was spawned.
    pub fn send_object_spawned_event(&self, object_type: impl Into<String>) {
        self.send_guarded(&ClientMessage::ObjectSpawned {
            object_type: object_type.into(),
        });
    }

    /// Push the store's entire current profile.
    ///
    /// Unlike the other event senders this has no bound-channel guard: an
    /// unbound channel is an error to the caller rather than a logged skip.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotBound`] if no channel is bound.
    pub fn send_profile_update(&self) -> Result<(), SessionError> {
        let channel = self.state().channel().ok_or(SessionError::NotBound)?;
        let message = ClientMessage::ProfileUpdated {
            profile: self.store.profile(),
        };
        channel.push(message.event(), message.payload());
        Ok(())
    }

    /// Register a push subscription. No reply is awaited.
    pub fn subscribe(&self, subscription: Value) {
        self.send_guarded(&ClientMessage::Subscribe { subscription });
    }

    /// Remove a push subscription, waiting for the backend's confirmation.
    ///
    /// Registration ([`subscribe`](Self::subscribe)) is fire-and-forget;
    /// removal uniquely waits for the "ok" reply to this specific push.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotBound`] if no channel is bound,
    /// [`SessionError::ChannelClosed`] if the channel went away, or
    /// [`SessionError::ErrorReply`] if the backend refused.
    pub async fn unsubscribe(&self, subscription: Value) -> Result<(), SessionError> {
        match self
            .request(&ClientMessage::Unsubscribe { subscription })
            .await?
        {
            Reply::Ok(_) => Ok(()),
            Reply::Error(payload) => Err(SessionError::ErrorReply(payload)),
        }
    }

    /// Send a message of the given kind to the room.
    ///
    /// An empty body produces no push at all.
    pub fn send_message(&self, body: impl Into<String>, kind: impl Into<String>) {
        let body = body.into();
        if body.is_empty() {
            return;
        }
        self.send_guarded(&ClientMessage::Chat(ChatMessage::new(body, kind)));
    }

    /// Send a message of the default `"chat"` kind.
    pub fn send_chat(&self, body: impl Into<String>) {
        self.send_message(body, DEFAULT_MESSAGE_KIND);
    }

    /// Sign in to the backend with a credential token.
    ///
    /// An `invalid_token` refusal is an expected credential-lifecycle
    /// outcome (an expired token, say): the call resolves without signing
    /// in, and the caller should not retry with the same token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotBound`] if no channel is bound,
    /// [`SessionError::ChannelClosed`] if the channel went away, or
    /// [`SessionError::ErrorReply`] for any refusal other than
    /// `invalid_token`.
    pub async fn sign_in(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let message = ClientMessage::SignIn {
            token: token.into(),
        };

        match self.request(&message).await? {
            Reply::Ok(_) => {
                self.state().set_signed_in(true);
                Ok(())
            }
            Reply::Error(payload) => {
                if error_reason(&payload) == Some(INVALID_TOKEN_REASON) {
                    warn!("sign in failed: invalid token");
                    Ok(())
                } else {
                    Err(SessionError::ErrorReply(payload))
                }
            }
        }
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotBound`], [`SessionError::ChannelClosed`],
    /// or [`SessionError::ErrorReply`]; the signed-in flag is left unchanged
    /// on failure.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        match self.request(&ClientMessage::SignOut).await? {
            Reply::Ok(_) => {
                self.state().set_signed_in(false);
                Ok(())
            }
            Reply::Error(payload) => Err(SessionError::ErrorReply(payload)),
        }
    }

    /// Ask the backend which host serves this room.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotBound`], [`SessionError::ChannelClosed`],
    /// or [`SessionError::ErrorReply`].
    pub async fn get_host(&self) -> Result<String, SessionError> {
        match self.request(&ClientMessage::GetHost).await? {
            Reply::Ok(payload) => Ok(payload
                .get("host")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()),
            Reply::Error(payload) => Err(SessionError::ErrorReply(payload)),
        }
    }

    /// Pin an object in the room.
    ///
    /// The file promotion fields ride along only when both `file_id` and
    /// `promotion_token` are present; see [`PinPayload::new`].
    pub fn pin(
        &self,
        id: impl Into<String>,
        gltf_node: Value,
        file_id: Option<String>,
        file_access_token: Option<String>,
        promotion_token: Option<String>,
    ) {
        let payload = PinPayload::new(id, gltf_node, file_id, file_access_token, promotion_token);
        self.send_guarded(&ClientMessage::Pin(payload));
    }

    /// Unpin an object, naming its backing file when there is one.
    pub fn unpin(&self, id: impl Into<String>, file_id: Option<String>) {
        self.send_guarded(&ClientMessage::Unpin(UnpinPayload {
            id: id.into(),
            file_id,
        }));
    }

    /// Ask the room's operators for help.
    pub fn request_support(&self) {
        self.send_guarded(&ClientMessage::RequestSupport);
    }

    /// Disconnect the underlying socket, if a channel is bound.
    ///
    /// No state is reset: the channel reference and signed-in flag stay
    /// as-is, and a new bind is required before reuse.
    pub fn disconnect(&self) {
        if let Some(channel) = self.state().channel() {
            debug!("disconnecting socket");
            channel.socket().disconnect();
        }
    }

    /// Push a fire-and-forget message if a channel is bound.
    ///
    /// A missing binding is a precondition failure, not an error: it is
    /// logged and the message is dropped.
    fn send_guarded(&self, message: &ClientMessage) {
        debug_assert_eq!(message.reply_policy(), ReplyPolicy::Unawaited);
        match self.state().channel() {
            Some(channel) => {
                debug!(event = message.event(), "push");
                channel.push(message.event(), message.payload());
            }
            None => warn!(event = message.event(), "no channel bound; dropping message"),
        }
    }

    /// Push a request and wait for its terminal reply.
    ///
    /// No timeout is imposed here: a reply that never arrives leaves the
    /// future pending indefinitely.
    async fn request(&self, message: &ClientMessage) -> Result<Reply, SessionError> {
        debug_assert_ne!(message.reply_policy(), ReplyPolicy::Unawaited);
        let channel = self.state().channel().ok_or(SessionError::NotBound)?;
        debug!(event = message.event(), "push awaiting reply");
        let receiver = channel.push_for_reply(message.event(), message.payload());
        receiver.await.map_err(|_| SessionError::ChannelClosed)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
