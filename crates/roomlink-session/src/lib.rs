//! # roomlink-session
//!
//! Session-scoped client for a room-coordination channel.
//!
//! A [`ChannelSession`] mediates one bidirectional pub/sub channel between a
//! client and the room backend: it tracks sign-in state, marshals outbound
//! domain events into channel messages, and resolves acknowledgement or
//! error replies into futures.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  bind   ┌────────────────┐  push   ┌──────────────┐
//! │ ChannelHandle│────────▶│ ChannelSession │────────▶│   backend    │
//! └──────────────┘         └────────────────┘         └──────────────┘
//!                             │          │
//!                             ▼          ▼
//!                      ┌────────────┐ ┌───────────────────┐
//!                      │SessionStore│ │ ClientEnvironment │
//!                      └────────────┘ └───────────────────┘
//! ```
//!
//! The transport, the persistent store, and display/roster detection are
//! external collaborators consumed through narrow traits:
//!
//! - [`ChannelHandle`] / [`SocketHandle`] - the connected channel
//! - [`SessionStore`] - entry timing and profile state
//! - [`ClientEnvironment`] - immersive displays, roster, user agent

pub mod channel;
pub mod environment;
pub mod error;
pub mod session;
pub mod store;

pub use channel::{ChannelHandle, SocketHandle};
pub use environment::{ClientEnvironment, ScreenEnvironment, SCREEN_DISPLAY};
pub use error::SessionError;
pub use session::ChannelSession;
pub use store::SessionStore;
