//! Persistent session store.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Read-only view of the client's persistent state.
///
/// The store is owned and synchronized externally; the session reads the
/// entry-timing timestamp and the current profile and never writes through
/// this interface. The owning collaborator updates `last_entered_at` itself
/// when an entry is recorded.
pub trait SessionStore: Send + Sync {
    /// When this client last entered a room, if ever.
    fn last_entered_at(&self) -> Option<DateTime<Utc>>;

    /// The client's current profile object.
    fn profile(&self) -> Value;
}
