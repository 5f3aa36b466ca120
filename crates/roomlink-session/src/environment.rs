//! Host-environment collaborators.

use async_trait::async_trait;

/// Display label reported when no immersive display is presenting.
pub const SCREEN_DISPLAY: &str = "Screen";

/// What the session can observe about the host environment.
#[async_trait]
pub trait ClientEnvironment: Send + Sync {
    /// Name of the immersive display currently presenting, if any.
    ///
    /// Device enumeration is asynchronous on real hardware.
    async fn active_immersive_display(&self) -> Option<String>;

    /// Number of occupants already in the room, when a roster is available.
    fn initial_occupant_count(&self) -> Option<usize>;

    /// The client's user-agent string.
    fn user_agent(&self) -> String;
}

/// A plain-screen environment with no roster.
///
/// The default for clients without immersive hardware, and a convenient
/// stand-in for tests.
#[derive(Debug, Clone)]
pub struct ScreenEnvironment {
    user_agent: String,
}

impl ScreenEnvironment {
    /// Create an environment reporting the given user agent.
    #[must_use]
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl ClientEnvironment for ScreenEnvironment {
    async fn active_immersive_display(&self) -> Option<String> {
        None
    }

    fn initial_occupant_count(&self) -> Option<usize> {
        None
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }
}
