//! Observable client transitions.
//!
//! Every delivery attempt, soft failure, disabled strategy, relay preference
//! change and new session is reported to the client's listener.

/// Something the client did that a caller may want to show or assert on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// About to attempt delivery through a strategy.
    Connecting { strategy: String },

    /// A strategy failed softly; the next one will be tried.
    StrategyFailed { strategy: String, reason: String },

    /// A strategy hit the failure threshold and was taken out of rotation.
    StrategyDisabled { strategy: String },

    /// Relay preference flipped. `strategy` names the delivery that caused it,
    /// `None` when forced through [`set_prefer_relay`](crate::OdooClient::set_prefer_relay).
    RelayPreferenceChanged {
        prefer_relay: bool,
        strategy: Option<String>,
    },

    /// `authenticate` stored a new session.
    Authenticated { uid: i64 },
}

/// Receives [`ClientEvent`]s synchronously, on the calling task.
pub trait ClientEventListener: Send + Sync {
    fn on_event(&self, event: &ClientEvent);
}

/// Listener for when nobody is watching.
#[derive(Debug, Clone, Copy)]
pub struct NoOpListener;

impl ClientEventListener for NoOpListener {
    fn on_event(&self, _event: &ClientEvent) {}
}
