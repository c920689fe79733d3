use std::fmt;

/// Lifecycle state of a [`Receiver`](super::receiver::Receiver).
///
/// `Idle → Bound → Receiving → Stopped → Receiving …`, and `Closed` from
/// any bound state. `Stopped` is bound and may be started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverState {
    Idle,
    Bound,
    Receiving,
    Stopped,
    Closed,
}

impl ReceiverState {
    /// Holds a bound socket.
    #[must_use]
    pub const fn is_bound(self) -> bool {
        matches!(self, Self::Bound | Self::Receiving | Self::Stopped)
    }
}

impl fmt::Display for ReceiverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Bound => "bound",
            Self::Receiving => "receiving",
            Self::Stopped => "stopped",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}
