use std::fmt;

use super::receiver_state::ReceiverState;

/// Operations a caller can request from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientOp {
    Bind,
    Start,
    Stop,
    Close,
}

impl fmt::Display for ClientOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClientOp::Bind => "bind",
            ClientOp::Start => "start",
            ClientOp::Stop => "stop",
            ClientOp::Close => "close",
        };
        f.write_str(s)
    }
}

/// `operation` is not valid in `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleError {
    pub state: ReceiverState,
    pub operation: ClientOp,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} while {}", self.operation, self.state)
    }
}

impl std::error::Error for LifecycleError {}
