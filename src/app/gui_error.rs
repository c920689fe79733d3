use std::fmt;

use crate::acquisition::client_error::ClientError;

#[derive(Debug)]
pub enum GuiError {
    /// Port field is not a number in `0..=65535`.
    InvalidPort(String),
    NotConnected,
    Client(ClientError),
}

impl fmt::Display for GuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuiError::InvalidPort(p) => write!(f, "port must be a number, got {p:?}"),
            GuiError::NotConnected => write!(f, "not connected"),
            GuiError::Client(e) => write!(f, "{e}"),
        }
    }
}

impl From<ClientError> for GuiError {
    fn from(e: ClientError) -> Self {
        GuiError::Client(e)
    }
}
