use std::fmt;

use super::{bind_error::BindError, lifecycle_error::LifecycleError, start_error::StartError};

/// Error returned synchronously by [`SensorClient`](super::sensor_client::SensorClient).
#[derive(Debug)]
pub enum ClientError {
    Bind(BindError),
    Start(StartError),
    Lifecycle(LifecycleError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Bind(e) => write!(f, "bind error: {e}"),
            ClientError::Start(e) => write!(f, "start error: {e}"),
            ClientError::Lifecycle(e) => write!(f, "lifecycle error: {e}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Bind(e) => Some(e),
            ClientError::Start(e) => Some(e),
            ClientError::Lifecycle(e) => Some(e),
        }
    }
}

impl From<BindError> for ClientError {
    fn from(e: BindError) -> Self {
        ClientError::Bind(e)
    }
}

impl From<StartError> for ClientError {
    fn from(e: StartError) -> Self {
        ClientError::Start(e)
    }
}

impl From<LifecycleError> for ClientError {
    fn from(e: LifecycleError) -> Self {
        ClientError::Lifecycle(e)
    }
}
