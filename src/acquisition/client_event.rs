use super::endpoint::Endpoint;

/// Coarse state changes for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Connected(Endpoint),
    Disconnected,
    MonitoringStarted,
    MonitoringStopped,
}
