/// Coarse acquisition state shown by the monitor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// No socket bound.
    Disconnected,
    /// Socket bound, not receiving.
    Connected,
    /// Receive worker running.
    Monitoring,
}
