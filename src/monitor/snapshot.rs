use crate::acquisition::sample::Sample;

/// Latest value of each channel at one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Refresh tick counter; used as the chart's x coordinate.
    pub tick: u64,
    pub values: Sample,
}
