use std::fmt;
use std::ops::Index;

/// Number of sensor channels carried by every frame.
pub const CHANNEL_COUNT: usize = 4;

/// One reading of all four sensor channels, in channel order.
///
/// Only the frame parser produces these from the wire, so a `Sample` always
/// holds exactly [`CHANNEL_COUNT`] values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample([f64; CHANNEL_COUNT]);

impl Sample {
    #[must_use]
    pub const fn new(values: [f64; CHANNEL_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn values(&self) -> &[f64; CHANNEL_COUNT] {
        &self.0
    }

    /// Value of `channel`, `None` past the last channel.
    #[must_use]
    pub fn channel(&self, channel: usize) -> Option<f64> {
        self.0.get(channel).copied()
    }
}

impl From<[f64; CHANNEL_COUNT]> for Sample {
    fn from(values: [f64; CHANNEL_COUNT]) -> Self {
        Self(values)
    }
}

impl Index<usize> for Sample {
    type Output = f64;

    fn index(&self, channel: usize) -> &f64 {
        &self.0[channel]
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{a}, {b}, {c}, {d}]")
    }
}
