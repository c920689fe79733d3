use std::collections::VecDeque;

use crate::acquisition::sample::{CHANNEL_COUNT, Sample};

/// Per-channel capacity used by the monitor.
pub const MAX_HISTORY: usize = 1000;

/// Bounded per-channel FIFO of recent sample values.
///
/// Every [`push`](Self::push) appends one value to each channel, so all
/// channels always have the same length, never above the capacity. Once
/// full, the oldest value of each channel is evicted.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    channels: [VecDeque<f64>; CHANNEL_COUNT],
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl HistoryBuffer {
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: std::array::from_fn(|_| VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&mut self, sample: &Sample) {
        for (channel, &value) in self.channels.iter_mut().zip(sample.values()) {
            if channel.len() == self.capacity {
                channel.pop_front();
            }
            channel.push_back(value);
        }
    }

    /// Values of one channel, oldest first.
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&VecDeque<f64>> {
        self.channels.get(index)
    }

    /// Most recent value of every channel.
    #[must_use]
    pub fn latest(&self) -> Option<Sample> {
        let mut values = [0.0; CHANNEL_COUNT];
        for (slot, channel) in values.iter_mut().zip(&self.channels) {
            *slot = *channel.back()?;
        }
        Some(Sample::new(values))
    }

    /// Entries per channel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
