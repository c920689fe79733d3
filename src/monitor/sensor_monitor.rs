use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    history::HistoryBuffer,
    monitor::{history_recorder::HistoryRecorder, snapshot::Snapshot},
};

/// Consumer side of acquisition.
///
/// Owns the history shared with the receive worker and drives the
/// fixed-cadence refresh: each [`tick`](Self::tick) advances a counter and
/// yields the newest value of every channel. The history outlives client
/// sessions, so reconnecting keeps earlier data.
pub struct SensorMonitor {
    history: Arc<Mutex<HistoryBuffer>>,
    tick: u64,
}

impl SensorMonitor {
    #[must_use]
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: Arc::new(Mutex::new(HistoryBuffer::new(history_capacity))),
            tick: 0,
        }
    }

    /// Handler to pass to `start_receiving`.
    #[must_use]
    pub fn recorder(&self) -> HistoryRecorder {
        HistoryRecorder {
            history: Arc::clone(&self.history),
            notify: None,
        }
    }

    /// Like [`recorder`](Self::recorder), calling `notify` after every sample.
    #[must_use]
    pub fn recorder_with_notify<F>(&self, notify: F) -> HistoryRecorder
    where
        F: Fn() + Send + 'static,
    {
        HistoryRecorder {
            history: Arc::clone(&self.history),
            notify: Some(Box::new(notify)),
        }
    }

    /// Advances the refresh counter; `None` while no sample has arrived.
    pub fn tick(&mut self) -> Option<Snapshot> {
        self.tick += 1;
        let latest = self.history().latest()?;
        Some(Snapshot {
            tick: self.tick,
            values: latest,
        })
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Locks the shared history for reading.
    pub fn history(&self) -> MutexGuard<'_, HistoryBuffer> {
        match self.history.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::acquisition::{sample::Sample, sample_handler::SampleHandler};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn tick_counts_even_without_data() {
        let mut m = SensorMonitor::new(10);
        assert_eq!(m.tick(), None);
        assert_eq!(m.tick(), None);
        assert_eq!(m.ticks(), 2);

        let mut rec = m.recorder();
        rec.on_sample(Sample::new([1.0, 2.0, 3.0, 4.0]));
        rec.on_sample(Sample::new([5.0, 6.0, 7.0, 8.0]));

        assert_eq!(
            m.tick(),
            Some(Snapshot {
                tick: 3,
                values: Sample::new([5.0, 6.0, 7.0, 8.0])
            })
        );
        assert_eq!(m.history().len(), 2);
    }

    #[test]
    fn recorder_notifies_after_append() {
        let m = SensorMonitor::new(2);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = Arc::clone(&hits);
        let mut rec = m.recorder_with_notify(move || {
            hits2.fetch_add(1, Ordering::SeqCst);
        });

        for i in 0..3 {
            rec.on_sample(Sample::new([f64::from(i); 4]));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(m.history().len(), 2);
        assert_eq!(m.history().latest(), Some(Sample::new([2.0; 4])));
    }
}
