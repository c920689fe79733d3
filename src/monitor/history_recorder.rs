use std::sync::{Arc, Mutex};

use crate::{
    acquisition::{sample::Sample, sample_handler::SampleHandler},
    history::HistoryBuffer,
};

/// Sample handler that appends into a shared [`HistoryBuffer`].
///
/// Runs on the receive worker; `notify` (if any) is called after each
/// append, e.g. to wake a GUI event loop.
pub struct HistoryRecorder {
    pub(super) history: Arc<Mutex<HistoryBuffer>>,
    pub(super) notify: Option<Box<dyn Fn() + Send>>,
}

impl SampleHandler for HistoryRecorder {
    fn on_sample(&mut self, sample: Sample) {
        match self.history.lock() {
            Ok(mut h) => h.push(&sample),
            Err(poisoned) => poisoned.into_inner().push(&sample),
        }
        if let Some(notify) = &self.notify {
            notify();
        }
    }
}
