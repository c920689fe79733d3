use std::sync::mpsc::Sender;

use super::sample::Sample;

/// Consumer of parsed samples.
///
/// Called on the receive worker's thread, once per sample, in arrival
/// order. Implemented for any `FnMut(Sample) + Send` closure.
pub trait SampleHandler: Send {
    fn on_sample(&mut self, sample: Sample);
}

impl<F> SampleHandler for F
where
    F: FnMut(Sample) + Send,
{
    fn on_sample(&mut self, sample: Sample) {
        self(sample);
    }
}

/// Forwards samples into a channel so another thread (a GUI loop, say)
/// can drain them on its own schedule. A dropped receiver discards samples.
#[derive(Debug, Clone)]
pub struct ChannelSampleHandler {
    tx: Sender<Sample>,
}

impl ChannelSampleHandler {
    #[must_use]
    pub fn new(tx: Sender<Sample>) -> Self {
        Self { tx }
    }
}

impl SampleHandler for ChannelSampleHandler {
    fn on_sample(&mut self, sample: Sample) {
        let _ = self.tx.send(sample);
    }
}
