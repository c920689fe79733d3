use std::{
    io,
    net::{IpAddr, SocketAddr, UdpSocket},
    ops::ControlFlow,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    acquisition::{
        frame_parser, read_error::ReadError, receiver_stats::ReceiverStats,
        sample_handler::SampleHandler,
    },
    log::log_sink::LogSink,
    sink_error, sink_info, sink_trace, sink_warn,
};

/// Body of the background receive thread.
///
/// Blocks in `recv_from` with a read timeout so the stop flag is observed
/// within one timeout period. Parse failures and transient read errors are
/// logged and counted; only a closed socket ends the loop early.
pub(crate) struct ReceiverWorker {
    pub(crate) socket: Arc<UdpSocket>,
    pub(crate) stop_flag: Arc<AtomicBool>,
    pub(crate) running_flag: Arc<AtomicBool>,
    pub(crate) handler: Box<dyn SampleHandler>,
    pub(crate) stats: Arc<ReceiverStats>,
    pub(crate) log_sink: Arc<dyn LogSink>,
    pub(crate) recv_buffer_size: usize,
    pub(crate) source_filter: Option<IpAddr>,
}

impl ReceiverWorker {
    pub(crate) fn run(mut self) {
        sink_info!(self.log_sink, "[Receiver] worker started");
        // One spare byte: a read that fills it was truncated.
        let mut buf = vec![0u8; self.recv_buffer_size + 1];

        while !self.stop_flag.load(Ordering::SeqCst) {
            match self.socket.recv_from(&mut buf) {
                Ok((n, from)) => self.handle_datagram(&buf[..n], from),
                Err(e) => {
                    if self.handle_read_error(e).is_break() {
                        break;
                    }
                }
            }
        }

        self.running_flag.store(false, Ordering::SeqCst);
        sink_info!(self.log_sink, "[Receiver] worker stopped");
    }

    /// Timeouts are silent, transient failures are counted, a closed
    /// socket breaks the loop.
    fn handle_read_error(&self, e: io::Error) -> ControlFlow<()> {
        if is_poll_timeout(&e) {
            return ControlFlow::Continue(());
        }
        let err = ReadError::from(e);
        if err.is_fatal() {
            sink_error!(self.log_sink, "[Receiver] {err}; worker exiting");
            return ControlFlow::Break(());
        }
        self.stats.record_read_error();
        sink_warn!(self.log_sink, "[Receiver] {err}");
        ControlFlow::Continue(())
    }

    fn handle_datagram(&mut self, payload: &[u8], from: SocketAddr) {
        // A datagram read after stop was requested is dropped so that no
        // delivery starts once `stop` is in progress.
        if self.stop_flag.load(Ordering::SeqCst) {
            return;
        }

        if let Some(expected) = self.source_filter {
            if from.ip() != expected {
                self.stats.record_rejected();
                sink_warn!(
                    self.log_sink,
                    "[Receiver] dropped {} bytes from unexpected source {from}",
                    payload.len()
                );
                return;
            }
        }

        match frame_parser::parse_datagram(payload, self.recv_buffer_size) {
            Ok(sample) => {
                let n = self.stats.record_delivered();
                sink_trace!(self.log_sink, "[Receiver] sample #{n} from {from}: {sample}");
                self.handler.on_sample(sample);
            }
            Err(e) => {
                self.stats.record_parse_failure();
                sink_warn!(
                    self.log_sink,
                    "[Receiver] discarded datagram from {from}: {e} (raw {:?})",
                    String::from_utf8_lossy(payload)
                );
            }
        }
    }
}

/// `recv_from` hit the read timeout. Unix reports `WouldBlock`, Windows `TimedOut`.
fn is_poll_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}
