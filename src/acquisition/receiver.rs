use std::{
    io,
    net::{IpAddr, SocketAddr, UdpSocket},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use crate::{
    acquisition::{
        bind_error::BindError,
        endpoint::Endpoint,
        receiver_config::ReceiverConfig,
        receiver_state::ReceiverState,
        receiver_stats::{ReceiverStats, StatsSnapshot},
        receiver_worker::ReceiverWorker,
        sample_handler::SampleHandler,
        start_error::StartError,
    },
    log::log_sink::LogSink,
    sink_error, sink_info, sink_warn,
};

/// Owns the datagram socket and the background receive thread.
///
/// At most one worker exists at a time. [`stop`](Self::stop) joins it, so
/// once `stop` or [`close`](Self::close) returns the handler is never called
/// again.
pub struct Receiver {
    config: ReceiverConfig,
    log_sink: Arc<dyn LogSink>,
    state: ReceiverState,
    endpoint: Option<Endpoint>,
    socket: Option<Arc<UdpSocket>>,
    source_filter: Option<IpAddr>,
    stop_flag: Arc<AtomicBool>,
    running_flag: Arc<AtomicBool>,
    stats: Arc<ReceiverStats>,
    worker: Option<JoinHandle<()>>,
}

impl Receiver {
    #[must_use]
    pub fn new(config: ReceiverConfig, log_sink: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            log_sink,
            state: ReceiverState::Idle,
            endpoint: None,
            socket: None,
            source_filter: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            running_flag: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(ReceiverStats::default()),
            worker: None,
        }
    }

    /// Binds the local socket and records `remote_host:remote_port` as the
    /// expected peer.
    ///
    /// The local address comes from [`ReceiverConfig`], not from the remote
    /// port.
    ///
    /// # Errors
    /// - [`BindError::AlreadyBound`] unless the receiver is `Idle`.
    /// - [`BindError::InvalidAddress`] for an empty remote host, an
    ///   unparseable local host, or an unresolvable remote host when source
    ///   filtering is on.
    /// - [`BindError::AddrInUse`] if the local port is taken.
    pub fn bind(&mut self, remote_host: &str, remote_port: u16) -> Result<(), BindError> {
        if self.state != ReceiverState::Idle {
            return Err(BindError::AlreadyBound(self.state));
        }

        let remote_host = remote_host.trim();
        if remote_host.is_empty() {
            return Err(BindError::InvalidAddress("empty remote host".into()));
        }
        let endpoint = Endpoint::new(remote_host, remote_port);

        let source_filter = if self.config.filter_source {
            let addr = endpoint
                .resolve()
                .ok_or_else(|| BindError::InvalidAddress(endpoint.to_string()))?;
            Some(addr.ip()).filter(|ip| !ip.is_unspecified())
        } else {
            None
        };

        let local_ip: IpAddr = self
            .config
            .local_host
            .parse()
            .map_err(|_| BindError::InvalidAddress(self.config.local_host.clone()))?;
        let local = SocketAddr::new(local_ip, self.config.local_port);

        let socket = UdpSocket::bind(local).map_err(|e| match e.kind() {
            io::ErrorKind::AddrInUse => BindError::AddrInUse(local),
            io::ErrorKind::AddrNotAvailable => BindError::InvalidAddress(local.to_string()),
            _ => BindError::Io(e),
        })?;
        socket.set_read_timeout(Some(self.config.read_timeout))?;

        let bound_to = socket.local_addr().unwrap_or(local);
        sink_info!(
            self.log_sink,
            "[Receiver] bound {bound_to}, expecting data from {endpoint}{}",
            if source_filter.is_some() { " (filtered)" } else { "" }
        );

        self.socket = Some(Arc::new(socket));
        self.endpoint = Some(endpoint);
        self.source_filter = source_filter;
        self.state = ReceiverState::Bound;
        Ok(())
    }

    /// Launches the receive worker; `handler` gets every parsed sample.
    ///
    /// # Errors
    /// - [`StartError::NotBound`] before a successful bind.
    /// - [`StartError::AlreadyRunning`] while receiving, or when called from
    ///   the handler of a worker that is still winding down.
    /// - [`StartError::Closed`] after close.
    /// - [`StartError::Spawn`] if the thread cannot be created.
    pub fn start<H: SampleHandler + 'static>(&mut self, handler: H) -> Result<(), StartError> {
        self.start_boxed(Box::new(handler))
    }

    pub(crate) fn start_boxed(&mut self, handler: Box<dyn SampleHandler>) -> Result<(), StartError> {
        match self.state {
            ReceiverState::Idle => return Err(StartError::NotBound),
            ReceiverState::Receiving => return Err(StartError::AlreadyRunning),
            ReceiverState::Closed => return Err(StartError::Closed),
            ReceiverState::Bound | ReceiverState::Stopped => {}
        }
        let Some(socket) = self.socket.clone() else {
            return Err(StartError::NotBound);
        };
        // A worker stopped from its own handler may still be finishing.
        if !self.join_worker() {
            return Err(StartError::AlreadyRunning);
        }

        // Fresh flags per run so the new worker does not inherit a stop request.
        self.stop_flag = Arc::new(AtomicBool::new(false));
        self.running_flag = Arc::new(AtomicBool::new(true));

        let worker = ReceiverWorker {
            socket,
            stop_flag: Arc::clone(&self.stop_flag),
            running_flag: Arc::clone(&self.running_flag),
            handler,
            stats: Arc::clone(&self.stats),
            log_sink: Arc::clone(&self.log_sink),
            recv_buffer_size: self.config.recv_buffer_size,
            source_filter: self.source_filter,
        };

        let handle = thread::Builder::new()
            .name("sensor-receiver".into())
            .spawn(move || worker.run())
            .map_err(|e| {
                self.running_flag.store(false, Ordering::SeqCst);
                StartError::Spawn(e)
            })?;

        self.worker = Some(handle);
        self.state = ReceiverState::Receiving;
        Ok(())
    }

    /// Stops the worker and waits for it to exit. No-op unless receiving.
    ///
    /// Called from inside the handler, the worker is told to exit after the
    /// current sample but is not joined (it is the calling thread). The
    /// handle is kept, so a later [`start`](Self::start) or
    /// [`close`](Self::close) from another thread waits for it.
    pub fn stop(&mut self) {
        if self.state != ReceiverState::Receiving {
            return;
        }
        self.stop_flag.store(true, Ordering::SeqCst);
        if self.on_worker_thread() {
            sink_warn!(self.log_sink, "[Receiver] stop requested from the sample handler");
        } else {
            self.join_worker();
        }
        self.state = ReceiverState::Stopped;
        sink_info!(self.log_sink, "[Receiver] stopped");
    }

    /// Stops the worker and releases the socket. Terminal; idempotent.
    ///
    /// From another thread this returns only once the worker has exited and
    /// dropped its socket handle, so the port is free again.
    pub fn close(&mut self) {
        if self.state == ReceiverState::Closed {
            return;
        }
        let was_bound = self.state.is_bound();
        self.stop();
        if !self.join_worker() {
            // Closed from inside the handler: the worker exits on its own.
            self.worker = None;
        }
        self.socket = None;
        self.state = ReceiverState::Closed;
        if was_bound {
            sink_info!(self.log_sink, "[Receiver] closed");
        }
    }

    /// Joins the current worker, if any. `false` when called on the worker
    /// itself, leaving the handle in place.
    fn join_worker(&mut self) -> bool {
        if self.on_worker_thread() {
            return false;
        }
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                sink_error!(self.log_sink, "[Receiver] worker panicked");
                self.running_flag.store(false, Ordering::SeqCst);
            }
        }
        true
    }

    fn on_worker_thread(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|h| h.thread().id() == thread::current().id())
    }

    #[must_use]
    pub fn state(&self) -> ReceiverState {
        self.state
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Actual local address; resolves an ephemeral port.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// `false` once the worker has exited, including after a fatal socket error.
    #[must_use]
    pub fn is_worker_running(&self) -> bool {
        self.running_flag.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    #[must_use]
    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::acquisition::sample::Sample;
    use crate::log::NoopLogSink;

    fn receiver() -> Receiver {
        Receiver::new(ReceiverConfig::loopback_ephemeral(), Arc::new(NoopLogSink))
    }

    #[test]
    fn start_before_bind_is_not_bound() {
        let mut rx = receiver();
        assert!(matches!(rx.start(|_: Sample| {}), Err(StartError::NotBound)));
        assert_eq!(rx.state(), ReceiverState::Idle);
    }

    #[test]
    fn second_bind_is_rejected() {
        let mut rx = receiver();
        rx.bind("127.0.0.1", 9000).expect("bind");
        assert!(matches!(
            rx.bind("127.0.0.1", 9000),
            Err(BindError::AlreadyBound(ReceiverState::Bound))
        ));
        assert_eq!(rx.endpoint(), Some(&Endpoint::new("127.0.0.1", 9000)));
        assert!(rx.local_addr().is_some_and(|a| a.port() != 0));
    }

    #[test]
    fn second_start_is_already_running() {
        let mut rx = receiver();
        rx.bind("127.0.0.1", 9000).expect("bind");
        rx.start(|_: Sample| {}).expect("start");
        assert!(matches!(rx.start(|_: Sample| {}), Err(StartError::AlreadyRunning)));
        rx.stop();
        assert_eq!(rx.state(), ReceiverState::Stopped);
        assert!(!rx.is_worker_running());
        rx.start(|_: Sample| {}).expect("restart after stop");
        rx.close();
        assert_eq!(rx.state(), ReceiverState::Closed);
    }

    #[test]
    fn stop_is_idempotent_and_close_is_terminal() {
        let mut rx = receiver();
        rx.bind("127.0.0.1", 9000).expect("bind");
        rx.stop();
        rx.stop();
        assert_eq!(rx.state(), ReceiverState::Bound);
        rx.close();
        rx.close();
        assert!(rx.local_addr().is_none());
        assert!(matches!(rx.start(|_: Sample| {}), Err(StartError::Closed)));
        assert!(matches!(
            rx.bind("127.0.0.1", 9000),
            Err(BindError::AlreadyBound(ReceiverState::Closed))
        ));
    }

    #[test]
    fn port_in_use_is_reported() {
        let mut first = receiver();
        first.bind("127.0.0.1", 9000).expect("bind");
        let port = first.local_addr().expect("bound").port();

        let mut second = Receiver::new(
            ReceiverConfig {
                local_port: port,
                ..ReceiverConfig::loopback_ephemeral()
            },
            Arc::new(NoopLogSink),
        );
        assert!(matches!(
            second.bind("127.0.0.1", 9000),
            Err(BindError::AddrInUse(a)) if a.port() == port
        ));
        assert_eq!(second.state(), ReceiverState::Idle);
    }

    #[test]
    fn invalid_addresses_are_rejected() {
        let mut rx = receiver();
        assert!(matches!(rx.bind("  ", 9000), Err(BindError::InvalidAddress(_))));

        let mut bad_local = Receiver::new(
            ReceiverConfig {
                local_host: "not-an-ip".into(),
                ..ReceiverConfig::loopback_ephemeral()
            },
            Arc::new(NoopLogSink),
        );
        assert!(matches!(
            bad_local.bind("127.0.0.1", 9000),
            Err(BindError::InvalidAddress(_))
        ));
    }
}
