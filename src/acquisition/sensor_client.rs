use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, mpsc::Sender},
};

use crate::{
    acquisition::{
        client_error::ClientError,
        client_event::ClientEvent,
        endpoint::Endpoint,
        lifecycle_error::{ClientOp, LifecycleError},
        receiver::Receiver,
        receiver_config::ReceiverConfig,
        receiver_state::ReceiverState,
        receiver_stats::StatsSnapshot,
        sample_handler::SampleHandler,
        start_error::StartError,
    },
    log::log_sink::LogSink,
    sink_debug,
};

/// Public entry point driven by the presentation layer.
///
/// Wraps one [`Receiver`] behind a mutex so every operation can be called
/// from any thread, validates each transition against the current state
/// and publishes [`ClientEvent`]s on success.
///
/// ```text
/// Idle --bind--> Bound --start--> Receiving --stop--> Stopped --start--> ...
/// Bound | Receiving | Stopped --close--> Closed
/// ```
///
/// A sample handler may call [`stop_receiving`](Self::stop_receiving) on its
/// own client. The worker then exits after that sample, and the next
/// `start_receiving` or `close` from another thread waits for it. Other
/// threads must not call into the client while the handler is blocked on it.
pub struct SensorClient {
    receiver: Mutex<Receiver>,
    events: Option<Sender<ClientEvent>>,
    log_sink: Arc<dyn LogSink>,
}

impl SensorClient {
    #[must_use]
    pub fn new(config: ReceiverConfig, log_sink: Arc<dyn LogSink>) -> Self {
        Self {
            receiver: Mutex::new(Receiver::new(config, Arc::clone(&log_sink))),
            events: None,
            log_sink,
        }
    }

    /// Publishes state changes on `tx`. A dropped receiver is ignored.
    #[must_use]
    pub fn with_events(mut self, tx: Sender<ClientEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Binds the local socket and records the expected peer.
    ///
    /// # Errors
    /// [`ClientError::Lifecycle`] unless `Idle`; [`ClientError::Bind`] if
    /// the socket cannot be opened (the client stays `Idle`).
    pub fn bind(&self, host: &str, port: u16) -> Result<(), ClientError> {
        let mut rx = self.lock();
        if rx.state() != ReceiverState::Idle {
            return Err(Self::invalid(rx.state(), ClientOp::Bind));
        }
        rx.bind(host, port)?;
        let endpoint = rx.endpoint().cloned().unwrap_or_else(|| Endpoint::new(host, port));
        drop(rx);
        self.emit(ClientEvent::Connected(endpoint));
        Ok(())
    }

    /// Starts delivering parsed samples to `handler` on the worker thread.
    ///
    /// # Errors
    /// [`StartError::NotBound`] before bind, [`StartError::AlreadyRunning`]
    /// while receiving, [`ClientError::Lifecycle`] after close.
    pub fn start_receiving<H: SampleHandler + 'static>(&self, handler: H) -> Result<(), ClientError> {
        let mut rx = self.lock();
        match rx.state() {
            ReceiverState::Idle => return Err(StartError::NotBound.into()),
            ReceiverState::Receiving => return Err(StartError::AlreadyRunning.into()),
            ReceiverState::Closed => return Err(Self::invalid(ReceiverState::Closed, ClientOp::Start)),
            ReceiverState::Bound | ReceiverState::Stopped => {}
        }
        rx.start_boxed(Box::new(handler))?;
        drop(rx);
        self.emit(ClientEvent::MonitoringStarted);
        Ok(())
    }

    /// Stops delivery and waits for the worker to exit.
    ///
    /// No-op when bound but not receiving, or when closed.
    ///
    /// # Errors
    /// [`ClientError::Lifecycle`] when `Idle`.
    pub fn stop_receiving(&self) -> Result<(), ClientError> {
        let mut rx = self.lock();
        match rx.state() {
            ReceiverState::Idle => Err(Self::invalid(ReceiverState::Idle, ClientOp::Stop)),
            ReceiverState::Receiving => {
                rx.stop();
                drop(rx);
                self.emit(ClientEvent::MonitoringStopped);
                Ok(())
            }
            ReceiverState::Bound | ReceiverState::Stopped | ReceiverState::Closed => Ok(()),
        }
    }

    /// Stops delivery if needed and releases the socket. Terminal.
    ///
    /// # Errors
    /// [`ClientError::Lifecycle`] when `Idle`; closing twice is a no-op.
    pub fn close(&self) -> Result<(), ClientError> {
        let mut rx = self.lock();
        let state = rx.state();
        match state {
            ReceiverState::Idle => return Err(Self::invalid(state, ClientOp::Close)),
            ReceiverState::Closed => return Ok(()),
            ReceiverState::Bound | ReceiverState::Receiving | ReceiverState::Stopped => {}
        }
        rx.close();
        drop(rx);
        if state == ReceiverState::Receiving {
            self.emit(ClientEvent::MonitoringStopped);
        }
        self.emit(ClientEvent::Disconnected);
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> ReceiverState {
        self.lock().state()
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.lock().endpoint().cloned()
    }

    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.lock().local_addr()
    }

    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.lock().stats()
    }

    #[must_use]
    pub fn is_worker_running(&self) -> bool {
        self.lock().is_worker_running()
    }

    fn lock(&self) -> MutexGuard<'_, Receiver> {
        match self.receiver.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn invalid(state: ReceiverState, operation: ClientOp) -> ClientError {
        LifecycleError { state, operation }.into()
    }

    fn emit(&self, event: ClientEvent) {
        sink_debug!(self.log_sink, "[SensorClient] {event:?}");
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
