#![allow(clippy::unwrap_used, clippy::expect_used)]

use sensorlink::{
    acquisition::{
        ChannelSampleHandler, ReceiverConfig, ReceiverState, Sample, SensorClient,
    },
    emitter::SensorEmitter,
    history::MAX_HISTORY,
    log::{MemoryLogSink, NoopLogSink, log_level::LogLevel},
    monitor::SensorMonitor,
};
use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::{Duration, Instant},
};

const WAIT: Duration = Duration::from_secs(5);

fn loopback_config() -> ReceiverConfig {
    ReceiverConfig {
        read_timeout: Duration::from_millis(20),
        ..ReceiverConfig::loopback_ephemeral()
    }
}

fn bound_client(sink: Arc<dyn sensorlink::log::log_sink::LogSink>) -> (SensorClient, SocketAddr) {
    let client = SensorClient::new(loopback_config(), sink);
    client.bind("127.0.0.1", 9000).expect("bind");
    let addr = client.local_addr().expect("bound address");
    (client, addr)
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

#[test]
fn single_frame_is_delivered_once() {
    let (client, addr) = bound_client(Arc::new(NoopLogSink));
    let got = Arc::new(Mutex::new(Vec::new()));
    let got2 = Arc::clone(&got);
    client
        .start_receiving(move |s: Sample| got2.lock().unwrap().push(s))
        .expect("start");

    let emitter = SensorEmitter::new(addr).expect("emitter");
    emitter.send_raw(b"1.0,2.0,3.0,4.0").expect("send");

    assert!(wait_until(|| got.lock().unwrap().len() == 1));
    thread::sleep(Duration::from_millis(50));
    assert_eq!(*got.lock().unwrap(), vec![Sample::new([1.0, 2.0, 3.0, 4.0])]);
    assert_eq!(client.stats().delivered, 1);

    client.close().expect("close");
}

#[test]
fn malformed_frame_is_skipped_and_reported() {
    let sink = MemoryLogSink::new();
    let (client, addr) = bound_client(Arc::new(sink.clone()));
    let monitor = SensorMonitor::new(MAX_HISTORY);
    client.start_receiving(monitor.recorder()).expect("start");

    let emitter = SensorEmitter::new(addr).expect("emitter");
    emitter.send_raw(b"1.0,2.0,3.0").expect("send");
    emitter.send_raw(b"5,6,7,8").expect("send");

    assert!(wait_until(|| {
        let s = client.stats();
        s.delivered == 1 && s.parse_failures == 1
    }));
    client.stop_receiving().expect("stop");

    let history = monitor.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history.latest(), Some(Sample::new([5.0, 6.0, 7.0, 8.0])));
    assert_eq!(sink.count_matching(LogLevel::Warn, "expected 4 fields, got 3"), 1);
}

#[test]
fn oversized_datagram_is_discarded_whole() {
    let sink = MemoryLogSink::new();
    let (client, addr) = bound_client(Arc::new(sink.clone()));
    let got = Arc::new(Mutex::new(Vec::new()));
    let got2 = Arc::clone(&got);
    client
        .start_receiving(move |s: Sample| got2.lock().unwrap().push(s))
        .expect("start");

    // Five fields, the fifth past the 1024-byte receive buffer.
    let mut frame = format!("{:<1100}", "1,2,3,4").into_bytes();
    frame.extend_from_slice(b",5");
    let emitter = SensorEmitter::new(addr).expect("emitter");
    emitter.send_raw(&frame).expect("send");
    emitter.send_raw(b"5,6,7,8").expect("send");

    assert!(wait_until(|| {
        let s = client.stats();
        s.delivered == 1 && s.parse_failures == 1
    }));
    client.stop_receiving().expect("stop");

    assert_eq!(*got.lock().unwrap(), vec![Sample::new([5.0, 6.0, 7.0, 8.0])]);
    assert_eq!(sink.count_matching(LogLevel::Warn, "exceeds 1024 bytes"), 1);
}

#[test]
fn handler_can_stop_its_own_client() {
    let (client, addr) = bound_client(Arc::new(NoopLogSink));
    let client = Arc::new(client);
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_done = Arc::new(AtomicBool::new(false));
    let (stopped_tx, stopped_rx) = mpsc::channel();

    let (me, c, done) = (
        Arc::clone(&client),
        Arc::clone(&calls),
        Arc::clone(&handler_done),
    );
    client
        .start_receiving(move |_: Sample| {
            c.fetch_add(1, Ordering::SeqCst);
            me.stop_receiving().expect("stop from handler");
            stopped_tx.send(()).expect("signal");
            thread::sleep(Duration::from_millis(300));
            done.store(true, Ordering::SeqCst);
        })
        .expect("start");

    let emitter = SensorEmitter::new(addr).expect("emitter");
    emitter.send_raw(b"1,2,3,4").expect("send");
    stopped_rx.recv_timeout(WAIT).expect("handler stopped the client");
    assert_eq!(client.state(), ReceiverState::Stopped);
    for _ in 0..3 {
        emitter.send_raw(b"5,6,7,8").expect("send");
    }

    client.close().expect("close");
    assert!(handler_done.load(Ordering::SeqCst), "close returned mid-handler");
    assert!(!client.is_worker_running());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let again = SensorClient::new(
        ReceiverConfig {
            local_port: addr.port(),
            ..loopback_config()
        },
        Arc::new(NoopLogSink),
    );
    again.bind("127.0.0.1", 9000).expect("port is free again");
    again.close().expect("close");
}

#[test]
fn restart_waits_for_worker_stopped_by_its_handler() {
    let (client, addr) = bound_client(Arc::new(NoopLogSink));
    let client = Arc::new(client);
    let first_done = Arc::new(AtomicBool::new(false));
    let (stopped_tx, stopped_rx) = mpsc::channel();

    let (me, done) = (Arc::clone(&client), Arc::clone(&first_done));
    client
        .start_receiving(move |_: Sample| {
            me.stop_receiving().expect("stop from handler");
            stopped_tx.send(()).expect("signal");
            thread::sleep(Duration::from_millis(300));
            done.store(true, Ordering::SeqCst);
        })
        .expect("start");

    let emitter = SensorEmitter::new(addr).expect("emitter");
    emitter.send_raw(b"1,1,1,1").expect("send");
    stopped_rx.recv_timeout(WAIT).expect("handler stopped the client");

    let (tx, rx) = mpsc::channel();
    client
        .start_receiving(ChannelSampleHandler::new(tx))
        .expect("restart");
    assert!(first_done.load(Ordering::SeqCst), "two workers were alive at once");

    emitter.send_raw(b"2,2,2,2").expect("send");
    assert_eq!(rx.recv_timeout(WAIT).expect("sample"), Sample::new([2.0; 4]));
    client.close().expect("close");
}

#[test]
fn history_keeps_last_thousand_of_1005() {
    let (client, addr) = bound_client(Arc::new(NoopLogSink));
    let monitor = SensorMonitor::new(MAX_HISTORY);
    client.start_receiving(monitor.recorder()).expect("start");

    let emitter = SensorEmitter::new(addr).expect("emitter");
    for k in 1..=1005u64 {
        let v = k as f64;
        emitter
            .send_sample(&Sample::new([v, v * 2.0, v * 3.0, v * 4.0]))
            .expect("send");
        // One in flight at a time so the transport buffer never overflows.
        assert!(wait_until(|| client.stats().delivered >= k), "frame {k} not delivered");
    }
    client.close().expect("close");

    let history = monitor.history();
    assert_eq!(history.len(), 1000);
    for c in 0..4 {
        assert_eq!(history.channel(c).unwrap().len(), 1000);
    }
    let first = history.channel(0).unwrap();
    assert_eq!(first.front().copied(), Some(6.0));
    assert_eq!(first.back().copied(), Some(1005.0));
    assert_eq!(history.channel(3).unwrap().front().copied(), Some(24.0));
}

#[test]
fn no_delivery_after_stop_returns() {
    let (client, addr) = bound_client(Arc::new(NoopLogSink));
    let delivered = Arc::new(AtomicUsize::new(0));
    let late = Arc::new(AtomicUsize::new(0));
    let stop_returned = Arc::new(AtomicBool::new(false));

    let (d, l, s) = (
        Arc::clone(&delivered),
        Arc::clone(&late),
        Arc::clone(&stop_returned),
    );
    client
        .start_receiving(move |_: Sample| {
            if s.load(Ordering::SeqCst) {
                l.fetch_add(1, Ordering::SeqCst);
            }
            d.fetch_add(1, Ordering::SeqCst);
        })
        .expect("start");

    let flooding = Arc::new(AtomicBool::new(true));
    let flood_flag = Arc::clone(&flooding);
    let flooder = thread::spawn(move || {
        let emitter = SensorEmitter::new(addr).expect("emitter");
        while flood_flag.load(Ordering::SeqCst) {
            let _ = emitter.send_raw(b"1,2,3,4");
        }
    });

    assert!(wait_until(|| delivered.load(Ordering::SeqCst) > 10));
    client.stop_receiving().expect("stop");
    stop_returned.store(true, Ordering::SeqCst);
    let at_stop = delivered.load(Ordering::SeqCst);
    assert!(!client.is_worker_running());

    thread::sleep(Duration::from_millis(200));
    flooding.store(false, Ordering::SeqCst);
    flooder.join().expect("flooder");

    assert_eq!(delivered.load(Ordering::SeqCst), at_stop);
    assert_eq!(late.load(Ordering::SeqCst), 0);
    assert_eq!(client.state(), ReceiverState::Stopped);
    client.close().expect("close");
}

#[test]
fn restart_after_stop_resumes_delivery() {
    let (client, addr) = bound_client(Arc::new(NoopLogSink));
    let emitter = SensorEmitter::new(addr).expect("emitter");
    let (tx, rx) = mpsc::channel();

    client
        .start_receiving(ChannelSampleHandler::new(tx.clone()))
        .expect("start");
    emitter.send_raw(b"1,1,1,1").expect("send");
    assert_eq!(rx.recv_timeout(WAIT).expect("first"), Sample::new([1.0; 4]));
    client.stop_receiving().expect("stop");

    client
        .start_receiving(ChannelSampleHandler::new(tx))
        .expect("restart");
    emitter.send_raw(b"2,2,2,2").expect("send");
    assert_eq!(rx.recv_timeout(WAIT).expect("second"), Sample::new([2.0; 4]));
    assert_eq!(client.stats().delivered, 2);
    client.close().expect("close");
}

#[test]
fn samples_arrive_in_send_order() {
    let (client, addr) = bound_client(Arc::new(NoopLogSink));
    let (tx, rx) = mpsc::channel();
    client
        .start_receiving(ChannelSampleHandler::new(tx))
        .expect("start");

    let emitter = SensorEmitter::new(addr).expect("emitter");
    for i in 0..50 {
        emitter
            .send_sample(&Sample::new([f64::from(i), 0.0, 0.0, 0.0]))
            .expect("send");
    }
    let order: Vec<f64> = (0..50)
        .map(|_| rx.recv_timeout(WAIT).expect("sample")[0])
        .collect();
    let expected: Vec<f64> = (0..50).map(f64::from).collect();
    assert_eq!(order, expected);
    client.close().expect("close");
}

#[test]
fn close_releases_the_port() {
    let (client, addr) = bound_client(Arc::new(NoopLogSink));
    client.start_receiving(|_: Sample| {}).expect("start");
    client.close().expect("close");
    assert_eq!(client.local_addr(), None);

    let again = SensorClient::new(
        ReceiverConfig {
            local_port: addr.port(),
            ..loopback_config()
        },
        Arc::new(NoopLogSink),
    );
    again.bind("127.0.0.1", 9000).expect("port is free again");
    again.close().expect("close");
}

#[test]
fn source_filter_drops_foreign_datagrams() {
    let sink = MemoryLogSink::new();
    let client = SensorClient::new(
        ReceiverConfig {
            filter_source: true,
            ..loopback_config()
        },
        Arc::new(sink.clone()),
    );
    client.bind("127.0.0.2", 9000).expect("bind");
    let addr = client.local_addr().expect("bound");
    let got = Arc::new(AtomicUsize::new(0));
    let got2 = Arc::clone(&got);
    client
        .start_receiving(move |_: Sample| {
            got2.fetch_add(1, Ordering::SeqCst);
        })
        .expect("start");

    // Sent from 127.0.0.1, not the configured 127.0.0.2.
    SensorEmitter::new(addr)
        .expect("emitter")
        .send_raw(b"1,2,3,4")
        .expect("send");

    assert!(wait_until(|| client.stats().rejected == 1));
    assert_eq!(got.load(Ordering::SeqCst), 0);
    assert_eq!(client.stats().delivered, 0);
    assert_eq!(sink.count_matching(LogLevel::Warn, "unexpected source"), 1);
    client.close().expect("close");
}

#[test]
fn default_accepts_any_source() {
    let client = SensorClient::new(loopback_config(), Arc::new(NoopLogSink));
    client.bind("127.0.0.2", 9000).expect("bind");
    let addr = client.local_addr().expect("bound");
    let (tx, rx) = mpsc::channel();
    client
        .start_receiving(ChannelSampleHandler::new(tx))
        .expect("start");

    SensorEmitter::new(addr)
        .expect("emitter")
        .send_raw(b"9,8,7,6")
        .expect("send");
    assert_eq!(
        rx.recv_timeout(WAIT).expect("sample"),
        Sample::new([9.0, 8.0, 7.0, 6.0])
    );
    client.close().expect("close");
}
