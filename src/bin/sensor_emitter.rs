//! Sends random sensor frames to a monitor.
//!
//! Usage: `sensor_emitter [addr] [interval_ms] [count]`
//! Defaults: `127.0.0.1:8080`, `100`, unlimited.

use sensorlink::emitter::{SensorEmitter, format_frame, random_sample};
use std::{env, process::ExitCode, thread, time::Duration};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let addr = args.get(1).map_or("127.0.0.1:8080", String::as_str);
    let interval_ms: u64 = match args.get(2).map(|s| s.parse()) {
        None => 100,
        Some(Ok(ms)) => ms,
        Some(Err(e)) => {
            eprintln!("invalid interval: {e}");
            return ExitCode::FAILURE;
        }
    };
    let count: Option<u64> = match args.get(3).map(|s| s.parse()) {
        None => None,
        Some(Ok(n)) => Some(n),
        Some(Err(e)) => {
            eprintln!("invalid count: {e}");
            return ExitCode::FAILURE;
        }
    };

    let emitter = match SensorEmitter::new(addr) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("cannot reach {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Sending to {} every {interval_ms} ms", emitter.remote());

    let mut rng = rand::thread_rng();
    let mut sent: u64 = 0;
    while count.is_none_or(|n| sent < n) {
        let sample = random_sample(&mut rng);
        if let Err(e) = emitter.send_sample(&sample) {
            eprintln!("send failed: {e}");
        } else {
            println!("{}", format_frame(&sample));
        }
        sent += 1;
        thread::sleep(Duration::from_millis(interval_ms));
    }
    ExitCode::SUCCESS
}
