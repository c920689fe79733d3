use std::{
    io,
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
    ops::Range,
};

use rand::Rng;

use crate::acquisition::sample::{CHANNEL_COUNT, Sample};

/// Plausible value ranges per channel: alcohol, air quality, humidity, radiation.
pub const CHANNEL_RANGES: [Range<f64>; CHANNEL_COUNT] =
    [0.0..100.0, 0.0..100.0, 20.0..90.0, 0.0..0.5];

/// Sends sensor frames to a receiver, one sample per datagram.
pub struct SensorEmitter {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl SensorEmitter {
    /// Binds an ephemeral local socket aimed at `remote`.
    ///
    /// # Errors
    /// Fails if `remote` does not resolve or the socket cannot be bound.
    pub fn new<A: ToSocketAddrs>(remote: A) -> io::Result<Self> {
        let remote = remote
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no address"))?;
        let local: SocketAddr = if remote.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        Ok(Self { socket, remote })
    }

    /// # Errors
    /// Propagates the send failure.
    pub fn send_sample(&self, sample: &Sample) -> io::Result<usize> {
        self.send_raw(format_frame(sample).as_bytes())
    }

    /// Sends an arbitrary payload, well-formed or not.
    ///
    /// # Errors
    /// Propagates the send failure.
    pub fn send_raw(&self, payload: &[u8]) -> io::Result<usize> {
        self.socket.send_to(payload, self.remote)
    }

    #[must_use]
    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    /// # Errors
    /// Fails if the socket has no local address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

/// Wire encoding with two decimals: `"12.50, 33.10, 60.00, 0.02"`.
#[must_use]
pub fn format_frame(sample: &Sample) -> String {
    let [a, b, c, d] = *sample.values();
    format!("{a:.2}, {b:.2}, {c:.2}, {d:.2}")
}

/// A random reading within [`CHANNEL_RANGES`].
pub fn random_sample<R: Rng>(rng: &mut R) -> Sample {
    Sample::new(std::array::from_fn(|i| rng.gen_range(CHANNEL_RANGES[i].clone())))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::acquisition::frame_parser::parse;

    #[test]
    fn formats_reference_frame() {
        let s = Sample::new([12.5, 33.1, 60.0, 0.02]);
        assert_eq!(format_frame(&s), "12.50, 33.10, 60.00, 0.02");
        assert_eq!(parse(format_frame(&s).as_bytes()), Ok(s));
    }

    #[test]
    fn random_samples_stay_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let s = random_sample(&mut rng);
            for (v, r) in s.values().iter().zip(CHANNEL_RANGES.iter()) {
                assert!(r.contains(v), "{v} outside {r:?}");
            }
        }
    }
}
