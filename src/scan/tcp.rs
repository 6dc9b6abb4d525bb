use std::{
    io::ErrorKind,
    net::{SocketAddr, SocketAddrV4, TcpStream},
    time::Duration,
};

use super::{PortState, Probe, PROBE_TIMEOUT};

/// Full TCP connect probe.
#[derive(Debug, Clone, Copy)]
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(PROBE_TIMEOUT)
    }
}

impl Probe for TcpProbe {
    fn probe(&self, addr: SocketAddrV4) -> PortState {
        // The stream is dropped right away, closing the socket.
        TcpStream::connect_timeout(&SocketAddr::V4(addr), self.timeout)
            .map_or_else(|e| classify(e.kind()), |_| PortState::Open)
    }
}

fn classify(kind: ErrorKind) -> PortState {
    match kind {
        ErrorKind::ConnectionRefused | ErrorKind::TimedOut | ErrorKind::WouldBlock => {
            PortState::Closed
        }
        kind => PortState::Error(kind),
    }
}
