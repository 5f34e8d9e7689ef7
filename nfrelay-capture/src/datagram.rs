use std::net::SocketAddr;

use bytes::Bytes;

/// One received datagram and the address it came from.
#[derive(Debug, Clone)]
pub struct Datagram {
    pub payload: Bytes,
    pub source: SocketAddr,
}

impl Datagram {
    /// Copies `data` out of the receive buffer.
    pub fn copy_from(data: &[u8], source: SocketAddr) -> Self {
        Datagram {
            payload: Bytes::copy_from_slice(data),
            source,
        }
    }
}
