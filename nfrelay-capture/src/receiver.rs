use std::io;
use std::net::SocketAddr;

use socket2::SockRef;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::datagram::Datagram;

/// Receive buffer size per read; anything beyond it is truncated by the kernel.
pub const MAX_DATAGRAM_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to set receive buffer to {requested} bytes: {source}")]
    ReceiveBuffer {
        requested: usize,
        #[source]
        source: io::Error,
    },
}

/// Bound UDP socket feeding the decode pipeline.
#[derive(Debug)]
pub struct UdpReceiver {
    socket: UdpSocket,
}

impl UdpReceiver {
    /// Binds `listen` and sets the socket's `SO_RCVBUF` to
    /// `receive_buffer_bytes` (0 keeps the kernel default).
    pub async fn bind(listen: &str, receive_buffer_bytes: usize) -> Result<Self, CaptureError> {
        let socket = UdpSocket::bind(listen)
            .await
            .map_err(|source| CaptureError::Bind {
                addr: listen.to_string(),
                source,
            })?;
        configure_receive_buffer(&socket, receive_buffer_bytes)?;

        if let Ok(local) = socket.local_addr() {
            info!("listening for NetFlow v5 on {}", local);
        }
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Reads datagrams forever, handing each one to `dispatch` as soon as it
    /// arrives. `dispatch` must not wait on the work it starts.
    ///
    /// Read errors are logged and the loop carries on.
    pub async fn run<F>(self, mut dispatch: F)
    where
        F: FnMut(Datagram),
    {
        let mut buffer = vec![0_u8; MAX_DATAGRAM_LEN];
        loop {
            match self.socket.recv_from(&mut buffer).await {
                Ok((received, source)) => {
                    dispatch(Datagram::copy_from(&buffer[..received], source));
                }
                Err(e) => {
                    warn!("udp recv error: {}", e);
                }
            }
        }
    }
}

fn configure_receive_buffer(socket: &UdpSocket, requested: usize) -> Result<(), CaptureError> {
    if requested == 0 {
        return Ok(());
    }

    let sock = SockRef::from(socket);
    sock.set_recv_buffer_size(requested)
        .map_err(|source| CaptureError::ReceiveBuffer { requested, source })?;

    match sock.recv_buffer_size() {
        Ok(actual) if actual < requested => {
            warn!(
                "receive buffer is below requested size: requested={} actual={}",
                requested, actual
            );
        }
        Ok(actual) => {
            info!(
                "receive buffer configured: requested={} actual={}",
                requested, actual
            );
        }
        Err(e) => {
            warn!("could not read back receive buffer size: {}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_dispatches_each_datagram_with_sender() {
        let receiver = UdpReceiver::bind("127.0.0.1:0", 65_536).await.unwrap();
        let target = receiver.local_addr().unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(receiver.run(move |datagram| {
            let _ = tx.send(datagram);
        }));

        let exporter = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        exporter.send_to(b"first", target).unwrap();
        exporter.send_to(b"second", target).unwrap();

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&first.payload[..], b"first");
        assert_eq!(&second.payload[..], b"second");
        assert_eq!(first.source, exporter.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_oversized_datagram_is_truncated() {
        let receiver = UdpReceiver::bind("127.0.0.1:0", 0).await.unwrap();
        let target = receiver.local_addr().unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(receiver.run(move |datagram| {
            let _ = tx.send(datagram);
        }));

        let exporter = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        exporter.send_to(&[7_u8; MAX_DATAGRAM_LEN + 100], target).unwrap();

        let datagram = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(datagram.payload.len(), MAX_DATAGRAM_LEN);
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let result = UdpReceiver::bind("127.0.0.1", 0).await;
        assert!(matches!(result, Err(CaptureError::Bind { .. })));
    }
}
