//! TCP reliable transport.
//!
//! Each reliable send opens a connection, writes one length-prefixed frame
//! and waits for a single acknowledgement byte. The listener acknowledges
//! a frame once it has decoded it, then dispatches it on its own task so a
//! slow registry call never delays the sender.
//!
//! Every listener-side read and write is bounded by the connection timeout.
//! That includes the wait for the next frame: a connection left idle for
//! longer is closed, so senders that keep one open between frames must
//! reconnect. [`TcpTransport`] opens one per frame and never idles.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, error, info, warn};

use hive_protocol::{FrameReader, FrameWriter, decode_frame};

use crate::config::PeerConfig;
use crate::error::{PeerResult, TransportError};
use crate::membership::Endpoint;
use crate::peer::LocalPeer;
use crate::transport::ReliableTransport;

/// Acknowledgement byte written after each accepted frame.
pub const ACK: u8 = 0x06;

/// Sends frames over short-lived TCP connections.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    timeout: Duration,
}

impl TcpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_config(config: &PeerConfig) -> Self {
        Self::new(config.connection_timeout())
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, TransportError>>,
    ) -> Result<T, TransportError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| TransportError::Timeout { operation })?
    }
}

#[async_trait]
impl ReliableTransport for TcpTransport {
    async fn send_reliable(
        &self,
        endpoint: &Endpoint,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        let address = endpoint.address;
        let stream = self
            .bounded("connect", async {
                TcpStream::connect(address)
                    .await
                    .map_err(|source| TransportError::Connect {
                        address: address.to_string(),
                        source,
                    })
            })
            .await?;

        let mut writer = FrameWriter::new(stream);
        self.bounded("write frame", async {
            writer.write_body(&payload).await?;
            writer.flush().await?;
            Ok(())
        })
        .await?;

        let mut stream = writer.into_inner();
        let mut ack = [0u8; 1];
        self.bounded("read acknowledgement", async {
            let read = stream.read_exact(&mut ack).await;
            match read {
                Ok(_) if ack[0] == ACK => Ok(()),
                Ok(_) => Err(TransportError::MissingAck {
                    address: address.to_string(),
                }),
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    Err(TransportError::MissingAck {
                        address: address.to_string(),
                    })
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }
}

/// Accepts peer connections and feeds their frames to a [`LocalPeer`].
pub struct PeerListener {
    listener: TcpListener,
    connection_semaphore: Arc<Semaphore>,
    timeout: Duration,
}

impl PeerListener {
    /// Binds to `config.bind_address`.
    pub async fn bind(config: &PeerConfig) -> PeerResult<Self> {
        let listener = TcpListener::bind(config.bind_address).await?;
        info!(
            node = %config.node_name,
            address = %listener.local_addr()?,
            "Peer listener bound"
        );
        Ok(Self {
            listener,
            connection_semaphore: Arc::new(Semaphore::new(config.max_connections)),
            timeout: config.connection_timeout(),
        })
    }

    /// The bound address; useful when binding to port 0.
    pub fn local_addr(&self) -> PeerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop until an unrecoverable error.
    pub async fn run(&self, peer: Arc<LocalPeer>) -> PeerResult<()> {
        loop {
            let Ok(permit) = self.connection_semaphore.clone().acquire_owned().await else {
                return Ok(());
            };
            match self.listener.accept().await {
                Ok((stream, remote)) => {
                    debug!(%remote, "Accepted peer connection");
                    tokio::spawn(serve_connection(stream, peer.clone(), self.timeout, permit));
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept peer connection");
                }
            }
        }
    }

    /// Runs the accept loop until `shutdown` completes.
    pub async fn run_until_shutdown<S>(&self, peer: Arc<LocalPeer>, shutdown: S) -> PeerResult<()>
    where
        S: Future<Output = ()> + Send,
    {
        tokio::select! {
            result = self.run(peer) => result,
            _ = shutdown => {
                info!("Peer listener shutting down");
                Ok(())
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: Arc<LocalPeer>,
    timeout: Duration,
    _permit: OwnedSemaphorePermit,
) {
    let mut reader = FrameReader::new(stream);
    loop {
        let body = match tokio::time::timeout(timeout, reader.read_body()).await {
            Ok(Ok(Some(body))) => body,
            Ok(Ok(None)) => return,
            Ok(Err(e)) => {
                warn!(error = %e, "Closing peer connection after read error");
                return;
            }
            Err(_) => {
                debug!(?timeout, "Closing idle peer connection");
                return;
            }
        };

        let frame = match decode_frame(&body) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Closing peer connection after undecodable frame");
                return;
            }
        };

        match tokio::time::timeout(timeout, reader.get_mut().write_all(&[ACK])).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to acknowledge frame");
                return;
            }
            Err(_) => {
                warn!(?timeout, "Timed out acknowledging frame");
                return;
            }
        }

        let peer = peer.clone();
        tokio::spawn(async move {
            // Failures are logged by the peer; nobody else is listening.
            let _ = peer.on_frame(frame).await;
        });
    }
}
