//! A server that accepts connections and never answers.
//!
//! Used to simulate an endpoint that is reachable but unresponsive: probes
//! and balance calls against it only ever settle via their timeouts.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

/// Listens on an ephemeral local port, reads whatever arrives, and goes
/// silent. Connections are held open until the test ends.
pub struct HangingServer {
    addr: SocketAddr,
}

impl HangingServer {
    /// Binds the listener and spawns the accept loop.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    // Hold the connection open without ever responding.
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    drop(socket);
                });
            }
        });

        Ok(Self { addr })
    }

    /// The server's HTTP URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}
