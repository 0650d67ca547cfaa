use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

pub const LOOPBACK: Ipv4Addr = Ipv4Addr::LOCALHOST;
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Loopback listener that writes `greeting` to every client it accepts.
///
/// An empty greeting gives a service that accepts and stays silent.
pub async fn spawn_service(greeting: &'static str) -> u16 {
    let listener = TcpListener::bind((LOOPBACK, 0))
        .await
        .expect("bind loopback listener");
    let port = listener.local_addr().expect("listener address").port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                if !greeting.is_empty() {
                    let _ = stream.write_all(greeting.as_bytes()).await;
                }
                // Keep the socket open long enough for the banner read.
                tokio::time::sleep(Duration::from_secs(1)).await;
            });
        }
    });

    port
}

/// A loopback port that nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind(SocketAddr::from((LOOPBACK, 0)))
        .await
        .expect("bind loopback listener");
    let port = listener.local_addr().expect("listener address").port();
    drop(listener);
    port
}
