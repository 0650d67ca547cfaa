//! Single TCP probes and the bounded pool that runs many of them.
//!
//! A probe is a plain connect-handshake. It never sends a payload; when banner
//! grabbing is enabled it only waits briefly for whatever the service says on
//! its own. Every failure mode (refused, unreachable, timed out) collapses into
//! `reachable == false`.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lanscope_common::models::ProbeResult;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::task::{JoinError, JoinSet};
use tokio::time::timeout;
use tracing::{trace, warn};

/// Strategy for testing whether one `(address, port)` pair accepts connections.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, address: Ipv4Addr, port: u16, timeout: Duration) -> ProbeResult;
}

/// Limits for the optional read of a service's greeting.
#[derive(Debug, Clone, Copy)]
pub struct BannerSettings {
    pub wait: Duration,
    pub limit: usize,
}

/// Real prober backed by `tokio::net::TcpStream`.
#[derive(Debug, Clone, Default)]
pub struct TcpProber {
    banner: Option<BannerSettings>,
}

impl TcpProber {
    /// Handshake only, no banner read. Used for discovery.
    pub fn handshake() -> Self {
        Self { banner: None }
    }

    pub fn with_banner(wait: Duration, limit: usize) -> Self {
        Self {
            banner: Some(BannerSettings { wait, limit }),
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, address: Ipv4Addr, port: u16, probe_timeout: Duration) -> ProbeResult {
        let socket_addr = SocketAddr::from((address, port));
        let started = Instant::now();

        match timeout(probe_timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(mut stream)) => {
                let latency = started.elapsed();
                trace!("{socket_addr} accepted in {latency:?}");
                let banner = match self.banner {
                    Some(settings) => read_banner(&mut stream, settings).await,
                    None => None,
                };
                ProbeResult::reachable(address, port, latency).with_banner(banner)
            }
            Ok(Err(e)) => {
                trace!("{socket_addr} failed: {e}");
                ProbeResult::unreachable(address, port, started.elapsed())
            }
            Err(_elapsed) => {
                trace!("{socket_addr} timed out");
                ProbeResult::unreachable(address, port, started.elapsed())
            }
        }
    }
}

async fn read_banner(stream: &mut TcpStream, settings: BannerSettings) -> Option<String> {
    let mut buf = vec![0u8; settings.limit.max(1)];
    match timeout(settings.wait, stream.read(&mut buf)).await {
        Ok(Ok(n)) if n > 0 => clean_banner(&buf[..n]),
        _ => None,
    }
}

/// Turns raw greeting bytes into a single printable line.
pub fn clean_banner(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Runs `prober` against every target with at most `limit` probes in flight.
///
/// Returns once every probe has finished. Results come back in completion
/// order; a probe task that panics is logged and dropped.
pub async fn probe_all<I>(
    prober: Arc<dyn Prober>,
    targets: I,
    probe_timeout: Duration,
    limit: usize,
) -> Vec<ProbeResult>
where
    I: IntoIterator<Item = (Ipv4Addr, u16)>,
{
    let jobs = targets.into_iter().map(move |(address, port)| {
        let prober = Arc::clone(&prober);
        async move { prober.probe(address, port, probe_timeout).await }
    });

    let mut results: Vec<ProbeResult> = Vec::new();
    run_bounded(jobs, limit, |result| results.push(result)).await;
    results
}

/// Spawns `jobs` with at most `limit` tasks held at once.
///
/// A finished task is joined and handed to `on_done` before the next job is
/// spawned, so tasks held never grow past `limit` however many jobs there are.
async fn run_bounded<T, F>(
    jobs: impl IntoIterator<Item = F>,
    limit: usize,
    mut on_done: impl FnMut(T),
) where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let limit = limit.max(1);
    let mut tasks: JoinSet<T> = JoinSet::new();

    for job in jobs {
        while tasks.len() >= limit {
            match tasks.join_next().await {
                Some(joined) => deliver(joined, &mut on_done),
                None => break,
            }
        }
        tasks.spawn(job);
    }

    while let Some(joined) = tasks.join_next().await {
        deliver(joined, &mut on_done);
    }
}

fn deliver<T>(joined: Result<T, JoinError>, on_done: &mut impl FnMut(T)) {
    match joined {
        Ok(value) => on_done(value),
        Err(e) => warn!("Probe task did not complete: {e}"),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
