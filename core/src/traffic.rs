//! Interface throughput sampling.
//!
//! Reads the cumulative byte counters of every local interface (loopback
//! included) once per interval and reports the difference as upload and
//! download rates.

use std::time::{Duration, Instant};

use chrono::Utc;
use lanscope_common::ScanError;
use lanscope_common::models::TrafficSample;
use sysinfo::Networks;
use tracing::{debug, info};

/// Cumulative bytes across all interfaces since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteTotals {
    pub sent: u64,
    pub received: u64,
}

/// Supplies the current cumulative byte counters.
pub trait ByteCounters: Send + Sync {
    fn totals(&self) -> ByteTotals;
}

/// Counters read through `sysinfo`.
pub struct SystemCounters;

impl ByteCounters for SystemCounters {
    fn totals(&self) -> ByteTotals {
        let networks = Networks::new_with_refreshed_list();
        networks
            .list()
            .values()
            .fold(ByteTotals::default(), |acc, data| ByteTotals {
                sent: acc.sent + data.total_transmitted(),
                received: acc.received + data.total_received(),
            })
    }
}

pub struct TrafficMonitor {
    counters: Box<dyn ByteCounters>,
}

impl TrafficMonitor {
    pub fn new(counters: Box<dyn ByteCounters>) -> Self {
        Self { counters }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemCounters))
    }

    /// Takes one sample per `interval` until `duration` has passed.
    ///
    /// `on_sample` sees each sample as soon as it is taken. A counter that
    /// went backwards (interface removed, counter reset) counts as zero bytes.
    pub async fn sample(
        &self,
        duration: Duration,
        interval: Duration,
        mut on_sample: impl FnMut(&TrafficSample),
    ) -> Result<Vec<TrafficSample>, ScanError> {
        if interval.is_zero() {
            return Err(ScanError::InvalidConfig("sampling interval must be positive".into()));
        }
        if duration < interval {
            return Err(ScanError::InvalidConfig(
                "sampling duration is shorter than one interval".into(),
            ));
        }

        let rounds = (duration.as_nanos() / interval.as_nanos()) as usize;
        info!("Sampling traffic {rounds} time(s) every {interval:?}");

        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        let mut last = self.counters.totals();
        let mut last_at = Instant::now();
        let mut samples: Vec<TrafficSample> = Vec::with_capacity(rounds);

        for _ in 0..rounds {
            ticker.tick().await;
            let now = self.counters.totals();
            let now_at = Instant::now();

            let sample = between(last, now, now_at.duration_since(last_at));
            debug!(
                "{} B sent, {} B received",
                sample.bytes_sent, sample.bytes_received
            );
            on_sample(&sample);
            samples.push(sample);

            last = now;
            last_at = now_at;
        }

        Ok(samples)
    }
}

fn between(before: ByteTotals, after: ByteTotals, elapsed: Duration) -> TrafficSample {
    let bytes_sent = after.sent.saturating_sub(before.sent);
    let bytes_received = after.received.saturating_sub(before.received);
    TrafficSample {
        timestamp: Utc::now(),
        bytes_sent,
        bytes_received,
        upload_kib_s: kib_per_second(bytes_sent, elapsed),
        download_kib_s: kib_per_second(bytes_received, elapsed),
    }
}

fn kib_per_second(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    bytes as f64 / 1024.0 / secs
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
