//! Scanning and detection engine for `lanscope`.
//!
//! The pieces build on each other leaf-first:
//!
//! * [`probe`]: one bounded TCP connection attempt, plus the bounded-concurrency
//!   runner every scanner uses.
//! * [`discovery`]: finds live addresses in a CIDR block.
//! * [`scanner`]: probes one host's ports and maps them to known services.
//! * [`fingerprint`]: guesses a device category from names, banners and ports.
//! * [`anomaly`]: flags suspicious entries in this machine's connection table.
//! * [`assessment`]: chains discovery, scanning and fingerprinting over a subnet.
//! * [`traffic`]: samples upload and download rates of the local interfaces.

pub mod anomaly;
pub mod assessment;
pub mod discovery;
pub mod fingerprint;
pub mod probe;
pub mod resolver;
pub mod scanner;
pub mod traffic;

pub use anomaly::AnomalyDetector;
pub use assessment::Assessment;
pub use discovery::HostDiscovery;
pub use fingerprint::DeviceClassifier;
pub use probe::{Prober, TcpProber};
pub use scanner::PortScanner;
pub use traffic::TrafficMonitor;
