//! Records produced by the scanners and detectors.
//!
//! Everything here is plain data and serialisable, so report generators can
//! consume it without knowing how it was gathered.

pub mod connection;
pub mod device;
pub mod host;
pub mod local;
pub mod probe;

pub use connection::{
    Alert, AlertKind, ConnectionRecord, ConnectionStatus, ConnectionSummary, ProcessActivity,
    Transport,
};
pub use device::{DeviceCategory, DeviceProfile};
pub use host::{HostProfile, HostRecord, NetworkReport, VulnerabilityFinding};
pub use local::{InterfaceAddress, TrafficSample};
pub use probe::ProbeResult;
