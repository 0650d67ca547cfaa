use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Printer,
    Router,
    Mobile,
    Iot,
    Unknown,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Printer => "printer",
            DeviceCategory::Router => "router",
            DeviceCategory::Mobile => "mobile",
            DeviceCategory::Iot => "iot",
            DeviceCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best guess at what kind of device sits behind an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceProfile {
    pub address: Ipv4Addr,
    /// Reverse name used as evidence, if one resolved.
    pub hostname: Option<String>,
    pub category: DeviceCategory,
    pub confidence: u32,
    /// Every match that contributed to `confidence`, in evaluation order.
    pub evidence: Vec<String>,
}

impl DeviceProfile {
    pub fn unknown(address: Ipv4Addr, hostname: Option<String>) -> Self {
        Self {
            address,
            hostname,
            category: DeviceCategory::Unknown,
            confidence: 0,
            evidence: Vec::new(),
        }
    }
}
