//! # Device Fingerprinting
//!
//! Scores a host against a fixed table of device categories and keeps the
//! best match. The inputs are the reverse name of the host, the banners
//! its open ports sent, and which well-known ports are open.
//!
//! Point values live in [`ScoringTable`] so they can be tuned without
//! touching the scoring loop. Categories are always evaluated in the order of
//! the signature table; a later category has to beat the current best
//! strictly to replace it.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, LazyLock};

use lanscope_common::models::{DeviceCategory, DeviceProfile};
use regex::Regex;
use tracing::debug;

use crate::resolver::NameResolver;

/// Bonus for a category when a characteristic port is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBonus {
    pub category: DeviceCategory,
    pub port: u16,
    pub points: u32,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringTable {
    /// Added once when the reverse name matches any of the category's patterns.
    pub hostname_match: u32,
    /// Added for every banner that matches any of the category's patterns.
    pub banner_match: u32,
    pub port_bonuses: &'static [PortBonus],
}

pub const DEFAULT_SCORING: ScoringTable = ScoringTable {
    hostname_match: 30,
    banner_match: 20,
    port_bonuses: &[
        PortBonus {
            category: DeviceCategory::Printer,
            port: 9100,
            points: 25,
            reason: "printer port",
        },
        PortBonus {
            category: DeviceCategory::Router,
            port: 80,
            points: 15,
            reason: "web interface port",
        },
    ],
};

impl Default for ScoringTable {
    fn default() -> Self {
        DEFAULT_SCORING
    }
}

const SIGNATURE_SOURCES: &[(DeviceCategory, &[&str])] = &[
    (
        DeviceCategory::Printer,
        &["printer", "hp", "epson", "canon", "brother"],
    ),
    (
        DeviceCategory::Router,
        &["router", "gateway", "modem", "huawei", "tp-link", "cisco"],
    ),
    (
        DeviceCategory::Mobile,
        &["android", "iphone", "mobile", "samsung", "huawei"],
    ),
    (
        DeviceCategory::Iot,
        &["camera", "thermostat", r"smart.*bulb", "alexa", "nest"],
    ),
];

struct CategorySignatures {
    category: DeviceCategory,
    patterns: Vec<Regex>,
}

impl CategorySignatures {
    fn first_match(&self, text: &str) -> Option<&Regex> {
        self.patterns.iter().find(|re| re.is_match(text))
    }
}

static SIGNATURES: LazyLock<Vec<CategorySignatures>> = LazyLock::new(|| {
    SIGNATURE_SOURCES
        .iter()
        .map(|(category, patterns)| CategorySignatures {
            category: *category,
            patterns: patterns
                .iter()
                .map(|p| {
                    Regex::new(&format!("(?i){p}")).expect("built-in device signature must compile")
                })
                .collect(),
        })
        .collect()
});

pub struct DeviceClassifier {
    resolver: Arc<dyn NameResolver>,
    scoring: ScoringTable,
}

impl DeviceClassifier {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self {
            resolver,
            scoring: DEFAULT_SCORING,
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringTable) -> Self {
        self.scoring = scoring;
        self
    }

    /// Classifies `address` from its open ports and their banners.
    ///
    /// A host without open ports has no service evidence and is reported as
    /// unknown without a name lookup.
    pub async fn classify(
        &self,
        address: Ipv4Addr,
        open_ports: &BTreeMap<u16, String>,
    ) -> DeviceProfile {
        if open_ports.is_empty() {
            return DeviceProfile::unknown(address, None);
        }

        let hostname = self.resolver.reverse_lookup(address).await;
        let profile = self.score(address, hostname, open_ports);
        debug!(
            "{} classified as {} ({})",
            address, profile.category, profile.confidence
        );
        profile
    }

    /// Pure scoring step, deterministic for identical inputs.
    pub fn score(
        &self,
        address: Ipv4Addr,
        hostname: Option<String>,
        open_ports: &BTreeMap<u16, String>,
    ) -> DeviceProfile {
        let mut best = DeviceProfile::unknown(address, hostname.clone());
        if open_ports.is_empty() {
            return best;
        }

        let name: &str = hostname.as_deref().unwrap_or_default();

        for signatures in SIGNATURES.iter() {
            let category = signatures.category;
            let mut confidence: u32 = 0;
            let mut evidence: Vec<String> = Vec::new();

            if !name.is_empty() {
                if let Some(pattern) = signatures.first_match(name) {
                    confidence += self.scoring.hostname_match;
                    evidence.push(format!(
                        "hostname '{name}' matches {category} pattern '{}'",
                        display_pattern(pattern)
                    ));
                }
            }

            for (port, banner) in open_ports {
                if banner.is_empty() {
                    continue;
                }
                if let Some(pattern) = signatures.first_match(banner) {
                    confidence += self.scoring.banner_match;
                    evidence.push(format!(
                        "banner on port {port} matches {category} pattern '{}'",
                        display_pattern(pattern)
                    ));
                }
            }

            for bonus in self.scoring.port_bonuses.iter().filter(|b| b.category == category) {
                if open_ports.contains_key(&bonus.port) {
                    confidence += bonus.points;
                    evidence.push(format!("port {} open ({})", bonus.port, bonus.reason));
                }
            }

            if confidence > best.confidence {
                best.category = category;
                best.confidence = confidence;
                best.evidence = evidence;
            }
        }

        best
    }
}

fn display_pattern(re: &Regex) -> &str {
    re.as_str().trim_start_matches("(?i)")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
