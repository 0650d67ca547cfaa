use thiserror::Error;

/// Failures that abort a whole discovery, scan or detection call.
///
/// Per-probe failures (refused, timed out, unreachable) and lookup failures
/// (reverse DNS, process identity) are never represented here. They are
/// absorbed where they happen and only degrade the result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid CIDR block '{input}': {reason}")]
    InvalidCidr { input: String, reason: String },

    #[error("'{0}' is not an IPv4 address")]
    UnsupportedAddress(String),

    #[error("invalid port specification '{input}': {reason}")]
    InvalidPortSpec { input: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no usable interface to determine the local network: {0}")]
    NoLocalNetwork(String),

    #[error("failed to read the connection table: {0}")]
    ConnectionTable(String),
}

impl ScanError {
    pub fn invalid_cidr(input: &str, reason: impl ToString) -> Self {
        Self::InvalidCidr {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_ports(input: &str, reason: impl ToString) -> Self {
        Self::InvalidPortSpec {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}
