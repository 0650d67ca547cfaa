//! Static port to service table.

/// Label for open ports the table has no entry for.
pub const UNKNOWN_SERVICE: &str = "Unknown service";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEntry {
    pub port: u16,
    pub label: &'static str,
    pub risk: &'static str,
}

const fn entry(port: u16, label: &'static str, risk: &'static str) -> ServiceEntry {
    ServiceEntry { port, label, risk }
}

// Sorted by port; `lookup` relies on it.
static SERVICES: &[ServiceEntry] = &[
    entry(21, "FTP", "cleartext file transfer and credentials"),
    entry(22, "SSH", "remote shell, brute-force target"),
    entry(23, "Telnet", "cleartext remote shell"),
    entry(25, "SMTP", "possible open mail relay"),
    entry(53, "DNS", "resolver abuse and zone transfer"),
    entry(80, "HTTP", "unencrypted web interface"),
    entry(110, "POP3", "cleartext mail credentials"),
    entry(139, "NetBIOS", "legacy Windows file sharing"),
    entry(143, "IMAP", "cleartext mail credentials"),
    entry(443, "HTTPS", "web interface exposed"),
    entry(445, "SMB", "file sharing, wormable protocol history"),
    entry(515, "LPD", "unauthenticated print spooler"),
    entry(631, "IPP", "network printing service"),
    entry(1883, "MQTT", "unauthenticated IoT message broker"),
    entry(3306, "MySQL", "database reachable from the network"),
    entry(3389, "RDP", "remote desktop, brute-force target"),
    entry(5900, "VNC", "remote desktop, often weakly protected"),
    entry(8080, "HTTP-Alt", "alternate web or proxy interface"),
    entry(8443, "HTTPS-Alt", "alternate management interface"),
    entry(9100, "Raw Printing", "unauthenticated raw print jobs"),
];

pub fn lookup(port: u16) -> Option<&'static ServiceEntry> {
    SERVICES
        .binary_search_by_key(&port, |e| e.port)
        .ok()
        .map(|idx| &SERVICES[idx])
}

pub fn label(port: u16) -> &'static str {
    lookup(port).map(|e| e.label).unwrap_or(UNKNOWN_SERVICE)
}
