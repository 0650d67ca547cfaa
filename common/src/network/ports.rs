use crate::error::ScanError;

/// Parses a port specification such as `"80"`, `"80,443"` or `"22,8000-8010"`.
///
/// The result is sorted and free of duplicates.
pub fn parse_port_spec(spec: &str) -> Result<Vec<u16>, ScanError> {
    let mut ports: Vec<u16> = Vec::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_port(spec, start)?;
                let end = parse_port(spec, end)?;
                if start > end {
                    return Err(ScanError::invalid_ports(spec, format!("reversed range {part}")));
                }
                ports.extend(start..=end);
            }
            None => ports.push(parse_port(spec, part)?),
        }
    }

    if ports.is_empty() {
        return Err(ScanError::invalid_ports(spec, "no ports given"));
    }

    ports.sort_unstable();
    ports.dedup();
    Ok(ports)
}

fn parse_port(spec: &str, s: &str) -> Result<u16, ScanError> {
    let port: u16 = s
        .trim()
        .parse()
        .map_err(|_| ScanError::invalid_ports(spec, format!("'{s}' is not a port")))?;
    if port == 0 {
        return Err(ScanError::invalid_ports(spec, "port 0 cannot be probed"));
    }
    Ok(port)
}
