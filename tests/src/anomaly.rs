use std::collections::HashMap;
use std::net::Ipv4Addr;

use lanscope_common::ScanError;
use lanscope_common::models::{AlertKind, ConnectionRecord, ConnectionStatus, Transport};
use lanscope_common::network::range::parse_subnet;
use lanscope_core::AnomalyDetector;
use lanscope_core::anomaly::{ConnectionSource, ProcessLookup};

struct Table(Vec<ConnectionRecord>);

impl ConnectionSource for Table {
    fn connections(&self) -> Result<Vec<ConnectionRecord>, ScanError> {
        Ok(self.0.clone())
    }
}

struct Names(HashMap<u32, String>);

impl ProcessLookup for Names {
    fn process_names(&self) -> HashMap<u32, String> {
        self.0.clone()
    }
}

struct Unreadable;

impl ConnectionSource for Unreadable {
    fn connections(&self) -> Result<Vec<ConnectionRecord>, ScanError> {
        Err(ScanError::ConnectionTable("permission denied".into()))
    }
}

fn tcp(remote: [u8; 4], remote_port: u16, pid: u32) -> ConnectionRecord {
    ConnectionRecord {
        transport: Transport::Tcp,
        local_addr: Ipv4Addr::new(192, 168, 1, 5),
        local_port: 40_000,
        remote_addr: Some(Ipv4Addr::from(remote)),
        remote_port: Some(remote_port),
        status: ConnectionStatus::Established,
        pid: Some(pid),
    }
}

fn detector(records: Vec<ConnectionRecord>) -> AnomalyDetector {
    let names = HashMap::from([(10, "browser".to_string()), (20, "agent".to_string())]);
    AnomalyDetector::new(Box::new(Table(records)), Box::new(Names(names)))
        .with_local_network(parse_subnet("192.168.1.0/24").expect("local network"))
}

#[test]
fn flags_high_ports_and_foreign_private_peers() {
    let detector = detector(vec![
        tcp([93, 184, 216, 34], 443, 10),
        tcp([93, 184, 216, 34], 51_000, 10),
        tcp([10, 1, 2, 3], 443, 20),
        tcp([192, 168, 1, 1], 53, 20),
    ]);

    let alerts = detector.detect().expect("detect");
    let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();

    assert_eq!(kinds, vec![AlertKind::HighPort, AlertKind::UnusualIp]);
    assert_eq!(alerts[0].process.as_deref(), Some("browser"));
    assert_eq!(alerts[1].remote_addr, Ipv4Addr::new(10, 1, 2, 3));
}

#[test]
fn watched_ports_are_grouped_and_always_present() {
    let detector = detector(vec![
        tcp([93, 184, 216, 34], 443, 10),
        tcp([1, 1, 1, 1], 443, 20),
    ]);

    let activity = detector.monitor_ports(&[22, 443]).expect("monitor");

    assert!(activity[&22].is_empty());
    assert_eq!(activity[&443].len(), 2);
}

#[test]
fn unreadable_table_surfaces_an_error() {
    let detector = AnomalyDetector::new(Box::new(Unreadable), Box::new(Names(HashMap::new())))
        .with_local_network(parse_subnet("192.168.1.0/24").expect("local network"));

    assert!(matches!(
        detector.detect(),
        Err(ScanError::ConnectionTable(_))
    ));
}
