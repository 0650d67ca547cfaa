//! OS-backed connection table (`netstat2`) and process names (`sysinfo`).

use std::collections::HashMap;
use std::net::IpAddr;

use lanscope_common::ScanError;
use lanscope_common::models::{ConnectionRecord, ConnectionStatus, Transport};
use netstat2::{
    AddressFamilyFlags, ProtocolFlags, ProtocolSocketInfo, SocketInfo, TcpState,
    get_sockets_info,
};
use sysinfo::System;

use super::{ConnectionSource, ProcessLookup};

pub struct SystemConnections;

impl ConnectionSource for SystemConnections {
    fn connections(&self) -> Result<Vec<ConnectionRecord>, ScanError> {
        let af_flags = AddressFamilyFlags::IPV4;
        let proto_flags = ProtocolFlags::TCP | ProtocolFlags::UDP;
        let sockets_info = get_sockets_info(af_flags, proto_flags)
            .map_err(|e| ScanError::ConnectionTable(e.to_string()))?;

        Ok(sockets_info.into_iter().filter_map(to_record).collect())
    }
}

fn to_record(si: SocketInfo) -> Option<ConnectionRecord> {
    let pid: Option<u32> = si.associated_pids.first().copied();

    match si.protocol_socket_info {
        ProtocolSocketInfo::Tcp(tcp) => {
            let IpAddr::V4(local_addr) = tcp.local_addr else {
                return None;
            };
            let remote_addr = match tcp.remote_addr {
                IpAddr::V4(addr) if !(addr.is_unspecified() && tcp.remote_port == 0) => Some(addr),
                _ => None,
            };
            Some(ConnectionRecord {
                transport: Transport::Tcp,
                local_addr,
                local_port: tcp.local_port,
                remote_addr,
                remote_port: remote_addr.map(|_| tcp.remote_port),
                status: tcp_status(&tcp.state),
                pid,
            })
        }
        ProtocolSocketInfo::Udp(udp) => {
            let IpAddr::V4(local_addr) = udp.local_addr else {
                return None;
            };
            Some(ConnectionRecord {
                transport: Transport::Udp,
                local_addr,
                local_port: udp.local_port,
                remote_addr: None,
                remote_port: None,
                status: ConnectionStatus::Stateless,
                pid,
            })
        }
    }
}

/// Maps a socket state to the names `netstat` prints.
fn tcp_status(state: &TcpState) -> ConnectionStatus {
    let name = match state {
        TcpState::Established => return ConnectionStatus::Established,
        TcpState::Listen => return ConnectionStatus::Listen,
        TcpState::Closed => "CLOSED",
        TcpState::SynSent => "SYN_SENT",
        TcpState::SynReceived => "SYN_RECV",
        TcpState::FinWait1 => "FIN_WAIT1",
        TcpState::FinWait2 => "FIN_WAIT2",
        TcpState::CloseWait => "CLOSE_WAIT",
        TcpState::Closing => "CLOSING",
        TcpState::LastAck => "LAST_ACK",
        TcpState::TimeWait => "TIME_WAIT",
        TcpState::DeleteTcb => "DELETE_TCB",
        TcpState::Unknown => "UNKNOWN",
    };
    ConnectionStatus::Other(name.to_string())
}

pub struct SystemProcesses;

impl ProcessLookup for SystemProcesses {
    fn process_names(&self) -> HashMap<u32, String> {
        let sys = System::new_all();
        sys.processes()
            .iter()
            .map(|(pid, process)| (pid.as_u32(), process.name().to_string_lossy().to_string()))
            .collect()
    }
}
