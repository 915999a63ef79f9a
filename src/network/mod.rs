//! Network addresses reported by instances and the `host:port` pairs built
//! from them.

use std::fmt;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;

use serde::Deserialize;
use serde::Serialize;


/// Kind of value held by an [`Address`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    Ipv4,
    Ipv6,
    Hostname,
}

/// Network reachability of an [`Address`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressScope {
    /// Reachable from outside the cloud
    Public,
    /// Reachable only from within the cloud network
    CloudLocal,
    /// Loopback, only usable on the machine itself
    MachineLocal,
    /// Link-local addresses and hostnames we cannot classify
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub value: String,
    pub kind: AddressKind,
    pub scope: AddressScope,
}

impl Address {
    /// Creates an address, deriving its kind and scope from the value
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let (kind, scope) = match value.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => (AddressKind::Ipv4, ipv4_scope(&ip)),
            Ok(IpAddr::V6(ip)) => (AddressKind::Ipv6, ipv6_scope(&ip)),
            Err(_) => (AddressKind::Hostname, AddressScope::Unknown),
        };
        Self { value, kind, scope }
    }

    /// Creates an address with an explicit scope, e.g. a public DNS name
    pub fn with_scope(
        value: impl Into<String>,
        scope: AddressScope,
    ) -> Self {
        Self {
            scope,
            ..Self::new(value)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn ipv4_scope(ip: &Ipv4Addr) -> AddressScope {
    if ip.is_loopback() {
        AddressScope::MachineLocal
    } else if ip.is_private() {
        AddressScope::CloudLocal
    } else if ip.is_link_local() || ip.is_unspecified() {
        AddressScope::Unknown
    } else {
        AddressScope::Public
    }
}

fn ipv6_scope(ip: &Ipv6Addr) -> AddressScope {
    let first = ip.segments()[0];
    if ip.is_loopback() {
        AddressScope::MachineLocal
    } else if first & 0xfe00 == 0xfc00 {
        // unique local fc00::/7
        AddressScope::CloudLocal
    } else if first & 0xffc0 == 0xfe80 || ip.is_unspecified() {
        AddressScope::Unknown
    } else {
        AddressScope::Public
    }
}

/// An address paired with the port a service listens on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostPort {
    pub address: Address,
    pub port: u16,
}

impl fmt::Display for HostPort {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.address.kind {
            AddressKind::Ipv6 => write!(f, "[{}]:{}", self.address.value, self.port),
            _ => write!(f, "{}:{}", self.address.value, self.port),
        }
    }
}

/// Pairs every address with the same port, preserving order
pub fn addresses_with_port(
    addrs: &[Address],
    port: u16,
) -> Vec<HostPort> {
    addrs
        .iter()
        .map(|address| HostPort {
            address: address.clone(),
            port,
        })
        .collect()
}

/// Renders host ports as `host:port` strings, preserving order
pub fn host_ports_to_strings(host_ports: &[HostPort]) -> Vec<String> {
    host_ports.iter().map(ToString::to_string).collect()
}
