// One polling cycle's facts for a single device, as written to the spool
// directory by the SNMP poller. Parsed once, consumed by one reconcile run,
// then discarded.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub hostname: String,
    /// Poll time, seconds since the epoch.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub system: System,
    /// Keyed by ifIndex. A BTreeMap keeps processing order deterministic.
    #[serde(default)]
    pub interfaces: BTreeMap<i64, InterfaceFacts>,
    /// IPv4 neighbor table, IP address to MAC address.
    #[serde(default)]
    pub ipv4_neighbors: BTreeMap<String, String>,
    /// IPv6 neighbor table, IP address to MAC address.
    #[serde(default)]
    pub ipv6_neighbors: BTreeMap<String, String>,
}

/// The device's identity block.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct System {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub uptime: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InterfaceFacts {
    /// ifAdminStatus: 1 up, 2 down.
    #[serde(default)]
    pub admin_status: i32,
    /// ifOperStatus: 1 up, 2 down.
    #[serde(default)]
    pub oper_status: i32,
    #[serde(default)]
    pub speed: Option<i64>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duplex: Option<i32>,
    #[serde(default)]
    pub ethernet: bool,
    #[serde(default)]
    pub native_vlan: Option<i32>,
    #[serde(default)]
    pub trunk: bool,
    /// VLAN numbers the interface carries.
    #[serde(default)]
    pub vlans: Vec<i32>,
    /// MAC addresses learned on the interface.
    #[serde(default)]
    pub macs: Vec<String>,
    #[serde(default)]
    pub neighbor: Neighbor,
}

/// Neighbor-discovery facts (CDP/LLDP) for an interface.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Neighbor {
    #[serde(default)]
    pub remote_device: Option<String>,
    #[serde(default)]
    pub remote_port: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub remote_port_description: Option<String>,
    #[serde(default)]
    pub remote_capabilities: Option<String>,
    #[serde(default)]
    pub remote_system_description: Option<String>,
    #[serde(default)]
    pub remote_system_name: Option<String>,
}

impl Snapshot {
    /// Checks the identity block the device registrar depends on.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.hostname.trim().is_empty() {
            return Err(ReconcileError::MalformedSnapshot(
                "empty hostname".to_string(),
            ));
        }
        if self.system.name.trim().is_empty() {
            return Err(ReconcileError::MalformedSnapshot(format!(
                "no system name for host {}",
                self.hostname
            )));
        }
        if self.timestamp <= 0 {
            return Err(ReconcileError::MalformedSnapshot(format!(
                "no poll timestamp for host {}",
                self.hostname
            )));
        }
        Ok(())
    }
}

/// Lowercase plain-hex form of a MAC address, or None if it isn't one.
pub fn normalize_mac(raw: &str) -> Option<String> {
    let hex: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect::<String>()
        .to_lowercase();
    if hex.len() == 12 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(hex)
    } else {
        None
    }
}

/// The 3-byte vendor prefix of a normalized MAC address.
pub fn mac_prefix(mac: &str) -> String {
    mac[..6].to_string()
}

/// Canonical text form of an IP address, or None when the entry is not a
/// valid address of the expected version.
pub fn normalize_ip(raw: &str, version: i32) -> Option<String> {
    match raw.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) if version == 4 => Some(addr.to_string()),
        Ok(IpAddr::V6(addr)) if version == 6 => Some(addr.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_forms_normalize_to_plain_hex() {
        assert_eq!(
            normalize_mac("AA:BB:CC:DD:EE:FF"),
            Some("aabbccddeeff".to_string())
        );
        assert_eq!(
            normalize_mac("aa-bb-cc-dd-ee-ff"),
            Some("aabbccddeeff".to_string())
        );
        assert_eq!(
            normalize_mac("aabb.ccdd.eeff"),
            Some("aabbccddeeff".to_string())
        );
        assert_eq!(
            normalize_mac("aabbccddeeff"),
            Some("aabbccddeeff".to_string())
        );
    }

    #[test]
    fn invalid_macs_are_rejected() {
        assert_eq!(normalize_mac(""), None);
        assert_eq!(normalize_mac("aa:bb:cc:dd:ee"), None);
        assert_eq!(normalize_mac("aa:bb:cc:dd:ee:fg"), None);
        assert_eq!(normalize_mac("aa:bb:cc:dd:ee:ff:00"), None);
    }

    #[test]
    fn prefix_is_first_three_bytes() {
        assert_eq!(mac_prefix("aabbccddeeff"), "aabbcc");
    }

    #[test]
    fn ip_version_must_match_table() {
        assert_eq!(normalize_ip("10.0.0.5", 4), Some("10.0.0.5".to_string()));
        assert_eq!(normalize_ip("10.0.0.5", 6), None);
        assert_eq!(
            normalize_ip("2001:DB8::1", 6),
            Some("2001:db8::1".to_string())
        );
        assert_eq!(normalize_ip("2001:db8::1", 4), None);
        assert_eq!(normalize_ip("not-an-ip", 4), None);
    }

    #[test]
    fn identity_block_is_required() {
        let mut snapshot = Snapshot {
            hostname: "sw1".to_string(),
            timestamp: 1700000000,
            system: System {
                name: "sw1.example.net".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(snapshot.validate().is_ok());

        snapshot.hostname = String::new();
        assert!(snapshot.validate().is_err());

        snapshot.hostname = "sw1".to_string();
        snapshot.system.name = String::new();
        assert!(snapshot.validate().is_err());

        snapshot.system.name = "sw1.example.net".to_string();
        snapshot.timestamp = 0;
        assert!(snapshot.validate().is_err());
    }
}
