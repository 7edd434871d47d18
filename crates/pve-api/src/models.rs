//! Proxmox VE API data models shared by the client and its consumers.

use pve_core::types::VmId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of numbered network-interface slots a VM can carry (`net0`..`net31`).
pub const MAX_NET_SLOTS: u8 = 32;

/// Response envelope wrapping every `api2/json` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiData<T> {
    /// The wrapped payload. May be `null` for endpoints that have nothing to
    /// return, which is why consumers deserialize into `ApiData<Option<T>>`
    /// where that can happen.
    pub data: T,
}

/// Version metadata returned by `GET /version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionInfo {
    /// Full version string (e.g. `8.1.4`).
    pub version: String,
    /// Release series (e.g. `8.1`).
    pub release: String,
    /// Repository build identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repoid: Option<String>,
}

/// Status of a cluster node as returned by `GET /nodes/{node}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeStatus {
    /// Node uptime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// CPU usage (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    /// Running kernel version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kversion: Option<String>,
    /// Installed Proxmox VE version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pveversion: Option<String>,
    /// Memory usage summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<NodeMemory>,
    /// Load averages as reported by the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loadavg: Option<Vec<String>>,
}

/// Node memory usage in bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeMemory {
    /// Free memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<u64>,
    /// Total memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Used memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
}

/// Runtime status of a VM as returned by `GET .../qemu/{vmid}/status/current`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VmStatus {
    /// VM identifier.
    pub vmid: VmId,
    /// Current status (e.g. `running`, `stopped`).
    pub status: String,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// CPU usage (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    /// Memory usage in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    /// Maximum memory in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    /// Uptime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// QEMU process status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qmpstatus: Option<String>,
}

/// Raw VM configuration as returned by `GET .../qemu/{vmid}/config`.
///
/// The platform stores network interfaces in numbered slots (`net0`..`net31`)
/// alongside the scalar configuration keys. The slots are captured through
/// the flattened map and extracted with [`VmConfig::net_slots`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VmConfig {
    /// Configured VM name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of cores per socket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    /// Number of CPU sockets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sockets: Option<u32>,
    /// Guest OS type identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ostype: Option<String>,
    /// Configuration digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Remaining configuration keys, including the `netN` interface slots.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl VmConfig {
    /// Extract the network-interface slots as `(slot, raw line)` pairs.
    ///
    /// Slots are returned sorted numerically by slot index so the output is
    /// deterministic (`net10` sorts after `net2`, which lexical map order
    /// would not give). Keys outside the `net0`..`net31` range and slots
    /// whose value is not a string are ignored.
    #[must_use]
    pub fn net_slots(&self) -> Vec<(u8, String)> {
        let mut slots: Vec<(u8, String)> = self
            .extra
            .iter()
            .filter_map(|(key, value)| {
                let slot = key.strip_prefix("net")?.parse::<u8>().ok()?;
                if slot >= MAX_NET_SLOTS {
                    return None;
                }
                Some((slot, value.as_str()?.to_string()))
            })
            .collect();
        slots.sort_by_key(|(slot, _)| *slot);
        slots
    }
}

/// Assembled view of a virtual machine consumed by lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VirtualMachine {
    /// VM identifier.
    pub vmid: VmId,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owning cluster node.
    pub node: String,
    /// Current status.
    pub status: String,
    /// Attached configuration object, when the VM has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<VmConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_info_deserializes() {
        let envelope: ApiData<VersionInfo> = serde_json::from_value(json!({
            "data": {"version": "8.1.4", "release": "8.1", "repoid": "d258a813"}
        }))
        .unwrap();
        assert_eq!(envelope.data.version, "8.1.4");
        assert_eq!(envelope.data.repoid.as_deref(), Some("d258a813"));
    }

    #[test]
    fn node_status_tolerates_missing_fields() {
        let status: NodeStatus = serde_json::from_value(json!({
            "uptime": 86400,
            "pveversion": "pve-manager/8.1.4"
        }))
        .unwrap();
        assert_eq!(status.uptime, Some(86400));
        assert!(status.memory.is_none());
    }

    #[test]
    fn vm_status_deserializes() {
        let status: VmStatus = serde_json::from_value(json!({
            "vmid": 100,
            "status": "running",
            "name": "web01",
            "uptime": 3600
        }))
        .unwrap();
        assert_eq!(status.vmid, VmId::new(100));
        assert_eq!(status.status, "running");
        assert_eq!(status.name.as_deref(), Some("web01"));
    }

    #[test]
    fn vm_config_captures_net_slots() {
        let config: VmConfig = serde_json::from_value(json!({
            "name": "web01",
            "cores": 2,
            "net0": "virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0",
            "net1": "virtio=00:11:22:33:44:55,bridge=vmbr1,tag=100",
            "scsi0": "local-lvm:vm-100-disk-0,size=32G"
        }))
        .unwrap();

        let slots = config.net_slots();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].0, 0);
        assert_eq!(slots[0].1, "virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0");
        assert_eq!(slots[1].0, 1);
    }

    #[test]
    fn net_slots_sort_numerically() {
        let config: VmConfig = serde_json::from_value(json!({
            "net10": "virtio=AA:AA:AA:AA:AA:10,bridge=vmbr0",
            "net2": "virtio=AA:AA:AA:AA:AA:02,bridge=vmbr0",
            "net0": "virtio=AA:AA:AA:AA:AA:00,bridge=vmbr0"
        }))
        .unwrap();

        let order: Vec<u8> = config.net_slots().into_iter().map(|(slot, _)| slot).collect();
        assert_eq!(order, vec![0, 2, 10]);
    }

    #[test]
    fn net_slots_ignore_unrelated_keys() {
        let config: VmConfig = serde_json::from_value(json!({
            "net0": "virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0",
            "net32": "out of range",
            "netdev": "not a slot",
            "net1": 42
        }))
        .unwrap();

        let slots = config.net_slots();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].0, 0);
    }

    #[test]
    fn null_config_envelope_deserializes_to_none() {
        let envelope: ApiData<Option<VmConfig>> =
            serde_json::from_value(json!({"data": null})).unwrap();
        assert!(envelope.data.is_none());
    }
}
