//! The VM configuration data source.
//!
//! Given a cluster node name and a VM identifier, the data source fetches the
//! VM's record from the API and republishes its name, node, status, and
//! parsed network-interface definitions. Each read is independent and
//! stateless; the shared client handle is borrowed from the provider context.

use crate::diagnostics::Diagnostics;
use crate::lifecycle::DataSource;
use crate::netcfg;
use crate::provider::ProviderContext;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::value::Value;
use async_trait::async_trait;
use pve_core::types::VmId;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Stable type name of the data source.
pub const VM_CONFIG_TYPE_NAME: &str = "proxmoxve_vm_config";

/// Filter narrowing a lookup to one VM on one cluster node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmConfigFilter {
    /// Name of the cluster node owning the VM.
    pub node_name: Value<String>,
    /// Identifier of the VM.
    pub vm_id: Value<VmId>,
}

/// One parsed network interface.
///
/// Optional fields are populated only when the corresponding key was present
/// in the source line and parsed successfully; the raw line is always
/// retained verbatim for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkInterface {
    /// Bridge the interface is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<String>,
    /// Whether the platform firewall is enabled for the interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall: Option<bool>,
    /// Hardware (MAC) address.
    #[serde(rename = "mac_addr", skip_serializing_if = "Option::is_none")]
    pub hardware_address: Option<String>,
    /// Whether the link is administratively down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_down: Option<bool>,
    /// Emulated device model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Configured MTU.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,
    /// Number of packet queues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queues: Option<i32>,
    /// Rate limit in MB/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<i32>,
    /// The original configuration line, verbatim.
    pub raw_config: String,
    /// VLAN tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<i32>,
    /// VLAN ids permitted through a trunked interface, in source order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trunks: Option<Vec<i32>>,
}

/// Published VM configuration fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmConfigData {
    /// VM name.
    pub name: String,
    /// Owning cluster node.
    pub node: String,
    /// Current status.
    pub status: String,
    /// VM identifier.
    pub vm_id: VmId,
    /// Parsed network interfaces, in slot order.
    pub network_interfaces: Vec<NetworkInterface>,
}

/// Result of one lookup: the published data alongside the echoed filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfigState {
    /// The filter the lookup was performed with.
    pub filter: VmConfigFilter,
    /// The published data.
    pub data: VmConfigData,
}

/// The VM configuration data source.
#[derive(Debug, Default)]
pub struct VmConfigDataSource;

impl VmConfigDataSource {
    /// Create a new data source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for VmConfigDataSource {
    type ProviderData = ProviderContext;
    type Filter = VmConfigFilter;
    type State = VmConfigState;

    fn type_name(&self) -> &'static str {
        VM_CONFIG_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let interface = BTreeMap::from([
            ("bridge".to_string(), Attribute::string().computed().optional()),
            ("firewall".to_string(), Attribute::boolean().computed().optional()),
            ("link_down".to_string(), Attribute::boolean().computed().optional()),
            ("mac_addr".to_string(), Attribute::string().computed().optional()),
            ("model".to_string(), Attribute::string().computed().optional()),
            ("mtu".to_string(), Attribute::int32().computed().optional()),
            ("queues".to_string(), Attribute::int32().computed().optional()),
            ("rate".to_string(), Attribute::int32().computed().optional()),
            ("raw_config".to_string(), Attribute::string().computed()),
            ("tag".to_string(), Attribute::int32().computed().optional()),
            (
                "trunks".to_string(),
                Attribute::list(AttributeType::Int32).computed().optional(),
            ),
        ]);

        let data = BTreeMap::from([
            ("name".to_string(), Attribute::string().computed()),
            (
                "network_interfaces".to_string(),
                Attribute::list(AttributeType::Object(interface)).computed(),
            ),
            ("node".to_string(), Attribute::string().computed()),
            ("status".to_string(), Attribute::string().computed()),
            ("vm_id".to_string(), Attribute::int32().computed()),
        ]);

        let filter = BTreeMap::from([
            ("node_name".to_string(), Attribute::string().required()),
            ("vm_id".to_string(), Attribute::int32().required()),
        ]);

        Schema::new()
            .with_attribute("data", Attribute::object(data).computed())
            .with_attribute("filter", Attribute::object(filter).optional())
    }

    async fn read(
        &self,
        data: &Self::ProviderData,
        filter: Option<Self::Filter>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Self::State> {
        // a VM id and node must be specified before anything is fetched
        let Some(filter) = filter else {
            diagnostics.add_error(
                "Filter Is Required",
                "You must specify a filter to retrieve the VM configuration.",
            );
            return None;
        };
        let node_name = match filter.node_name.as_known() {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                diagnostics.add_error(
                    "Filter Node Name Is Required",
                    "You must specify a PVE cluster node name to retrieve the VM configuration.",
                );
                return None;
            }
        };
        let Some(vm_id) = filter.vm_id.as_known().copied() else {
            diagnostics.add_error(
                "Filter VM ID Is Required",
                "You must specify a VM ID to retrieve the VM configuration.",
            );
            return None;
        };

        if let Err(err) = data.client.node(&node_name).await {
            error!(node_name = %node_name, error = %err, "failed to locate cluster node");
            diagnostics.add_error(
                "Proxmox VE API: Failed to Locate Node",
                format!("Failed to locate the cluster node '{node_name}': {err}"),
            );
            return None;
        }

        let vm = match data.client.virtual_machine(&node_name, vm_id).await {
            Ok(vm) => vm,
            Err(err) => {
                diagnostics.add_error(
                    "Proxmox VE API: Failed to Retrieve VM",
                    format!("Failed to retrieve the virtual machine with the ID '{vm_id}': {err}"),
                );
                return None;
            }
        };
        info!(vm_id = %vm_id, node_name = %node_name, status = %vm.status, "located VM");

        let mut network_interfaces = Vec::new();
        if let Some(config) = &vm.config {
            for (slot, line) in config.net_slots() {
                info!(slot, vm_id = %vm_id, config = %line, "parsing network interface");
                if line.is_empty() {
                    continue;
                }
                network_interfaces.push(netcfg::parse_net_config(&line, diagnostics));
            }
        } else {
            warn!(vm_id = %vm_id, "VM has no configuration object");
        }

        Some(VmConfigState {
            data: VmConfigData {
                name: vm.name.unwrap_or_default(),
                node: vm.node,
                status: vm.status,
                vm_id,
                network_interfaces,
            },
            filter,
        })
    }
}
