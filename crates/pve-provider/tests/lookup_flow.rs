//! End-to-end lookup tests against a mock Proxmox VE API.
//!
//! These tests drive the full provider lifecycle — configure, then read —
//! and validate what the data source publishes for the scenarios the
//! provider has to handle: parsed interfaces, VMs without configuration,
//! and remote failures.

use pve_core::types::VmId;
use pve_provider::{
    DataSource, Diagnostics, Provider, ProviderConfig, ProviderContext, PveProvider, Value,
    VmConfigDataSource, VmConfigFilter,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_version(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api2/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"version": "8.1.4", "release": "8.1", "repoid": "d258a813"}
        })))
        .mount(server)
        .await;
}

async fn mount_node(server: &MockServer, node: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api2/json/nodes/{node}/status").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"uptime": 86400, "pveversion": "pve-manager/8.1.4"}
        })))
        .mount(server)
        .await;
}

async fn configured_context(server: &MockServer) -> ProviderContext {
    let config = ProviderConfig {
        endpoint: Value::Known(server.uri()),
        api_token_username: Value::Known("terraform@pam".to_string()),
        api_token_id: Value::Known("provider".to_string()),
        api_token_secret: Value::Known("s3cr3t".to_string()),
        ignore_untrusted_ssl_certificate: Value::Null,
    };

    let mut diagnostics = Diagnostics::new();
    let context = PveProvider::new().configure(config, &mut diagnostics).await;
    assert!(diagnostics.is_empty(), "configure failed: {diagnostics:?}");
    context.unwrap()
}

fn filter(node: &str, vm_id: u32) -> VmConfigFilter {
    VmConfigFilter {
        node_name: Value::Known(node.to_string()),
        vm_id: Value::Known(VmId::new(vm_id)),
    }
}

#[tokio::test]
async fn lookup_publishes_parsed_interfaces() {
    let server = MockServer::start().await;
    mount_version(&server).await;
    mount_node(&server, "pve1").await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"vmid": 100, "status": "running", "name": "web01"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "name": "web01",
                "net0": "virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0,firewall=1"
            }
        })))
        .mount(&server)
        .await;

    let context = configured_context(&server).await;
    let mut diagnostics = Diagnostics::new();
    let state = VmConfigDataSource::new()
        .read(&context, Some(filter("pve1", 100)), &mut diagnostics)
        .await
        .unwrap();

    assert!(diagnostics.is_empty());
    assert_eq!(state.data.name, "web01");
    assert_eq!(state.data.node, "pve1");
    assert_eq!(state.data.status, "running");
    assert_eq!(state.data.vm_id, VmId::new(100));

    assert_eq!(state.data.network_interfaces.len(), 1);
    let interface = &state.data.network_interfaces[0];
    assert_eq!(interface.hardware_address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
    assert_eq!(interface.bridge.as_deref(), Some("vmbr0"));
    assert_eq!(interface.firewall, Some(true));
    assert_eq!(
        interface.raw_config,
        "virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0,firewall=1"
    );

    // the filter is echoed back alongside the data
    assert_eq!(state.filter, filter("pve1", 100));
}

#[tokio::test]
async fn lookup_orders_interfaces_by_slot_and_keeps_parse_failures_non_fatal() {
    let server = MockServer::start().await;
    mount_version(&server).await;
    mount_node(&server, "pve1").await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"vmid": 100, "status": "running", "name": "web01"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "net10": "virtio=AA:AA:AA:AA:AA:10,bridge=vmbr1",
                "net2": "virtio=AA:AA:AA:AA:AA:02,bridge=vmbr0,mtu=jumbo"
            }
        })))
        .mount(&server)
        .await;

    let context = configured_context(&server).await;
    let mut diagnostics = Diagnostics::new();
    let state = VmConfigDataSource::new()
        .read(&context, Some(filter("pve1", 100)), &mut diagnostics)
        .await
        .unwrap();

    // slot 2 before slot 10, numerically
    assert_eq!(state.data.network_interfaces.len(), 2);
    assert_eq!(
        state.data.network_interfaces[0].bridge.as_deref(),
        Some("vmbr0")
    );
    assert_eq!(
        state.data.network_interfaces[1].bridge.as_deref(),
        Some("vmbr1")
    );

    // the bad mtu left the field unset and produced one diagnostic
    assert!(state.data.network_interfaces[0].mtu.is_none());
    assert_eq!(diagnostics.error_count(), 1);
    assert!(diagnostics.iter().next().unwrap().detail.contains("'mtu'"));
}

#[tokio::test]
async fn lookup_without_config_returns_zero_interfaces() {
    let server = MockServer::start().await;
    mount_version(&server).await;
    mount_node(&server, "pve1").await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/204/status/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"vmid": 204, "status": "stopped"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/204/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let context = configured_context(&server).await;
    let mut diagnostics = Diagnostics::new();
    let state = VmConfigDataSource::new()
        .read(&context, Some(filter("pve1", 204)), &mut diagnostics)
        .await
        .unwrap();

    assert!(diagnostics.is_empty());
    assert!(state.data.network_interfaces.is_empty());
    assert_eq!(state.data.status, "stopped");
    assert_eq!(state.data.name, "");
}

#[tokio::test]
async fn missing_node_name_makes_no_remote_call() {
    let server = MockServer::start().await;
    mount_version(&server).await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let context = configured_context(&server).await;
    let incomplete = VmConfigFilter {
        node_name: Value::Null,
        vm_id: Value::Known(VmId::new(100)),
    };

    let mut diagnostics = Diagnostics::new();
    let state = VmConfigDataSource::new()
        .read(&context, Some(incomplete), &mut diagnostics)
        .await;

    assert!(state.is_none());
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(
        diagnostics.iter().next().unwrap().summary,
        "Filter Node Name Is Required"
    );
}

#[tokio::test]
async fn node_lookup_failure_is_reported() {
    let server = MockServer::start().await;
    mount_version(&server).await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve9/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("hostname lookup failed"))
        .mount(&server)
        .await;

    let context = configured_context(&server).await;
    let mut diagnostics = Diagnostics::new();
    let state = VmConfigDataSource::new()
        .read(&context, Some(filter("pve9", 100)), &mut diagnostics)
        .await;

    assert!(state.is_none());
    assert_eq!(diagnostics.error_count(), 1);
    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.summary, "Proxmox VE API: Failed to Locate Node");
    assert!(diagnostic.detail.contains("'pve9'"));
    assert!(diagnostic.detail.contains("hostname lookup failed"));
}

#[tokio::test]
async fn vm_lookup_failure_is_reported() {
    let server = MockServer::start().await;
    mount_version(&server).await;
    mount_node(&server, "pve1").await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/999/status/current"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such VM"))
        .mount(&server)
        .await;

    let context = configured_context(&server).await;
    let mut diagnostics = Diagnostics::new();
    let state = VmConfigDataSource::new()
        .read(&context, Some(filter("pve1", 999)), &mut diagnostics)
        .await;

    assert!(state.is_none());
    assert_eq!(diagnostics.error_count(), 1);
    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.summary, "Proxmox VE API: Failed to Retrieve VM");
    assert!(diagnostic.detail.contains("'999'"));
}
