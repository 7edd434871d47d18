//! Network-interface configuration line parsing.
//!
//! The platform stores one network interface per slot as a comma-separated
//! line of `key=value` pairs, e.g.
//! `virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0,firewall=1,tag=100,trunks=10;20;30`.
//! Parsing is lenient: a value that fails coercion leaves that field unset
//! and records one diagnostic naming the key, while the remaining pairs keep
//! processing. Unrecognized keys are ignored.

use crate::diagnostics::Diagnostics;
use crate::vm_config::NetworkInterface;

/// Parse one raw network-interface configuration line.
///
/// The raw line is retained verbatim on the returned interface regardless of
/// the parse outcome. The caller is expected to filter out empty lines.
#[must_use]
pub fn parse_net_config(raw: &str, diagnostics: &mut Diagnostics) -> NetworkInterface {
    let mut interface = NetworkInterface {
        raw_config: raw.to_string(),
        ..NetworkInterface::default()
    };

    for pair in raw.split(',') {
        let Some((key, value)) = pair.split_once('=') else {
            diagnostics.add_error(
                "Malformed VM Config Entry",
                format!(
                    "The network interface configuration entry '{pair}' is not a key=value pair."
                ),
            );
            continue;
        };

        match key {
            "model" => interface.model = Some(value.to_string()),
            "bridge" => interface.bridge = Some(value.to_string()),
            "firewall" => {
                if let Some(parsed) = parse_bool("firewall", value, diagnostics) {
                    interface.firewall = Some(parsed);
                }
            }
            "link_down" => {
                if let Some(parsed) = parse_bool("link_down", value, diagnostics) {
                    interface.link_down = Some(parsed);
                }
            }
            "macaddr" | "virtio" => interface.hardware_address = Some(value.to_string()),
            "mtu" => {
                if let Some(parsed) = parse_i32("mtu", value, diagnostics) {
                    interface.mtu = Some(parsed);
                }
            }
            "queues" => {
                if let Some(parsed) = parse_i32("queues", value, diagnostics) {
                    interface.queues = Some(parsed);
                }
            }
            "rate" => {
                if let Some(parsed) = parse_i32("rate", value, diagnostics) {
                    interface.rate = Some(parsed);
                }
            }
            "tag" => {
                if let Some(parsed) = parse_i32("tag", value, diagnostics) {
                    interface.tag = Some(parsed);
                }
            }
            "trunks" => {
                let mut trunks = Vec::new();
                for element in value.split(';') {
                    if let Some(parsed) = parse_i32("trunks", element, diagnostics) {
                        trunks.push(parsed);
                    }
                }
                interface.trunks = Some(trunks);
            }
            _ => {}
        }
    }

    interface
}

/// Parse the platform's boolean literal encoding.
fn parse_bool(key: &str, value: &str, diagnostics: &mut Diagnostics) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        other => {
            value_diagnostic(diagnostics, key, &format!("invalid boolean literal `{other}`"));
            None
        }
    }
}

fn parse_i32(key: &str, value: &str, diagnostics: &mut Diagnostics) -> Option<i32> {
    match value.parse::<i32>() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            value_diagnostic(diagnostics, key, &err.to_string());
            None
        }
    }
}

fn value_diagnostic(diagnostics: &mut Diagnostics, key: &str, message: &str) {
    diagnostics.add_error(
        "Unexpected VM Config Value",
        format!(
            "The value for the '{key}' property for the network interface was not expected: \
             {message}"
        ),
    );
}
