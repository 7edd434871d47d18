//! Declarative provider surface for Proxmox VE configuration lookups.
//!
//! This crate reimplements a declarative-plugin contract independent of any
//! host runtime: a provider declares its schema, is configured once per
//! session with validated connection parameters, and then serves read-only
//! lookup requests, reporting problems through an accumulated diagnostics
//! channel rather than raw error propagation.
//!
//! ## Modules
//!
//! - [`value`] - Tri-state declarative attribute values
//! - [`diagnostics`] - The structured diagnostics channel
//! - [`schema`] - Host-independent schema declaration
//! - [`lifecycle`] - The provider and data-source lifecycle traits
//! - [`provider`] - Connection validation and client construction
//! - [`vm_config`] - The VM configuration data source
//! - [`netcfg`] - Network-interface configuration line parsing

#![deny(missing_docs)]

pub mod diagnostics;
pub mod lifecycle;
pub mod netcfg;
pub mod provider;
pub mod schema;
pub mod value;
pub mod vm_config;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use lifecycle::{DataSource, Provider};
pub use provider::{ProviderConfig, ProviderContext, PveProvider};
pub use schema::{Attribute, AttributeType, Schema};
pub use value::Value;
pub use vm_config::{
    NetworkInterface, VmConfigData, VmConfigDataSource, VmConfigFilter, VmConfigState,
};
