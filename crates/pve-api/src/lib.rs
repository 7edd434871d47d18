//! Proxmox VE API client and data models.
//!
//! This crate exposes strongly typed structures and an asynchronous HTTP client
//! for the read-only subset of the Proxmox VE API the provider consumes:
//! version metadata, cluster node status, and virtual machine status and
//! configuration.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{PveClient, PveClientBuilder};
pub use models::{
    ApiData, NodeMemory, NodeStatus, VersionInfo, VirtualMachine, VmConfig, VmStatus,
};

/// Convenient result alias matching the shared core error type.
pub type Result<T> = pve_core::Result<T>;
