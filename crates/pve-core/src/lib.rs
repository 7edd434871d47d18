//! # pve-core
//!
//! Core types and utilities for working with the Proxmox VE API.
//!
//! This crate provides foundational types, error handling, and HTTP client
//! settings shared by the Proxmox VE provider workspace.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`types`] - Strongly-typed identifiers for Proxmox VE resources
//! - [`config`] - Connection configuration and validation
//! - [`client`] - HTTP transport settings

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
