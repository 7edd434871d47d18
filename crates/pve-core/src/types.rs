//! Strongly-typed identifiers for Proxmox VE resources.
//!
//! Proxmox VE identifies virtual machines by a cluster-wide numeric id
//! rather than a UUID. The wrapper type here keeps those ids from being
//! mixed up with other integers at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Cluster-wide numeric identifier of a virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VmId(u32);

impl VmId {
    /// Creates a new VM id from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for VmId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<VmId> for u32 {
    fn from(id: VmId) -> Self {
        id.0
    }
}

impl fmt::Display for VmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VmId {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        input
            .parse::<u32>()
            .map(Self)
            .map_err(|_| Error::InvalidVmId(input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_value() {
        assert_eq!(VmId::new(100).to_string(), "100");
    }

    #[test]
    fn from_str_parses_valid_id() {
        let id: VmId = "100".parse().unwrap();
        assert_eq!(id, VmId::new(100));
        assert_eq!(id.value(), 100);
    }

    #[test]
    fn from_str_rejects_invalid_id() {
        let err = "vm-100".parse::<VmId>().unwrap_err();
        assert!(matches!(err, Error::InvalidVmId(_)));
        assert_eq!(err.error_code(), "INVALID_VM_ID");
    }

    #[test]
    fn serde_is_transparent() {
        let id: VmId = serde_json::from_str("100").unwrap();
        assert_eq!(id, VmId::new(100));
        assert_eq!(serde_json::to_string(&id).unwrap(), "100");
    }

    #[test]
    fn conversions_round_trip() {
        let id = VmId::from(204u32);
        assert_eq!(u32::from(id), 204);
    }
}
