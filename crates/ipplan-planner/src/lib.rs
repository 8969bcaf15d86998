//! Subnet planning over a base CIDR block
//!
//! Two planners share the [`AllocatedSubnet`] output type:
//! - [`plan_uniform`] - split a block into equal subnets, sized either by
//!   subnet count or by hosts per subnet
//! - [`VlsmAllocator`] - carve variable-length subnets for named host
//!   requirements, largest first
//!
//! Planner output never overlaps, and no planner hands out a prefix longer
//! than [`MAX_PLANNED_PREFIX`].
//!
//! # Examples
//!
//! ```
//! use ipplan_cidr::NetworkBlock;
//! use ipplan_planner::{allocate_vlsm, SubnetRequirement};
//!
//! let base = NetworkBlock::parse("192.168.1.0/24").unwrap();
//! let requirements = SubnetRequirement::parse_list("A:60,B:10,C:2").unwrap();
//!
//! let plan = allocate_vlsm(&base, &requirements).unwrap();
//! assert_eq!(plan.allocations[0].network.to_string(), "192.168.1.0/26");
//! assert_eq!(plan.allocations[1].network.to_string(), "192.168.1.64/28");
//! assert_eq!(plan.allocations[2].network.to_string(), "192.168.1.80/30");
//! ```

use ipplan_cidr::NetworkBlock;
use ipplan_core::{Address, IpplanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod config;
pub mod uniform;
pub mod vlsm;

pub use config::{OversizePolicy, PlannerConfig};
pub use ipplan_core::MAX_PLANNED_PREFIX;
pub use uniform::{plan_uniform, PlanMode, UniformPlan, MAX_BORROWED_BITS};
pub use vlsm::{allocate_vlsm, SkippedRequirement, VlsmAllocator, VlsmPlan};

/// Largest host count a single requirement may ask for
pub const MAX_HOSTS: u64 = u32::MAX as u64;

/// A named host-count requirement for VLSM allocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubnetRequirement {
    pub name: String,
    pub hosts_needed: u64,
}

impl SubnetRequirement {
    /// Create a requirement, rejecting empty names and zero hosts
    pub fn new(name: impl Into<String>, hosts_needed: u64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(IpplanError::InvalidRequirement(
                "requirement name is empty".to_string(),
            ));
        }
        validate_hosts(&name, hosts_needed)?;
        Ok(Self { name, hosts_needed })
    }

    /// Parse a comma-separated `name:hosts` list
    ///
    /// Blank entries are ignored, so a trailing comma is accepted.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect()
    }
}

pub(crate) fn validate_hosts(name: &str, hosts: u64) -> Result<()> {
    if hosts == 0 || hosts > MAX_HOSTS {
        return Err(IpplanError::InvalidRequirement(format!(
            "{}: host count must be between 1 and {}, got {}",
            name, MAX_HOSTS, hosts
        )));
    }
    Ok(())
}

impl FromStr for SubnetRequirement {
    type Err = IpplanError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, hosts) = s.rsplit_once(':').ok_or_else(|| {
            IpplanError::InvalidRequirement(format!("expected name:hosts, got {:?}", s))
        })?;

        let hosts: u64 = hosts.trim().parse().map_err(|_| {
            IpplanError::InvalidRequirement(format!(
                "{}: host count {:?} is not a number",
                name, hosts
            ))
        })?;

        Self::new(name.trim(), hosts)
    }
}

impl fmt::Display for SubnetRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.hosts_needed)
    }
}

/// Where an allocated subnet came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubnetOrigin {
    /// Position in a uniform plan
    Ordinal { index: usize },
    /// A VLSM requirement, with its position in the caller's input
    Requirement {
        index: usize,
        requirement: SubnetRequirement,
    },
}

impl SubnetOrigin {
    /// Ordinal position (uniform) or input position (VLSM)
    pub fn index(&self) -> usize {
        match self {
            SubnetOrigin::Ordinal { index } | SubnetOrigin::Requirement { index, .. } => *index,
        }
    }

    /// Display label: the requirement name, or "Subnet N" (1-based)
    pub fn label(&self) -> String {
        match self {
            SubnetOrigin::Ordinal { index } => format!("Subnet {}", index + 1),
            SubnetOrigin::Requirement { requirement, .. } => requirement.name.clone(),
        }
    }
}

/// One subnet produced by a planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedSubnet {
    pub origin: SubnetOrigin,
    pub network: NetworkBlock,
    pub first_host: Address,
    pub last_host: Address,
    pub broadcast: Address,
    pub total_addresses: u64,
    pub usable_hosts: u64,
}

impl AllocatedSubnet {
    /// Planners only produce /30 or shorter, so two addresses are always
    /// reserved for network and broadcast.
    pub(crate) fn new(origin: SubnetOrigin, network: NetworkBlock) -> Self {
        let total_addresses = network.size();
        Self {
            origin,
            first_host: network.first_host(),
            last_host: network.last_host(),
            broadcast: network.broadcast(),
            total_addresses,
            usable_hosts: total_addresses - 2,
            network,
        }
    }
}

impl AsRef<NetworkBlock> for AllocatedSubnet {
    fn as_ref(&self) -> &NetworkBlock {
        &self.network
    }
}

/// ceil(log2(n)), with 0 for n <= 1
pub(crate) fn ceil_log2(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        64 - (n - 1).leading_zeros()
    }
}

/// Host bits needed for `hosts` usable addresses plus network and broadcast
pub fn host_bits_for(hosts: u64) -> u32 {
    ceil_log2(hosts.saturating_add(2))
}
