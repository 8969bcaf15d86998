//! Variable-length subnet allocation
//!
//! Requirements are served largest first from a single cursor that walks
//! the base block. Serving in descending size keeps every allocation
//! aligned on its own block size, so no address is stranded between
//! subnets.

use crate::{
    host_bits_for, validate_hosts, AllocatedSubnet, OversizePolicy, PlannerConfig, SubnetOrigin,
    SubnetRequirement,
};
use ipplan_cidr::NetworkBlock;
use ipplan_core::{Address, IpplanError, PrefixLength, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, warn};

/// A requirement that could not fit even in the whole base block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRequirement {
    /// Position in the caller's input
    pub index: usize,
    pub requirement: SubnetRequirement,
    pub base_prefix: PrefixLength,
}

impl SkippedRequirement {
    /// The error this skip stands for
    pub fn error(&self) -> IpplanError {
        IpplanError::RequirementBelowBase {
            hosts: self.requirement.hosts_needed,
            base_prefix: self.base_prefix.get(),
        }
    }
}

/// Result of a VLSM allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlsmPlan {
    pub base: NetworkBlock,
    /// Allocations in address order (largest requirement first)
    pub allocations: Vec<AllocatedSubnet>,
    /// Oversized requirements skipped under [`OversizePolicy::Warn`]
    pub skipped: Vec<SkippedRequirement>,
    /// Addresses handed out across all allocations
    pub total_allocated: u64,
    /// Addresses left after the last allocation
    pub remaining_addresses: u64,
}

impl VlsmPlan {
    /// Allocations ordered as the requirements were given
    pub fn in_input_order(&self) -> Vec<&AllocatedSubnet> {
        let mut ordered: Vec<&AllocatedSubnet> = self.allocations.iter().collect();
        ordered.sort_by_key(|subnet| subnet.origin.index());
        ordered
    }

    /// True if any requirement was skipped
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Share of the base block handed out, in percent
    pub fn utilization_percent(&self) -> f64 {
        self.total_allocated as f64 / self.base.size() as f64 * 100.0
    }
}

/// Greedy largest-first VLSM allocator
#[derive(Debug, Clone, Default)]
pub struct VlsmAllocator {
    config: PlannerConfig,
}

impl VlsmAllocator {
    /// Create an allocator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator with explicit settings
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Allocate one subnet per requirement inside `base`
    ///
    /// A requirement larger than `base` is skipped with a warning or fails
    /// the run, depending on [`OversizePolicy`]. If every requirement is
    /// skipped the run fails with the first one's `RequirementBelowBase`.
    /// Running out of room for requirements that individually fit fails
    /// with `AddressSpaceExhausted`.
    pub fn allocate(
        &self,
        base: &NetworkBlock,
        requirements: &[SubnetRequirement],
    ) -> Result<VlsmPlan> {
        for requirement in requirements {
            validate_hosts(&requirement.name, requirement.hosts_needed)?;
        }

        let mut order: Vec<usize> = (0..requirements.len()).collect();
        order.sort_by_key(|&i| Reverse(requirements[i].hosts_needed));

        let base_prefix = base.prefix();
        let start = u64::from(base.network().to_integer());
        let end = start + base.size();
        let mut cursor = start;

        let mut allocations = Vec::with_capacity(requirements.len());
        let mut skipped = Vec::new();

        for index in order {
            let requirement = &requirements[index];
            let host_bits = host_bits_for(requirement.hosts_needed);

            if host_bits > 32 || 32 - host_bits < u32::from(base_prefix.get()) {
                let skip = SkippedRequirement {
                    index,
                    requirement: requirement.clone(),
                    base_prefix,
                };
                if self.config.oversize_policy == OversizePolicy::Fail {
                    return Err(skip.error());
                }
                warn!(
                    name = %requirement.name,
                    hosts = requirement.hosts_needed,
                    %base,
                    "requirement larger than base block, skipping"
                );
                skipped.push(skip);
                continue;
            }

            let size = 1u64 << host_bits;
            if cursor + size > end {
                return Err(IpplanError::AddressSpaceExhausted(format!(
                    "{} needs {} addresses but only {} remain in {}",
                    requirement.name,
                    size,
                    end - cursor,
                    base
                )));
            }

            let prefix = PrefixLength::new(32 - host_bits)?;
            let network = NetworkBlock::new(Address::from_integer(cursor as u32), prefix)?;
            debug!(name = %requirement.name, %network, "allocated");

            allocations.push(AllocatedSubnet::new(
                SubnetOrigin::Requirement {
                    index,
                    requirement: requirement.clone(),
                },
                network,
            ));
            cursor += size;
        }

        if allocations.is_empty() {
            if let Some(first) = skipped.first() {
                return Err(first.error());
            }
        }

        Ok(VlsmPlan {
            base: *base,
            allocations,
            skipped,
            total_allocated: cursor - start,
            remaining_addresses: end - cursor,
        })
    }
}

/// Allocate with default settings
pub fn allocate_vlsm(base: &NetworkBlock, requirements: &[SubnetRequirement]) -> Result<VlsmPlan> {
    VlsmAllocator::new().allocate(base, requirements)
}
