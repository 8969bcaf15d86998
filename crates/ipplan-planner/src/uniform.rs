//! Equal-size subnet planning
//!
//! A base block is split into `2^n` contiguous subnets of one prefix,
//! where `n` is the fewest extra prefix bits that satisfy the request.

use crate::{ceil_log2, host_bits_for, validate_hosts, AllocatedSubnet, SubnetOrigin};
use ipplan_cidr::NetworkBlock;
use ipplan_core::{IpplanError, PrefixLength, Result, MAX_PLANNED_PREFIX};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Most prefix bits a uniform plan may borrow (at most 65536 subnets)
pub const MAX_BORROWED_BITS: u32 = 16;

/// How a uniform plan is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// At least this many subnets
    SubnetCount(u64),
    /// At least this many usable hosts in every subnet
    HostsPerSubnet(u64),
}

impl PlanMode {
    /// Build a mode from two optional inputs, exactly one of which is set
    pub fn from_options(count: Option<u64>, hosts: Option<u64>) -> Result<Self> {
        match (count, hosts) {
            (Some(count), None) => Ok(PlanMode::SubnetCount(count)),
            (None, Some(hosts)) => Ok(PlanMode::HostsPerSubnet(hosts)),
            (Some(_), Some(_)) => Err(IpplanError::MutuallyExclusiveModeViolation(
                "both a subnet count and a host count were given".to_string(),
            )),
            (None, None) => Err(IpplanError::MutuallyExclusiveModeViolation(
                "one of a subnet count or a host count is required".to_string(),
            )),
        }
    }
}

/// Result of a uniform plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformPlan {
    pub base: NetworkBlock,
    pub mode: PlanMode,
    pub new_prefix: PrefixLength,
    /// Prefix bits added to the base prefix
    pub bits_borrowed: u32,
    pub subnets: Vec<AllocatedSubnet>,
    /// Base block addresses (less network and broadcast) not covered by subnets
    pub wasted_addresses: u64,
}

impl UniformPlan {
    pub fn subnet_count(&self) -> usize {
        self.subnets.len()
    }

    /// Addresses in each subnet
    pub fn addresses_per_subnet(&self) -> u64 {
        self.new_prefix.block_size()
    }

    /// Usable hosts in each subnet
    pub fn usable_hosts_per_subnet(&self) -> u64 {
        self.addresses_per_subnet() - 2
    }
}

/// Split `base` into equal subnets
///
/// By count, fails with `AddressSpaceExhausted` if the resulting prefix
/// would be longer than /30. By hosts, fails with `RequirementBelowBase`
/// if one subnet would need to be larger than `base`. Either mode fails
/// with `AddressSpaceExhausted` past [`MAX_BORROWED_BITS`] borrowed bits.
///
/// # Examples
///
/// ```
/// use ipplan_cidr::NetworkBlock;
/// use ipplan_planner::{plan_uniform, PlanMode};
///
/// let base = NetworkBlock::parse("10.0.0.0/22").unwrap();
/// let plan = plan_uniform(&base, PlanMode::SubnetCount(4)).unwrap();
/// assert_eq!(plan.new_prefix.get(), 24);
/// assert_eq!(plan.subnet_count(), 4);
/// assert_eq!(plan.subnets[3].network.to_string(), "10.0.3.0/24");
/// ```
pub fn plan_uniform(base: &NetworkBlock, mode: PlanMode) -> Result<UniformPlan> {
    let base_prefix = u32::from(base.prefix().get());

    let (new_prefix, bits_borrowed) = match mode {
        PlanMode::SubnetCount(count) => {
            if count == 0 {
                return Err(IpplanError::InvalidRequirement(
                    "subnet count must be at least 1".to_string(),
                ));
            }
            let bits = ceil_log2(count);
            let new_prefix = base_prefix + bits;
            if new_prefix > u32::from(MAX_PLANNED_PREFIX) {
                return Err(IpplanError::AddressSpaceExhausted(format!(
                    "{} subnets of {} need /{}, longer than /{}",
                    count, base, new_prefix, MAX_PLANNED_PREFIX
                )));
            }
            (new_prefix, bits)
        }
        PlanMode::HostsPerSubnet(hosts) => {
            validate_hosts("hosts per subnet", hosts)?;
            let host_bits = host_bits_for(hosts);
            if host_bits > 32 || 32 - host_bits < base_prefix {
                return Err(IpplanError::RequirementBelowBase {
                    hosts,
                    base_prefix: base.prefix().get(),
                });
            }
            let new_prefix = 32 - host_bits;
            (new_prefix, new_prefix - base_prefix)
        }
    };

    if bits_borrowed > MAX_BORROWED_BITS {
        return Err(IpplanError::AddressSpaceExhausted(format!(
            "splitting {} into /{} gives 2^{} subnets, more than the 2^{} limit",
            base, new_prefix, bits_borrowed, MAX_BORROWED_BITS
        )));
    }

    let new_prefix = PrefixLength::new(new_prefix)?;
    debug!(%base, ?mode, new_prefix = new_prefix.get(), bits_borrowed, "uniform plan");

    let subnets: Vec<AllocatedSubnet> = base
        .subnets(new_prefix)
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(index, network)| AllocatedSubnet::new(SubnetOrigin::Ordinal { index }, network))
        .collect();

    let used = subnets.len() as u64 * new_prefix.block_size();
    let wasted_addresses = base.size().saturating_sub(2).saturating_sub(used);

    Ok(UniformPlan {
        base: *base,
        mode,
        new_prefix,
        bits_borrowed,
        subnets,
        wasted_addresses,
    })
}
