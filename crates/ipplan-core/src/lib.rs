//! Core types for ipplan (IPv4 address-space planning)
//!
//! This crate provides the foundational types used throughout the ipplan workspace:
//! - [`Address`] - An IPv4 address held as an unsigned 32-bit value
//! - [`PrefixLength`] - A CIDR prefix length constrained to 0-32
//! - [`mask`] - Subnet mask <-> prefix length conversion
//! - [`IpplanError`] - Error types
//!
//! ```
//! use ipplan_core::{Address, PrefixLength};
//!
//! let addr = Address::parse("192.168.1.10").unwrap();
//! assert_eq!(addr.to_integer(), 0xC0A8010A);
//!
//! let prefix = PrefixLength::new(24).unwrap();
//! assert_eq!(prefix.mask().to_string(), "255.255.255.0");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

mod address;
pub mod mask;

pub use address::Address;
pub use mask::{mask_to_prefix, parse_mask, prefix_to_mask};

/// Narrowest prefix the planners will ever hand out.
///
/// /31 and /32 have no room for a network and a broadcast address.
pub const MAX_PLANNED_PREFIX: u8 = 30;

/// Error types for ipplan operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IpplanError {
    /// Address text is not four dot-separated octets
    #[error("Invalid address format: {0:?} (expected a.b.c.d)")]
    InvalidFormat(String),

    /// An octet parsed as a number but is above 255
    #[error("Octet out of range: {0} (must be 0-255)")]
    OctetOutOfRange(String),

    /// An octet contains something other than decimal digits
    #[error("Non-numeric octet: {0:?}")]
    NonNumericOctet(String),

    /// Prefix length outside 0-32
    #[error("Prefix length out of range: {0} (must be 0-32)")]
    PrefixOutOfRange(u32),

    /// Mask is not a run of ones followed by zeros
    #[error("Non-contiguous subnet mask: {0}")]
    NonContiguousMask(Address),

    /// CIDR text is not of the form a.b.c.d/n
    #[error("Invalid CIDR notation: {0:?} (expected a.b.c.d/n)")]
    InvalidNotation(String),

    /// Network address has host bits set for its prefix
    #[error("Network address {address} has host bits set for /{prefix}")]
    MisalignedNetwork { address: Address, prefix: u8 },

    /// Requested subnets do not fit in the base block
    #[error("Address space exhausted: {0}")]
    AddressSpaceExhausted(String),

    /// A single requirement needs more space than the whole base block
    #[error("Requirement of {hosts} hosts does not fit in a /{base_prefix} block")]
    RequirementBelowBase { hosts: u64, base_prefix: u8 },

    /// Both (or neither) planning modes were supplied
    #[error("Planning modes are mutually exclusive: {0}")]
    MutuallyExclusiveModeViolation(String),

    /// Malformed subnet requirement
    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),
}

/// Result type alias for ipplan operations
pub type Result<T> = std::result::Result<T, IpplanError>;

/// CIDR prefix length, always within 0-32
///
/// # Examples
///
/// ```
/// use ipplan_core::PrefixLength;
///
/// assert!(PrefixLength::new(32).is_ok());
/// assert!(PrefixLength::new(33).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PrefixLength(u8);

impl PrefixLength {
    /// Shortest prefix (the whole address space)
    pub const MIN: PrefixLength = PrefixLength(0);
    /// Longest prefix (a single address)
    pub const MAX: PrefixLength = PrefixLength(32);

    /// Validate a prefix length
    pub fn new(value: u32) -> Result<Self> {
        if value > 32 {
            return Err(IpplanError::PrefixOutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    /// Get the raw prefix length
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of host bits (32 - prefix)
    pub fn host_bits(self) -> u32 {
        32 - u32::from(self.0)
    }

    /// Number of addresses covered by a block of this prefix
    pub fn block_size(self) -> u64 {
        1u64 << self.host_bits()
    }

    /// Subnet mask for this prefix
    pub fn mask(self) -> Address {
        Address::from_integer(mask::mask_bits(self.0))
    }

    /// Wildcard (inverse) mask for this prefix
    pub fn wildcard(self) -> Address {
        Address::from_integer(!mask::mask_bits(self.0))
    }

    /// Derive a narrower prefix, failing if it would pass /32
    pub fn checked_add(self, bits: u32) -> Option<Self> {
        u32::from(self.0)
            .checked_add(bits)
            .filter(|p| *p <= 32)
            .map(|p| Self(p as u8))
    }
}

impl TryFrom<u8> for PrefixLength {
    type Error = IpplanError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(u32::from(value))
    }
}

impl From<PrefixLength> for u8 {
    fn from(value: PrefixLength) -> Self {
        value.0
    }
}

impl fmt::Display for PrefixLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
