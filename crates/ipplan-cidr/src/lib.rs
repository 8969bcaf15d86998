//! CIDR network blocks and range queries
//!
//! Provides utilities for working with network-aligned CIDR blocks:
//! - Parse CIDR notation (e.g., "192.168.0.0/24")
//! - Network, broadcast and usable host range calculations
//! - Containment checks for addresses and nested blocks
//! - Enumerate the subnets of a block at a longer prefix
//! - Detect overlapping blocks ([`overlap`])
//!
//! # Examples
//!
//! ```
//! use ipplan_cidr::NetworkBlock;
//! use ipplan_core::Address;
//!
//! let block = NetworkBlock::parse("192.168.1.0/24").unwrap();
//! assert_eq!(block.prefix().get(), 24);
//! assert_eq!(block.network().to_integer(), 0xC0A80100);
//! assert!(block.contains(Address::from_integer(0xC0A80101))); // 192.168.1.1
//! assert!(!block.contains(Address::from_integer(0xC0A80001))); // 192.168.0.1
//! ```

use ipplan_core::{Address, IpplanError, PrefixLength, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod overlap;

pub use overlap::{find_overlaps, find_overlaps_between, has_overlaps, Overlap, OverlapReport};

/// Network-aligned CIDR block
///
/// The network address never has host bits set for its prefix. Two blocks
/// are equal only when both network and prefix match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkBlock {
    network: Address,
    prefix: PrefixLength,
}

impl NetworkBlock {
    /// Parse CIDR notation string
    ///
    /// Host bits in the address are cleared, so `192.168.1.77/24` yields
    /// `192.168.1.0/24`. Use [`NetworkBlock::new`] to reject such input.
    ///
    /// # Examples
    ///
    /// ```
    /// use ipplan_cidr::NetworkBlock;
    ///
    /// let block = NetworkBlock::parse("10.0.0.0/8").unwrap();
    /// assert_eq!(block.prefix().get(), 8);
    /// ```
    pub fn parse(cidr: &str) -> Result<Self> {
        let (address_text, prefix_text) = cidr
            .split_once('/')
            .ok_or_else(|| IpplanError::InvalidNotation(cidr.to_string()))?;

        if prefix_text.is_empty() || !prefix_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IpplanError::InvalidNotation(cidr.to_string()));
        }
        let prefix_value: u32 = prefix_text
            .parse()
            .map_err(|_| IpplanError::InvalidNotation(cidr.to_string()))?;

        let prefix = PrefixLength::new(prefix_value)?;
        let address = Address::parse(address_text)?;

        Ok(Self::containing(address, prefix))
    }

    /// Create a block from an already-aligned network address
    ///
    /// Fails with [`IpplanError::MisalignedNetwork`] when host bits are set.
    pub fn new(network: Address, prefix: PrefixLength) -> Result<Self> {
        let block = Self::containing(network, prefix);
        if block.network != network {
            return Err(IpplanError::MisalignedNetwork {
                address: network,
                prefix: prefix.get(),
            });
        }
        Ok(block)
    }

    /// The block of the given prefix that contains `address`
    pub fn containing(address: Address, prefix: PrefixLength) -> Self {
        let network = address.to_integer() & prefix.mask().to_integer();
        Self {
            network: Address::from_integer(network),
            prefix,
        }
    }

    /// Get network address
    pub fn network(&self) -> Address {
        self.network
    }

    /// Get prefix length
    pub fn prefix(&self) -> PrefixLength {
        self.prefix
    }

    /// Get subnet mask
    pub fn mask(&self) -> Address {
        self.prefix.mask()
    }

    /// Get wildcard (inverse) mask
    pub fn wildcard(&self) -> Address {
        self.prefix.wildcard()
    }

    /// Get broadcast address (last address of the block)
    pub fn broadcast(&self) -> Address {
        Address::from_integer(self.network.to_integer() | self.wildcard().to_integer())
    }

    /// Get first usable address (network + 1)
    ///
    /// /31 and /32 have no network/broadcast reservation.
    pub fn first_host(&self) -> Address {
        if self.prefix.get() >= 31 {
            self.network
        } else {
            Address::from_integer(self.network.to_integer() + 1)
        }
    }

    /// Get last usable address (broadcast - 1)
    pub fn last_host(&self) -> Address {
        if self.prefix.get() >= 31 {
            self.broadcast()
        } else {
            Address::from_integer(self.broadcast().to_integer() - 1)
        }
    }

    /// Get total number of addresses in this block
    pub fn size(&self) -> u64 {
        self.prefix.block_size()
    }

    /// Number of addresses usable by hosts
    pub fn usable_hosts(&self) -> u64 {
        match self.prefix.get() {
            32 => 1,
            31 => 2,
            _ => self.size() - 2,
        }
    }

    /// Inclusive (first, last) address range
    pub fn range(&self) -> (Address, Address) {
        (self.network, self.broadcast())
    }

    /// Check if an address is in this block
    pub fn contains(&self, address: Address) -> bool {
        address.to_integer() & self.mask().to_integer() == self.network.to_integer()
    }

    /// Check if `other` lies entirely within this block
    pub fn contains_block(&self, other: &NetworkBlock) -> bool {
        other.prefix >= self.prefix && self.contains(other.network)
    }

    /// Iterate the subnets of this block at a longer prefix
    ///
    /// Returns `None` if `new_prefix` is shorter than this block's prefix.
    pub fn subnets(&self, new_prefix: PrefixLength) -> Option<Subnets> {
        if new_prefix < self.prefix {
            return None;
        }
        let start = u64::from(self.network.to_integer());
        Some(Subnets {
            current: start,
            end: start + self.size(),
            step: new_prefix.block_size(),
            prefix: new_prefix,
        })
    }
}

impl AsRef<NetworkBlock> for NetworkBlock {
    fn as_ref(&self) -> &NetworkBlock {
        self
    }
}

impl fmt::Display for NetworkBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl FromStr for NetworkBlock {
    type Err = IpplanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NetworkBlock {
    type Error = IpplanError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<NetworkBlock> for String {
    fn from(value: NetworkBlock) -> Self {
        value.to_string()
    }
}

/// Iterator over equally sized subnets of a block, in address order
#[derive(Debug, Clone)]
pub struct Subnets {
    current: u64,
    end: u64,
    step: u64,
    prefix: PrefixLength,
}

impl Iterator for Subnets {
    type Item = NetworkBlock;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.end {
            return None;
        }
        let block = NetworkBlock {
            network: Address::from_integer(self.current as u32),
            prefix: self.prefix,
        };
        self.current += self.step;
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from((self.end - self.current) / self.step).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(text: &str) -> Address {
        Address::parse(text).unwrap()
    }

    #[test]
    fn test_parse_cidr() {
        let block = NetworkBlock::parse("192.168.1.0/24").unwrap();
        assert_eq!(block.network().to_integer(), 0xC0A80100);
        assert_eq!(block.prefix().get(), 24);
    }

    #[test]
    fn test_parse_clears_host_bits() {
        let block = NetworkBlock::parse("192.168.1.77/24").unwrap();
        assert_eq!(block.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn test_parse_invalid_cidr() {
        assert!(matches!(
            NetworkBlock::parse("192.168.1.0"),
            Err(IpplanError::InvalidNotation(_))
        ));
        assert!(matches!(
            NetworkBlock::parse("192.168.1.0/"),
            Err(IpplanError::InvalidNotation(_))
        ));
        assert!(matches!(
            NetworkBlock::parse("192.168.1.0/2/4"),
            Err(IpplanError::InvalidNotation(_))
        ));
        assert_eq!(
            NetworkBlock::parse("192.168.1.0/33"),
            Err(IpplanError::PrefixOutOfRange(33))
        );
        assert_eq!(
            NetworkBlock::parse("10.0.0.0/99999999999"),
            Err(IpplanError::InvalidNotation("10.0.0.0/99999999999".to_string()))
        );
        assert!(matches!(
            NetworkBlock::parse("256.0.0.0/24"),
            Err(IpplanError::OctetOutOfRange(_))
        ));
    }

    #[test]
    fn test_new_rejects_misaligned() {
        let prefix = PrefixLength::new(24).unwrap();
        assert!(NetworkBlock::new(addr("10.0.0.0"), prefix).is_ok());
        assert_eq!(
            NetworkBlock::new(addr("10.0.0.5"), prefix),
            Err(IpplanError::MisalignedNetwork {
                address: addr("10.0.0.5"),
                prefix: 24,
            })
        );
    }

    #[test]
    fn test_block_contains() {
        let block = NetworkBlock::parse("192.168.1.0/24").unwrap();
        assert!(block.contains(addr("192.168.1.0")));
        assert!(block.contains(addr("192.168.1.255")));
        assert!(!block.contains(addr("192.168.0.1")));
        assert!(!block.contains(addr("192.168.2.0")));
    }

    #[test]
    fn test_contains_block() {
        let outer = NetworkBlock::parse("10.0.0.0/16").unwrap();
        let inner = NetworkBlock::parse("10.0.4.0/22").unwrap();
        assert!(outer.contains_block(&inner));
        assert!(!inner.contains_block(&outer));
        assert!(outer.contains_block(&outer));
    }

    #[test]
    fn test_block_addresses() {
        let block = NetworkBlock::parse("192.168.1.64/26").unwrap();
        assert_eq!(block.broadcast(), addr("192.168.1.127"));
        assert_eq!(block.first_host(), addr("192.168.1.65"));
        assert_eq!(block.last_host(), addr("192.168.1.126"));
        assert_eq!(block.mask(), addr("255.255.255.192"));
        assert_eq!(block.wildcard(), addr("0.0.0.63"));
        assert_eq!(block.size(), 64);
        assert_eq!(block.usable_hosts(), 62);
        assert_eq!(block.range(), (addr("192.168.1.64"), addr("192.168.1.127")));
    }

    #[test]
    fn test_point_to_point_and_host_blocks() {
        let p2p = NetworkBlock::parse("10.0.0.0/31").unwrap();
        assert_eq!(p2p.usable_hosts(), 2);
        assert_eq!(p2p.first_host(), addr("10.0.0.0"));
        assert_eq!(p2p.last_host(), addr("10.0.0.1"));

        let host = NetworkBlock::parse("10.0.0.9/32").unwrap();
        assert_eq!(host.size(), 1);
        assert_eq!(host.usable_hosts(), 1);
        assert_eq!(host.first_host(), host.last_host());
    }

    #[test]
    fn test_whole_space() {
        let all = NetworkBlock::parse("0.0.0.0/0").unwrap();
        assert_eq!(all.size(), 1u64 << 32);
        assert_eq!(all.broadcast(), Address::BROADCAST);
        assert!(all.contains(addr("203.0.113.9")));
    }

    #[test]
    fn test_subnets() {
        let block = NetworkBlock::parse("10.0.0.0/22").unwrap();
        let subnets: Vec<String> = block
            .subnets(PrefixLength::new(24).unwrap())
            .unwrap()
            .map(|b| b.to_string())
            .collect();
        assert_eq!(
            subnets,
            vec!["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24", "10.0.3.0/24"]
        );
        assert!(block.subnets(PrefixLength::new(20).unwrap()).is_none());
    }

    #[test]
    fn test_subnets_at_top_of_space() {
        let block = NetworkBlock::parse("255.255.255.0/24").unwrap();
        let subnets: Vec<_> = block.subnets(PrefixLength::new(25).unwrap()).unwrap().collect();
        assert_eq!(subnets.len(), 2);
        assert_eq!(subnets[1].to_string(), "255.255.255.128/25");
    }

    #[test]
    fn test_block_display_and_serde() {
        let block = NetworkBlock::parse("172.16.0.0/12").unwrap();
        assert_eq!(block.to_string(), "172.16.0.0/12");

        let json = serde_json::to_string(&block).expect("serialization failed");
        assert_eq!(json, "\"172.16.0.0/12\"");
        let back: NetworkBlock = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(back, block);
    }
}
