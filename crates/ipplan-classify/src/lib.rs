//! IPv4 address classification
//!
//! Derives descriptive metadata for a single address:
//! - Legacy classful class (A-E)
//! - Address category (loopback, multicast, reserved, private, public)
//! - Classful default prefix, where one exists
//!
//! Everything here is a pure lookup against fixed range tables.
//!
//! # Examples
//!
//! ```
//! use ipplan_classify::{classify, AddressClass, Category};
//! use ipplan_core::Address;
//!
//! let result = classify(Address::parse("10.5.5.5").unwrap());
//! assert_eq!(result.class, AddressClass::A);
//! assert_eq!(result.category, Category::Private);
//! assert_eq!(result.default_prefix.map(|p| p.get()), Some(8));
//! ```

use ipplan_core::{Address, PrefixLength};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Legacy classful address class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressClass {
    A,
    B,
    C,
    D,
    E,
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            AddressClass::A => "A",
            AddressClass::B => "B",
            AddressClass::C => "C",
            AddressClass::D => "D",
            AddressClass::E => "E",
        };
        f.write_str(letter)
    }
}

/// Address usage category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Private,
    Public,
    Loopback,
    Multicast,
    Reserved,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Private => "Private",
            Category::Public => "Public",
            Category::Loopback => "Loopback",
            Category::Multicast => "Multicast",
            Category::Reserved => "Reserved",
        };
        f.write_str(name)
    }
}

/// Private ranges as (network, prefix length).
///
/// Link-local 169.254.0.0/16 is counted as private.
const PRIVATE_RANGES: [(u32, u32); 4] = [
    (0x0A00_0000, 8),  // 10.0.0.0/8
    (0xAC10_0000, 12), // 172.16.0.0/12
    (0xC0A8_0000, 16), // 192.168.0.0/16
    (0xA9FE_0000, 16), // 169.254.0.0/16
];

/// Classification of a single address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The address that was classified
    pub address: Address,
    /// Legacy class
    pub class: AddressClass,
    /// Usage category
    pub category: Category,
    /// Classful default prefix (A/B/C only)
    pub default_prefix: Option<PrefixLength>,
}

impl ClassificationResult {
    /// True for RFC 1918 and link-local space
    pub fn is_private(&self) -> bool {
        self.category == Category::Private
    }

    /// True when the address is usable on the public internet
    pub fn is_routable(&self) -> bool {
        self.category == Category::Public
    }
}

/// Legacy class from the first octet
///
/// 0.x and 127.x are not folded into class A; they fall through to E
/// together with 240-255 and are distinguished by [`category_of`].
pub fn class_of(address: Address) -> AddressClass {
    match address.first_octet() {
        1..=126 => AddressClass::A,
        128..=191 => AddressClass::B,
        192..=223 => AddressClass::C,
        224..=239 => AddressClass::D,
        _ => AddressClass::E,
    }
}

/// Usage category
///
/// Checked in priority order: loopback, multicast, reserved, private,
/// then public as the fallback.
pub fn category_of(address: Address) -> Category {
    let first = address.first_octet();
    if first == 127 {
        Category::Loopback
    } else if (224..=239).contains(&first) {
        Category::Multicast
    } else if first == 0 || first >= 240 {
        Category::Reserved
    } else if is_private_range(address) {
        Category::Private
    } else {
        Category::Public
    }
}

fn is_private_range(address: Address) -> bool {
    let bits = address.to_integer();
    PRIVATE_RANGES.iter().any(|&(network, prefix)| {
        let mask = u32::MAX << (32 - prefix);
        bits & mask == network
    })
}

/// Classful default prefix: /8, /16 and /24 for A, B and C
pub fn default_prefix_for(class: AddressClass) -> Option<PrefixLength> {
    let prefix = match class {
        AddressClass::A => 8,
        AddressClass::B => 16,
        AddressClass::C => 24,
        AddressClass::D | AddressClass::E => return None,
    };
    PrefixLength::new(prefix).ok()
}

/// Full classification of an address
pub fn classify(address: Address) -> ClassificationResult {
    let class = class_of(address);
    ClassificationResult {
        address,
        class,
        category: category_of(address),
        default_prefix: default_prefix_for(class),
    }
}
