//! Dotted-quad text <-> 32-bit integer codec

use crate::{IpplanError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// IPv4 address as an unsigned 32-bit value
///
/// All arithmetic in ipplan happens on this value; text only appears at
/// [`Address::parse`] and [`fmt::Display`].
///
/// # Examples
///
/// ```
/// use ipplan_core::Address;
///
/// let dns = Address::parse("8.8.8.8").unwrap();
/// assert_eq!(dns, Address::from_integer(0x08080808));
/// assert_eq!(dns.to_string(), "8.8.8.8");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(u32);

impl Address {
    /// 0.0.0.0
    pub const UNSPECIFIED: Address = Address(0);
    /// 255.255.255.255
    pub const BROADCAST: Address = Address(u32::MAX);

    /// Parse dotted-quad text
    ///
    /// Accepts exactly four decimal octets in 0-255 with no surrounding
    /// whitespace.
    pub fn parse(text: &str) -> Result<Self> {
        let segments: Vec<&str> = text.split('.').collect();
        if segments.len() != 4 {
            return Err(IpplanError::InvalidFormat(text.to_string()));
        }

        let mut value = 0u32;
        for segment in segments {
            value = (value << 8) | u32::from(parse_octet(segment)?);
        }

        Ok(Self(value))
    }

    /// Build from the integer form
    pub const fn from_integer(value: u32) -> Self {
        Self(value)
    }

    /// Get the integer form
    pub const fn to_integer(self) -> u32 {
        self.0
    }

    /// Build from four octets, most significant first
    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(octets))
    }

    /// Get the four octets, most significant first
    pub const fn octets(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// First (most significant) octet
    pub const fn first_octet(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Add an offset, returning `None` past 255.255.255.255
    pub fn checked_add(self, offset: u32) -> Option<Self> {
        self.0.checked_add(offset).map(Self)
    }

    /// Subtract an offset, returning `None` below 0.0.0.0
    pub fn checked_sub(self, offset: u32) -> Option<Self> {
        self.0.checked_sub(offset).map(Self)
    }
}

fn parse_octet(segment: &str) -> Result<u8> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IpplanError::NonNumericOctet(segment.to_string()));
    }

    // All digits, so the only possible failure is overflow.
    match segment.parse::<u32>() {
        Ok(value) if value <= 255 => Ok(value as u8),
        _ => Err(IpplanError::OctetOutOfRange(segment.to_string())),
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl FromStr for Address {
    type Err = IpplanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Address> for u32 {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl From<Ipv4Addr> for Address {
    fn from(value: Ipv4Addr) -> Self {
        Self(u32::from(value))
    }
}

impl From<Address> for Ipv4Addr {
    fn from(value: Address) -> Self {
        Ipv4Addr::from(value.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let addr = Address::parse("192.168.1.0").unwrap();
        assert_eq!(addr.to_integer(), 0xC0A80100);
    }

    #[test]
    fn test_parse_extremes() {
        assert_eq!(Address::parse("0.0.0.0").unwrap(), Address::UNSPECIFIED);
        assert_eq!(
            Address::parse("255.255.255.255").unwrap(),
            Address::BROADCAST
        );
    }

    #[test]
    fn test_parse_wrong_segment_count() {
        assert!(matches!(
            Address::parse("192.168.1"),
            Err(IpplanError::InvalidFormat(_))
        ));
        assert!(matches!(
            Address::parse("1.2.3.4.5"),
            Err(IpplanError::InvalidFormat(_))
        ));
        assert!(matches!(
            Address::parse(""),
            Err(IpplanError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_octet_out_of_range() {
        assert_eq!(
            Address::parse("256.0.0.1"),
            Err(IpplanError::OctetOutOfRange("256".to_string()))
        );
        assert!(matches!(
            Address::parse("1.2.3.99999999999999999999"),
            Err(IpplanError::OctetOutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_non_numeric() {
        assert_eq!(
            Address::parse("10.a.0.1"),
            Err(IpplanError::NonNumericOctet("a".to_string()))
        );
        assert!(matches!(
            Address::parse("10..0.1"),
            Err(IpplanError::NonNumericOctet(_))
        ));
        assert!(matches!(
            Address::parse("-1.0.0.1"),
            Err(IpplanError::NonNumericOctet(_))
        ));
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        assert!(matches!(
            Address::parse(" 10.0.0.1"),
            Err(IpplanError::NonNumericOctet(_))
        ));
        assert!(matches!(
            Address::parse("10.0.0.1\n"),
            Err(IpplanError::NonNumericOctet(_))
        ));
    }

    #[test]
    fn test_round_trip_text() {
        for text in ["0.0.0.0", "10.0.0.1", "172.16.254.3", "255.255.255.255"] {
            assert_eq!(Address::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_leading_zeros_canonicalize() {
        assert_eq!(Address::parse("010.001.000.001").unwrap().to_string(), "10.1.0.1");
    }

    #[test]
    fn test_round_trip_integer() {
        for value in [0u32, 1, 0x7F000001, 0xC0A80101, u32::MAX] {
            assert_eq!(Address::from_integer(value).to_integer(), value);
        }
    }

    #[test]
    fn test_octets() {
        let addr = Address::from_octets([172, 16, 5, 4]);
        assert_eq!(addr.octets(), [172, 16, 5, 4]);
        assert_eq!(addr.first_octet(), 172);
    }

    #[test]
    fn test_std_conversion() {
        let std_addr = Ipv4Addr::new(10, 1, 2, 3);
        let addr = Address::from(std_addr);
        assert_eq!(addr.to_string(), "10.1.2.3");
        assert_eq!(Ipv4Addr::from(addr), std_addr);
    }

    #[test]
    fn test_checked_arithmetic() {
        assert!(Address::BROADCAST.checked_add(1).is_none());
        assert!(Address::UNSPECIFIED.checked_sub(1).is_none());
        assert_eq!(
            Address::parse("10.0.0.255").unwrap().checked_add(1).unwrap().to_string(),
            "10.0.1.0"
        );
    }

    #[test]
    fn test_serde_as_text() {
        let addr = Address::parse("8.8.4.4").unwrap();
        let json = serde_json::to_string(&addr).expect("serialization failed");
        assert_eq!(json, "\"8.8.4.4\"");

        let back: Address = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<Address>("\"8.8.4.400\"").is_err());
    }
}
