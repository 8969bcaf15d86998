//! Subnet mask <-> CIDR prefix conversion

use crate::{Address, IpplanError, PrefixLength, Result};

/// Raw mask bits for a prefix already known to be 0-32
pub(crate) fn mask_bits(prefix: u8) -> u32 {
    // Shifting a u32 by 32 overflows, so /0 is handled by checked_shl.
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

/// Convert a prefix length to its dotted-quad subnet mask
///
/// # Examples
///
/// ```
/// use ipplan_core::prefix_to_mask;
///
/// assert_eq!(prefix_to_mask(20).unwrap().to_string(), "255.255.240.0");
/// assert_eq!(prefix_to_mask(0).unwrap().to_string(), "0.0.0.0");
/// assert!(prefix_to_mask(33).is_err());
/// ```
pub fn prefix_to_mask(prefix: u32) -> Result<Address> {
    Ok(PrefixLength::new(prefix)?.mask())
}

/// Convert a subnet mask to its prefix length
///
/// Fails with [`IpplanError::NonContiguousMask`] unless the mask is a run
/// of ones followed only by zeros.
pub fn mask_to_prefix(mask: Address) -> Result<PrefixLength> {
    let bits = mask.to_integer();
    let ones = bits.leading_ones();
    if mask_bits(ones as u8) != bits {
        return Err(IpplanError::NonContiguousMask(mask));
    }
    PrefixLength::new(ones)
}

/// Parse either a prefix (`24`, `/24`) or a dotted mask (`255.255.255.0`)
pub fn parse_mask(text: &str) -> Result<PrefixLength> {
    let text = text.strip_prefix('/').unwrap_or(text);
    if text.contains('.') {
        return mask_to_prefix(Address::parse(text)?);
    }

    let prefix: u32 = text
        .parse()
        .map_err(|_| IpplanError::InvalidNotation(text.to_string()))?;
    PrefixLength::new(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_to_mask_common() {
        assert_eq!(prefix_to_mask(8).unwrap().to_string(), "255.0.0.0");
        assert_eq!(prefix_to_mask(16).unwrap().to_string(), "255.255.0.0");
        assert_eq!(prefix_to_mask(24).unwrap().to_string(), "255.255.255.0");
        assert_eq!(prefix_to_mask(26).unwrap().to_string(), "255.255.255.192");
    }

    #[test]
    fn test_prefix_to_mask_boundaries() {
        assert_eq!(prefix_to_mask(0).unwrap(), Address::UNSPECIFIED);
        assert_eq!(prefix_to_mask(32).unwrap(), Address::BROADCAST);
        assert_eq!(
            prefix_to_mask(33).unwrap_err(),
            IpplanError::PrefixOutOfRange(33)
        );
    }

    #[test]
    fn test_mask_to_prefix() {
        let mask = Address::parse("255.255.252.0").unwrap();
        assert_eq!(mask_to_prefix(mask).unwrap().get(), 22);
        assert_eq!(mask_to_prefix(Address::UNSPECIFIED).unwrap().get(), 0);
        assert_eq!(mask_to_prefix(Address::BROADCAST).unwrap().get(), 32);
    }

    #[test]
    fn test_mask_to_prefix_non_contiguous() {
        for text in ["255.0.255.0", "0.255.255.255", "255.255.255.1", "128.0.0.1"] {
            let mask = Address::parse(text).unwrap();
            assert_eq!(
                mask_to_prefix(mask),
                Err(IpplanError::NonContiguousMask(mask)),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_mask_prefix_inverse() {
        for p in 0..=32u32 {
            let mask = prefix_to_mask(p).unwrap();
            assert_eq!(u32::from(mask_to_prefix(mask).unwrap().get()), p);
        }
    }

    #[test]
    fn test_parse_mask_forms() {
        assert_eq!(parse_mask("24").unwrap().get(), 24);
        assert_eq!(parse_mask("/19").unwrap().get(), 19);
        assert_eq!(parse_mask("255.255.255.128").unwrap().get(), 25);
        assert!(matches!(
            parse_mask("abc"),
            Err(IpplanError::InvalidNotation(_))
        ));
        assert!(matches!(
            parse_mask("/40"),
            Err(IpplanError::PrefixOutOfRange(40))
        ));
        assert!(matches!(
            parse_mask("255.0.255.0"),
            Err(IpplanError::NonContiguousMask(_))
        ));
    }
}
