//! Overlapping CIDR block detection
//!
//! Pairwise comparison of inclusive address ranges. Inputs are expected to
//! be small (tens of blocks), so every pair is checked directly.

use crate::NetworkBlock;
use ipplan_core::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Two blocks sharing at least one address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    pub first: NetworkBlock,
    pub second: NetworkBlock,
    /// First address of the shared range
    pub start: Address,
    /// Last address of the shared range (inclusive)
    pub end: Address,
}

impl Overlap {
    /// Number of addresses in the shared range
    pub fn size(&self) -> u64 {
        u64::from(self.end.to_integer()) - u64::from(self.start.to_integer()) + 1
    }
}

/// Every overlapping pair found; empty means no conflicts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapReport {
    pub overlaps: Vec<Overlap>,
}

impl OverlapReport {
    pub fn is_empty(&self) -> bool {
        self.overlaps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overlaps.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Overlap> {
        self.overlaps.iter()
    }
}

impl IntoIterator for OverlapReport {
    type Item = Overlap;
    type IntoIter = std::vec::IntoIter<Overlap>;

    fn into_iter(self) -> Self::IntoIter {
        self.overlaps.into_iter()
    }
}

impl<'a> IntoIterator for &'a OverlapReport {
    type Item = &'a Overlap;
    type IntoIter = std::slice::Iter<'a, Overlap>;

    fn into_iter(self) -> Self::IntoIter {
        self.overlaps.iter()
    }
}

/// Compare two blocks, returning the shared range if any
pub fn overlap_of(a: &NetworkBlock, b: &NetworkBlock) -> Option<Overlap> {
    let (a_start, a_end) = a.range();
    let (b_start, b_end) = b.range();

    if a_start <= b_end && b_start <= a_end {
        Some(Overlap {
            first: *a,
            second: *b,
            start: a_start.max(b_start),
            end: a_end.min(b_end),
        })
    } else {
        None
    }
}

/// Report every overlapping unordered pair in `blocks`
///
/// Pairs are reported in input order. An entry is never compared with
/// itself, but two identical entries at different positions do overlap.
///
/// # Examples
///
/// ```
/// use ipplan_cidr::{find_overlaps, NetworkBlock};
///
/// let blocks = [
///     NetworkBlock::parse("10.0.0.0/24").unwrap(),
///     NetworkBlock::parse("10.0.0.128/25").unwrap(),
///     NetworkBlock::parse("10.0.1.0/24").unwrap(),
/// ];
/// let report = find_overlaps(&blocks);
/// assert_eq!(report.len(), 1);
/// assert_eq!(report.overlaps[0].start.to_string(), "10.0.0.128");
/// ```
pub fn find_overlaps<B: AsRef<NetworkBlock>>(blocks: &[B]) -> OverlapReport {
    let mut overlaps = Vec::new();

    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if let Some(found) = overlap_of(a.as_ref(), b.as_ref()) {
                debug!(first = %found.first, second = %found.second, "overlap detected");
                overlaps.push(found);
            }
        }
    }

    OverlapReport { overlaps }
}

/// Report overlaps between two collections, never within one
///
/// Useful for checking a proposed plan against an existing inventory.
pub fn find_overlaps_between<L, R>(left: &[L], right: &[R]) -> OverlapReport
where
    L: AsRef<NetworkBlock>,
    R: AsRef<NetworkBlock>,
{
    let overlaps = left
        .iter()
        .flat_map(|a| right.iter().filter_map(move |b| overlap_of(a.as_ref(), b.as_ref())))
        .collect();

    OverlapReport { overlaps }
}

/// True as soon as any pair overlaps
pub fn has_overlaps<B: AsRef<NetworkBlock>>(blocks: &[B]) -> bool {
    blocks.iter().enumerate().any(|(i, a)| {
        blocks[i + 1..]
            .iter()
            .any(|b| overlap_of(a.as_ref(), b.as_ref()).is_some())
    })
}
