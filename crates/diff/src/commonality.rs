//! Shared prefix, suffix and half-match detection between two texts.
//!
//! All functions work on char slices so that offsets agree with the rest of
//! the crate.

use crate::chars::{collect, index_of};

/// A long substring shared by two texts, plus what surrounds it on each side.
///
/// `source_prefix + commonality + source_suffix` is the source text and
/// `target_prefix + commonality + target_suffix` is the target text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonMiddle {
    pub source_prefix: String,
    pub source_suffix: String,
    pub target_prefix: String,
    pub target_suffix: String,
    pub commonality: String,
}

impl CommonMiddle {
    fn swap(self) -> Self {
        Self {
            source_prefix: self.target_prefix,
            source_suffix: self.target_suffix,
            target_prefix: self.source_prefix,
            target_suffix: self.source_suffix,
            commonality: self.commonality,
        }
    }
}

/// Length of the common prefix of two texts.
///
/// Binary search over the candidate length; each step compares a slice.
pub fn prefix(a: &[char], b: &[char]) -> usize {
    let max = a.len().min(b.len());
    if max == 0 || a[0] != b[0] {
        return 0;
    }
    let mut min = 0;
    let mut max = max;
    let mut mid = max;
    let mut start = 0;
    while min < mid {
        if a[start..mid] == b[start..mid] {
            min = mid;
            start = min;
        } else {
            max = mid;
        }
        mid = (max - min) / 2 + min;
    }
    mid
}

/// Length of the common suffix of two texts.
pub fn suffix(a: &[char], b: &[char]) -> usize {
    let max = a.len().min(b.len());
    if max == 0 || a[a.len() - 1] != b[b.len() - 1] {
        return 0;
    }
    let mut min = 0;
    let mut max = max;
    let mut mid = max;
    let mut end = 0;
    while min < mid {
        if a[a.len() - mid..a.len() - end] == b[b.len() - mid..b.len() - end] {
            min = mid;
            end = min;
        } else {
            max = mid;
        }
        mid = (max - min) / 2 + min;
    }
    mid
}

/// Find a substring shared by both texts that is at least half the length
/// of the longer one.
///
/// Only texts of at least 10 chars are considered. The returned
/// [`CommonMiddle`] is oriented to the argument order.
pub fn half_match(source: &[char], target: &[char]) -> Option<CommonMiddle> {
    let source_is_longer = source.len() > target.len();
    let (long, short) = if source_is_longer {
        (source, target)
    } else {
        (target, source)
    };
    if long.len() < 10 || short.is_empty() {
        return None;
    }

    // Seed from the second and third quarters of the longer text.
    let first = half_match_at(long, short, (long.len() + 3) / 4);
    let second = half_match_at(long, short, (long.len() + 1) / 2);
    let best = match (first, second) {
        (None, None) => return None,
        (Some(hm), None) | (None, Some(hm)) => hm,
        (Some(a), Some(b)) => {
            if a.commonality.chars().count() > b.commonality.chars().count() {
                a
            } else {
                b
            }
        }
    };

    Some(if source_is_longer { best } else { best.swap() })
}

/// Slide the quarter-length seed starting at `i` of `long` through `short`
/// and keep the longest extension. Source fields refer to `long`.
fn half_match_at(long: &[char], short: &[char], i: usize) -> Option<CommonMiddle> {
    let seed = &long[i..i + long.len() / 4];
    let mut best: Option<(usize, usize, usize)> = None;
    let mut best_len = 0;

    let mut from = 0;
    while let Some(j) = index_of(short, seed, from) {
        let prefix_len = prefix(&long[i..], &short[j..]);
        let suffix_len = suffix(&long[..i], &short[..j]);
        if best_len < prefix_len + suffix_len {
            best_len = prefix_len + suffix_len;
            best = Some((j, prefix_len, suffix_len));
        }
        from = j + 1;
    }

    let (j, prefix_len, suffix_len) = best?;
    if best_len < long.len() / 2 {
        return None;
    }
    Some(CommonMiddle {
        source_prefix: collect(&long[..i - suffix_len]),
        source_suffix: collect(&long[i + prefix_len..]),
        target_prefix: collect(&short[..j - suffix_len]),
        target_suffix: collect(&short[j + prefix_len..]),
        commonality: collect(&short[j - suffix_len..j + prefix_len]),
    })
}
