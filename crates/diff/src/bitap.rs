//! Bit-parallel approximate matching.
//!
//! Each pattern char gets a bitmask of the positions it occupies. For every
//! error level `d` a bit vector per text position records which pattern
//! prefixes can end there with at most `d` errors; a set top bit is a
//! candidate match that is then scored by its error count and its distance
//! from the expected location.

use std::collections::HashMap;

use crate::chars::{index_of, last_index_of};
use crate::config::Config;
use crate::locator::Locator;

/// Bit width of the match vectors, and so the longest searchable pattern.
pub const MAX_PATTERN_LENGTH: usize = u32::BITS as usize;

/// Bitap fuzzy locator
#[derive(Debug, Clone, Copy)]
pub struct Bitap {
    config: Config,
}

impl Bitap {
    /// Create a new locator
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Bitmask of pattern positions for every char of the pattern
    fn alphabet(pattern: &[char]) -> HashMap<char, u32> {
        let mut alphabet = HashMap::new();
        for (i, &c) in pattern.iter().enumerate() {
            *alphabet.entry(c).or_insert(0) |= 1 << (pattern.len() - i - 1);
        }
        alphabet
    }
}

/// Scoring for one search: lower is better.
struct Scorer {
    balance: f64,
    pattern_len: f64,
    text_len: f64,
    loc: usize,
}

impl Scorer {
    fn score(&self, errors: usize, x: usize) -> f64 {
        let distance = x.abs_diff(self.loc) as f64;
        errors as f64 / self.pattern_len / self.balance
            + distance / self.text_len / (1.0 - self.balance)
    }
}

impl Locator for Bitap {
    fn locate(&self, text: &[char], pattern: &[char], loc: usize) -> Option<usize> {
        if pattern.is_empty() {
            return Some(loc.min(text.len()));
        }
        // Longer patterns are searched by their leading chars only.
        let pattern = &pattern[..pattern.len().min(MAX_PATTERN_LENGTH)];
        let alphabet = Self::alphabet(pattern);
        let scorer = Scorer {
            balance: self.config.balance,
            pattern_len: pattern.len() as f64,
            text_len: self.config.clamp_length(text.len()) as f64,
            loc,
        };

        let mut score_threshold = self.config.threshold;

        // Nearby exact matches bound the threshold from the start.
        if let Some(exact) = index_of(text, pattern, loc) {
            score_threshold = score_threshold.min(scorer.score(0, exact));
        }
        if let Some(exact) = last_index_of(text, pattern, loc + pattern.len()) {
            score_threshold = score_threshold.min(scorer.score(0, exact));
        }

        let match_mask: u32 = 1 << (pattern.len() - 1);
        let mut best_loc = None;

        let mut bin_max = pattern.len() + text.len();
        let mut last_rd: Vec<u32> = Vec::new();
        for d in 0..pattern.len() {
            // Binary search how far from `loc` a match with `d` errors can
            // still beat the threshold.
            let mut bin_min = 0;
            let mut bin_mid = bin_max;
            while bin_min < bin_mid {
                if scorer.score(d, loc + bin_mid) <= score_threshold {
                    bin_min = bin_mid;
                } else {
                    bin_max = bin_mid;
                }
                bin_mid = (bin_max - bin_min) / 2 + bin_min;
            }
            // The next error level never searches further out.
            bin_max = bin_mid;

            let mut start = (loc + 1).saturating_sub(bin_mid).max(1);
            let finish = (loc + bin_mid).min(text.len()) + pattern.len();

            // rd[j] describes the text char at j - 1.
            let mut rd = vec![0u32; finish + 2];
            rd[finish + 1] = (1u32 << d) - 1;
            let last = |i: usize| last_rd.get(i).copied().unwrap_or(0);

            let mut j = finish;
            while j >= start {
                let char_match = text
                    .get(j - 1)
                    .and_then(|c| alphabet.get(c))
                    .copied()
                    .unwrap_or(0);
                rd[j] = if d == 0 {
                    // Exact match.
                    ((rd[j + 1] << 1) | 1) & char_match
                } else {
                    // One more error: substitution, insertion or deletion.
                    (((rd[j + 1] << 1) | 1) & char_match)
                        | (((last(j + 1) | last(j)) << 1) | 1)
                        | last(j + 1)
                };
                if rd[j] & match_mask != 0 {
                    let score = scorer.score(d, j - 1);
                    if score <= score_threshold {
                        score_threshold = score;
                        best_loc = Some(j - 1);
                        if j - 1 > loc {
                            // Don't search further left than we are right.
                            start = (2 * loc).saturating_sub(j - 1).max(1);
                        } else {
                            // Already past `loc`; it only gets worse.
                            break;
                        }
                    }
                }
                j -= 1;
            }

            // No hope for a better match at the next error level.
            if scorer.score(d + 1, loc) > score_threshold {
                break;
            }
            last_rd = rd;
        }
        best_loc
    }

    fn max_pattern_length(&self) -> usize {
        MAX_PATTERN_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn locate(config: Config, text: &str, pattern: &str, loc: usize) -> Option<usize> {
        Bitap::new(config).locate(&chars(text), &chars(pattern), loc)
    }

    #[test]
    fn alphabet_masks() {
        let alphabet = Bitap::alphabet(&chars("abc"));
        assert_eq!(alphabet[&'a'], 4);
        assert_eq!(alphabet[&'b'], 2);
        assert_eq!(alphabet[&'c'], 1);

        let alphabet = Bitap::alphabet(&chars("abcaba"));
        assert_eq!(alphabet[&'a'], 37);
        assert_eq!(alphabet[&'b'], 18);
        assert_eq!(alphabet[&'c'], 8);
    }

    #[test]
    fn exact_matches() {
        let config = Config::default();
        assert_eq!(locate(config, "abcdefghijk", "fgh", 5), Some(5));
        assert_eq!(locate(config, "abcdefghijk", "fgh", 0), Some(5));
    }

    #[test]
    fn fuzzy_matches() {
        let config = Config::default();
        assert_eq!(locate(config, "abcdefghijk", "efxhi", 0), Some(4));
        assert_eq!(locate(config, "abcdefghijk", "cdefxyhijk", 5), Some(2));
        assert_eq!(locate(config, "abcdefghijk", "bxy", 1), None);
    }

    #[test]
    fn overflowing_match() {
        let config = Config::default();
        assert_eq!(locate(config, "123456789xx0", "3456789x0", 2), Some(2));
    }

    #[test]
    fn threshold_controls_acceptance() {
        let strict = Config::default().threshold(0.2);
        assert_eq!(locate(strict, "abcdefghijk", "efxyhi", 1), None);
        let lenient = Config::default().threshold(0.8);
        assert_eq!(locate(lenient, "abcdefghijk", "efxyhi", 1), Some(4));
    }

    #[test]
    fn prefers_occurrence_nearest_to_loc() {
        let config = Config::default();
        assert_eq!(locate(config, "abcXabcYabcZabc", "abc", 9), Some(8));
        assert_eq!(locate(config, "abcXabcYabcZabc", "abc", 1), Some(0));
    }

    #[test]
    fn long_pattern_searches_its_head() {
        let text: String = format!("{}{}", "-".repeat(50), "a".repeat(10) + &"b".repeat(30));
        let pattern: String = "a".repeat(10) + &"b".repeat(30);
        assert_eq!(locate(Config::default(), &text, &pattern, 45), Some(50));
    }
}
