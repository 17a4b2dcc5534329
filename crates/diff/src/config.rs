use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitap::MAX_PATTERN_LENGTH;
use crate::error::{Error, Result};

/// Tunables shared by the diff, match and patch stages.
///
/// A `Config` is a plain value: build one with the chained setters and pass
/// it to [`Diff`](crate::Diff), [`Match`](crate::Match) or
/// [`Patch`](crate::Patch). Nothing reads configuration from global state.
///
/// ```
/// use std::time::Duration;
/// use diffpatch::Config;
///
/// let config = Config::default()
///     .timeout(Duration::from_millis(250))
///     .margin(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Wall-clock budget for the shortest edit script search. Zero means
    /// unbounded.
    pub timeout: Duration,

    /// Cost of an empty edit in characters, used by efficiency cleanup.
    pub edit_cost: usize,

    /// Weight between error count (towards 1.0) and distance from the
    /// expected location (towards 0.0) when scoring fuzzy matches.
    pub balance: f64,

    /// Score above which a fuzzy match is rejected (0.0 = exact only).
    pub threshold: f64,

    /// Lower clamp of the text length used to normalise match distances.
    pub min_length: usize,

    /// Upper clamp of the text length used to normalise match distances.
    pub max_length: usize,

    /// Context characters kept around each patch entry.
    pub margin: usize,

    /// Whether large inputs may be diffed line-by-line first.
    pub check_lines: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
            edit_cost: 4,
            balance: 0.5,
            threshold: 0.5,
            min_length: 100,
            max_length: 1000,
            margin: 4,
            check_lines: true,
        }
    }
}

impl Config {
    /// Set the engine timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the efficiency cleanup edit cost
    pub fn edit_cost(mut self, edit_cost: usize) -> Self {
        self.edit_cost = edit_cost;
        self
    }

    /// Set the match balance
    pub fn balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    /// Set the match threshold
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the clamp applied to text lengths when scoring matches
    pub fn length_clamp(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Set the patch context margin
    pub fn margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable the line-mode speedup
    pub fn check_lines(mut self, check_lines: bool) -> Self {
        self.check_lines = check_lines;
        self
    }

    /// Check that every tunable is inside the range the algorithms accept.
    pub fn validate(&self) -> Result<()> {
        if !(self.balance > 0.0 && self.balance < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "balance must lie strictly between 0 and 1, got {}",
                self.balance
            )));
        }
        if !(self.threshold >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "threshold must not be negative, got {}",
                self.threshold
            )));
        }
        if self.min_length == 0 || self.min_length > self.max_length {
            return Err(Error::InvalidConfig(format!(
                "length clamp {}..{} is empty",
                self.min_length, self.max_length
            )));
        }
        if 2 * self.margin >= MAX_PATTERN_LENGTH {
            return Err(Error::InvalidConfig(format!(
                "margin {} leaves no room inside a {}-char pattern",
                self.margin, MAX_PATTERN_LENGTH
            )));
        }
        Ok(())
    }

    /// Text length used to normalise match distances.
    pub(crate) fn clamp_length(&self, len: usize) -> usize {
        len.min(self.max_length).max(self.min_length)
    }
}
