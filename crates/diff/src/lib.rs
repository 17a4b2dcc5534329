// Core diff, match and patch library
// This crate computes edit scripts between texts, locates fuzzy matches and
// builds patches that can be re-applied to drifted copies of a text.

mod bitap;
mod chars;
pub mod cleanup;
pub mod commonality;
mod config;
pub mod delta;
mod diff;
mod difference;
mod distance;
mod edit_type;
pub mod encoding;
mod engine;
mod error;
mod line_map;
mod locator;
mod matcher;
mod patch;
mod patch_entry;

pub use bitap::{Bitap, MAX_PATTERN_LENGTH};
pub use commonality::CommonMiddle;
pub use config::Config;
pub use diff::{source_text, target_text, Diff};
pub use difference::Difference;
pub use distance::levenshtein_distance;
pub use edit_type::EditType;
pub use engine::DifferenceEngine;
pub use error::{Error, Result};
pub use line_map::LineMap;
pub use locator::Locator;
pub use matcher::Match;
pub use patch::{Patch, PatchResults};
pub use patch_entry::PatchEntry;
