use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use ropey::Rope;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitap::MAX_PATTERN_LENGTH;
use crate::cleanup::{cleanup_efficiency, cleanup_semantic};
use crate::config::Config;
use crate::diff::{self, Diff};
use crate::difference::Difference;
use crate::edit_type::EditType;
use crate::error::{Error, Result};
use crate::matcher::Match;
use crate::patch_entry::PatchEntry;

/// A list of patch entries that turns one text into another and can be
/// re-applied to copies of the source that have drifted since.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Patch {
    entries: Vec<PatchEntry>,
    config: Config,
}

/// Outcome of [`Patch::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResults {
    /// The patched text
    pub text: String,

    /// Whether each entry, in order, could be applied
    pub results: Vec<bool>,
}

impl PatchResults {
    /// Check if every entry was applied
    pub fn all_applied(&self) -> bool {
        self.results.iter().all(|&applied| applied)
    }

    /// Indices of the entries that could not be located
    pub fn failed_entries(&self) -> Vec<usize> {
        self.results
            .iter()
            .enumerate()
            .filter(|(_, &applied)| !applied)
            .map(|(i, _)| i)
            .collect()
    }
}

impl Patch {
    /// Build a patch turning `source` into `target` with the default
    /// configuration
    pub fn new(source: &str, target: &str) -> Self {
        Self::make(source, target, Config::default())
    }

    /// Build a patch turning `source` into `target`
    pub fn make(source: &str, target: &str, config: Config) -> Self {
        let diffs = Diff::with_config(source, target, config).compare();
        Self::make_with_diffs(source, &diffs, config)
    }

    /// Build a patch from an edit script alone; the source is rebuilt from
    /// its non-insert spans.
    pub fn from_diffs(diffs: &[Difference], config: Config) -> Self {
        let source = diff::source_text(diffs);
        Self::make_with_diffs(&source, diffs, config)
    }

    /// Build a patch from a source text and an edit script computed against it.
    pub fn make_with_diffs(source: &str, diffs: &[Difference], config: Config) -> Self {
        let mut diffs = diffs.to_vec();
        if diffs.len() > 2 {
            cleanup_semantic(&mut diffs);
            cleanup_efficiency(&mut diffs, config.edit_cost);
        }

        let mut entries = Vec::new();
        let margin = config.margin;
        let mut entry = PatchEntry::default();
        // Source offset in the text as it was before the open entry.
        let mut char_count1 = 0;
        // Offset in the text with every edit so far applied.
        let mut char_count2 = 0;
        // Context is taken from the text with every closed entry applied, so
        // that entries line up when applied one after the other.
        let mut prepatch: Vec<char> = source.chars().collect();
        let mut postpatch = Rope::from_str(source);

        let last = diffs.len().saturating_sub(1);
        for (i, diff) in diffs.into_iter().enumerate() {
            let len = diff.char_len();
            if entry.is_empty() && diff.edit_type != EditType::Equal {
                entry.source_start = char_count1;
                entry.target_start = char_count2;
            }

            match diff.edit_type {
                EditType::Insert => {
                    entry.target_length += len;
                    postpatch.insert(char_count2, &diff.text);
                    char_count2 += len;
                    entry.differences.push(diff);
                }
                EditType::Delete => {
                    entry.source_length += len;
                    postpatch.remove(char_count2..char_count2 + len);
                    char_count1 += len;
                    entry.differences.push(diff);
                }
                EditType::Equal => {
                    if len <= 2 * margin && !entry.is_empty() && i != last {
                        // Small equality inside an entry.
                        entry.source_length += len;
                        entry.target_length += len;
                        entry.differences.push(diff);
                    }
                    if len >= 2 * margin && !entry.is_empty() {
                        entry.add_context(&prepatch, &config);
                        entries.push(std::mem::take(&mut entry));
                        prepatch = postpatch.chars().collect();
                        char_count1 = char_count2;
                    }
                    char_count1 += len;
                    char_count2 += len;
                }
            }
        }

        if !entry.is_empty() {
            entry.add_context(&prepatch, &config);
            entries.push(entry);
        }

        Self { entries, config }
    }

    /// Parse the textual form written by [`Patch::to_text`].
    ///
    /// The patch uses the default configuration; use
    /// [`with_config`](Patch::with_config) to apply it with other tunables.
    pub fn from_text(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(Self::default());
        }
        let entries = text
            .split("\n@@")
            .enumerate()
            .map(|(i, block)| {
                if i == 0 {
                    block.parse()
                } else {
                    format!("@@{}", block).parse()
                }
            })
            .collect::<Result<Vec<PatchEntry>>>()?;
        Ok(Self {
            entries,
            config: Config::default(),
        })
    }

    /// Render the patch in its textual form
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Replace the configuration used when applying or splitting
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// The entries of the patch, in application order
    pub fn entries(&self) -> &[PatchEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the patch has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context size the patch was built with
    pub fn margin(&self) -> usize {
        self.config.margin
    }

    /// Apply the patch to `text`.
    ///
    /// Each entry is searched for near where the previous entries predict
    /// it; entries whose source text cannot be found are skipped and
    /// reported in [`PatchResults::results`]. Entries too long for the
    /// fuzzy locator are applied as the pieces [`split_max`](Patch::split_max)
    /// would cut them into, and count as applied only when every piece
    /// was. The patch itself is not modified.
    pub fn apply(&self, text: &str) -> PatchResults {
        let matcher = Match::new(self.config);
        let margin = self.split_margin();
        let mut rope = Rope::from_str(text);
        let mut results = vec![true; self.entries.len()];
        // Drift between where entries were made and where they are found.
        let mut delta: isize = 0;

        for (i, entry) in self.entries.iter().enumerate() {
            for piece in split_entry(entry.clone(), margin) {
                if !self.apply_entry(&matcher, &mut rope, &piece, &mut delta) {
                    debug!("patch entry {} did not apply", i);
                    results[i] = false;
                }
            }
        }

        PatchResults {
            text: rope.to_string(),
            results,
        }
    }

    fn apply_entry(
        &self,
        matcher: &Match,
        rope: &mut Rope,
        entry: &PatchEntry,
        delta: &mut isize,
    ) -> bool {
        let expected = entry.target_start.saturating_add_signed(*delta);
        let source_text = entry.source_text();
        let source: Vec<char> = source_text.chars().collect();
        let current: Vec<char> = rope.chars().collect();

        let Some(start) = matcher.locate_chars(&current, &source, expected) else {
            debug!(
                "no match near offset {} for {} chars of patch source",
                expected,
                source.len()
            );
            return false;
        };
        trace!("patch source expected at {}, found at {}", expected, start);
        *delta = start as isize - entry.target_start as isize;

        let end = (start + source.len()).min(current.len());
        let found = &current[start..end];
        if found == source.as_slice() {
            rope.remove(start..end);
            rope.insert(start, &entry.target_text());
            return true;
        }

        // Imperfect match: map every edit through a diff between the
        // expected and the found text.
        let found_text: String = found.iter().collect();
        let diffs = Diff::with_config(&source_text, &found_text, self.config)
            .check_lines(false)
            .compare();
        let mut index1 = 0;
        for diff in &entry.differences {
            let len = diff.char_len();
            match diff.edit_type {
                EditType::Insert => {
                    let at = (start + Diff::x_index(&diffs, index1)).min(rope.len_chars());
                    rope.insert(at, &diff.text);
                }
                EditType::Delete => {
                    let from = (start + Diff::x_index(&diffs, index1)).min(rope.len_chars());
                    let to = (start + Diff::x_index(&diffs, index1 + len))
                        .clamp(from, rope.len_chars());
                    rope.remove(from..to);
                }
                EditType::Equal => {}
            }
            if diff.edit_type != EditType::Delete {
                index1 += len;
            }
        }
        true
    }

    /// Break up every entry whose source side is longer than the fuzzy
    /// locator can search for.
    ///
    /// The pieces carry fresh context and, applied in order, have the same
    /// effect as the original entry. [`apply`](Patch::apply) splits on the
    /// fly, so this only matters for the stored form: an unsplit patch
    /// written by [`to_text`](Patch::to_text) keeps its long entries.
    pub fn split_max(&mut self) {
        let margin = self.split_margin();
        self.entries = std::mem::take(&mut self.entries)
            .into_iter()
            .flat_map(|entry| split_entry(entry, margin))
            .collect();
    }

    // Leave room for at least one char of content per piece.
    fn split_margin(&self) -> usize {
        self.config.margin.min(MAX_PATTERN_LENGTH / 2 - 1)
    }
}

/// Cut an entry into pieces whose source side fits the fuzzy locator.
fn split_entry(big: PatchEntry, margin: usize) -> Vec<PatchEntry> {
    let patch_size = MAX_PATTERN_LENGTH;
    if big.source_length <= patch_size {
        return vec![big];
    }
    debug!(
        "splitting patch entry at {} with {} source chars",
        big.source_start, big.source_length
    );

    let mut split = Vec::new();
    let mut start1 = big.source_start;
    let mut start2 = big.target_start;
    let mut precontext = String::new();
    let mut diffs: VecDeque<Difference> = big.differences.into();
    while !diffs.is_empty() {
        let precontext_len = precontext.chars().count();
        let mut piece = PatchEntry::new(
            start1.saturating_sub(precontext_len),
            start2.saturating_sub(precontext_len),
        );
        let mut empty = true;
        if !precontext.is_empty() {
            piece.source_length = precontext_len;
            piece.target_length = precontext_len;
            piece.differences.push(Difference::equal(precontext.as_str()));
        }

        while piece.source_length < patch_size - margin {
            let Some(diff) = diffs.pop_front() else {
                break;
            };
            let len = diff.char_len();
            if diff.edit_type == EditType::Insert {
                piece.target_length += len;
                start2 += len;
                piece.differences.push(diff);
                empty = false;
                continue;
            }

            // Deletion or equality: take only what still fits.
            let take = len.min(patch_size - piece.source_length - margin);
            let head: String = diff.text.chars().take(take).collect();
            piece.source_length += take;
            start1 += take;
            if diff.edit_type == EditType::Equal {
                piece.target_length += take;
                start2 += take;
            } else {
                empty = false;
            }
            if take < len {
                let tail: String = diff.text.chars().skip(take).collect();
                diffs.push_front(Difference::new(diff.edit_type, tail));
            }
            piece.differences.push(Difference::new(diff.edit_type, head));
        }

        // Head context of the next piece.
        let target: Vec<char> = piece.target_text().chars().collect();
        precontext = target[target.len().saturating_sub(margin)..].iter().collect();

        // Tail context of this piece.
        let postcontext: String = diffs
            .iter()
            .filter(|d| d.edit_type != EditType::Insert)
            .flat_map(|d| d.text.chars())
            .take(margin)
            .collect();
        if !postcontext.is_empty() {
            let postcontext_len = postcontext.chars().count();
            piece.source_length += postcontext_len;
            piece.target_length += postcontext_len;
            match piece.differences.last_mut() {
                Some(last) if last.is_equal() => last.append_text(&postcontext),
                _ => piece.differences.push(Difference::equal(postcontext)),
            }
        }

        if !empty {
            split.push(piece);
        }
    }
    split
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl FromStr for Patch {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_text(text)
    }
}
