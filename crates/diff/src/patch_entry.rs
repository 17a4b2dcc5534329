use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitap::MAX_PATTERN_LENGTH;
use crate::chars::{collect, index_of, last_index_of};
use crate::config::Config;
use crate::diff;
use crate::difference::Difference;
use crate::edit_type::EditType;
use crate::encoding::{decode, encode};
use crate::error::{Error, Result};

/// One localized edit of a patch, with enough surrounding context to be
/// found again in text that has drifted.
///
/// Offsets and lengths are 0-based and counted in chars; the textual form
/// written by [`Display`](fmt::Display) is 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatchEntry {
    /// Offset of the entry in the source text
    pub source_start: usize,

    /// Offset of the entry in the target text
    pub target_start: usize,

    /// Length of the source side in chars
    pub source_length: usize,

    /// Length of the target side in chars
    pub target_length: usize,

    /// The edits, including leading and trailing context
    pub differences: Vec<Difference>,
}

impl PatchEntry {
    /// Create an empty entry starting at the given offsets
    pub fn new(source_start: usize, target_start: usize) -> Self {
        Self {
            source_start,
            target_start,
            ..Self::default()
        }
    }

    /// Text the entry expects to find
    pub fn source_text(&self) -> String {
        diff::source_text(&self.differences)
    }

    /// Text the entry leaves behind
    pub fn target_text(&self) -> String {
        diff::target_text(&self.differences)
    }

    /// Check if the entry carries no edits at all
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Surround the entry with equal context taken from `text` until its
    /// source side occurs only once there, or until it would no longer fit
    /// into a fuzzy search pattern.
    pub fn add_context(&mut self, text: &[char], config: &Config) {
        if text.is_empty() {
            return;
        }
        let margin = config.margin;
        let start = self.target_start.min(text.len());
        let end = (start + self.source_length).min(text.len());
        let window = |padding: usize| start.saturating_sub(padding)..(end + padding).min(text.len());

        let mut padding = 0;
        let mut pattern = &text[window(padding)];
        while margin > 0
            && index_of(text, pattern, 0) != last_index_of(text, pattern, text.len())
            && pattern.len() < MAX_PATTERN_LENGTH.saturating_sub(2 * margin)
        {
            padding += margin;
            pattern = &text[window(padding)];
        }
        // Pad once more past the point of uniqueness.
        padding += margin;

        let prefix = &text[start.saturating_sub(padding)..start];
        if !prefix.is_empty() {
            self.differences.insert(0, Difference::equal(collect(prefix)));
        }
        let suffix = &text[end..(end + padding).min(text.len())];
        if !suffix.is_empty() {
            self.differences.push(Difference::equal(collect(suffix)));
        }

        self.source_start = self.source_start.saturating_sub(prefix.len());
        self.target_start = self.target_start.saturating_sub(prefix.len());
        self.source_length += prefix.len() + suffix.len();
        self.target_length += prefix.len() + suffix.len();
    }
}

/// Header coordinates: `start,0` when empty, bare 1-based start for a
/// single char, `start,length` otherwise.
fn write_coords(f: &mut fmt::Formatter<'_>, start: usize, length: usize) -> fmt::Result {
    match length {
        0 => write!(f, "{},0", start),
        1 => write!(f, "{}", start + 1),
        _ => write!(f, "{},{}", start + 1, length),
    }
}

fn parse_coords(coords: &str) -> Option<(usize, usize)> {
    let (start, length) = match coords.split_once(',') {
        Some((start, length)) => (start.parse::<usize>().ok()?, length.parse::<usize>().ok()?),
        None => (coords.parse::<usize>().ok()?, 1),
    };
    if length == 0 {
        Some((start, 0))
    } else {
        Some((start.checked_sub(1)?, length))
    }
}

/// Parse `@@ -S[,L] +S[,L] @@` into 0-based starts and lengths
fn parse_header(line: &str) -> Result<(usize, usize, usize, usize)> {
    let invalid = || Error::InvalidHeader {
        line: line.to_string(),
    };
    let inner = line
        .strip_prefix("@@ ")
        .and_then(|rest| rest.strip_suffix(" @@"))
        .ok_or_else(invalid)?;
    let mut parts = inner.split(' ');
    let (source, target) = match (parts.next(), parts.next(), parts.next()) {
        (Some(source), Some(target), None) => (source, target),
        _ => return Err(invalid()),
    };
    let (source_start, source_length) = source
        .strip_prefix('-')
        .and_then(parse_coords)
        .ok_or_else(invalid)?;
    let (target_start, target_length) = target
        .strip_prefix('+')
        .and_then(parse_coords)
        .ok_or_else(invalid)?;
    Ok((source_start, source_length, target_start, target_length))
}

impl fmt::Display for PatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@@ -")?;
        write_coords(f, self.source_start, self.source_length)?;
        write!(f, " +")?;
        write_coords(f, self.target_start, self.target_length)?;
        writeln!(f, " @@")?;
        for diff in &self.differences {
            writeln!(f, "{}{}", diff.edit_type, encode(&diff.text))?;
        }
        Ok(())
    }
}

impl FromStr for PatchEntry {
    type Err = Error;

    /// Parse a single block: the header line followed by its body lines.
    fn from_str(block: &str) -> Result<Self> {
        let mut lines = block.split('\n');
        let header = lines.next().unwrap_or_default();
        let (source_start, source_length, target_start, target_length) = parse_header(header)?;

        let mut differences = Vec::new();
        for line in lines {
            let mut chars = line.chars();
            let Some(symbol) = chars.next() else {
                // Blank lines are tolerated.
                continue;
            };
            let edit_type = EditType::from_symbol(symbol).ok_or_else(|| Error::InvalidLine {
                line: line.to_string(),
            })?;
            differences.push(Difference::new(edit_type, decode(chars.as_str())?));
        }

        Ok(Self {
            source_start,
            target_start,
            source_length,
            target_length,
            differences,
        })
    }
}
