use log::debug;

use crate::chars::{collect, index_of};
use crate::cleanup::{cleanup_merge, cleanup_semantic};
use crate::commonality::{self, half_match};
use crate::config::Config;
use crate::difference::Difference;
use crate::edit_type::EditType;
use crate::engine::DifferenceEngine;
use crate::line_map::LineMap;

/// Combined length below which line mode is not worth its overhead
const LINE_MODE_MIN_LENGTH: usize = 250;

/// Computes a cleaned-up edit script between two texts
#[derive(Debug, Clone, Copy)]
pub struct Diff<'a> {
    source: &'a str,
    target: &'a str,
    config: Config,
}

impl<'a> Diff<'a> {
    /// Create a diff between two texts using the default configuration
    pub fn new(source: &'a str, target: &'a str) -> Self {
        Self::with_config(source, target, Config::default())
    }

    /// Create a diff between two texts
    pub fn with_config(source: &'a str, target: &'a str, config: Config) -> Self {
        Self {
            source,
            target,
            config,
        }
    }

    /// Enable or disable the line-mode speedup for this diff
    pub fn check_lines(mut self, check_lines: bool) -> Self {
        self.config.check_lines = check_lines;
        self
    }

    /// Compute the edit script.
    ///
    /// Concatenating every non-insert span gives back the source, every
    /// non-delete span the target. Identical inputs (including two empty
    /// strings) produce a single equality.
    pub fn compare(&self) -> Vec<Difference> {
        if self.source == self.target {
            return vec![Difference::equal(self.source)];
        }
        let source: Vec<char> = self.source.chars().collect();
        let target: Vec<char> = self.target.chars().collect();
        self.main(&source, &target, self.config.check_lines)
    }

    fn main(&self, source: &[char], target: &[char], check_lines: bool) -> Vec<Difference> {
        if source == target {
            if source.is_empty() {
                return Vec::new();
            }
            return vec![Difference::equal(collect(source))];
        }

        let prefix_len = commonality::prefix(source, target);
        let (prefix, source_rest) = source.split_at(prefix_len);
        let target_rest = &target[prefix_len..];

        let suffix_len = commonality::suffix(source_rest, target_rest);
        let (source_middle, suffix) = source_rest.split_at(source_rest.len() - suffix_len);
        let target_middle = &target_rest[..target_rest.len() - suffix_len];

        let mut diffs = Vec::new();
        if !prefix.is_empty() {
            diffs.push(Difference::equal(collect(prefix)));
        }
        diffs.extend(self.compute(source_middle, target_middle, check_lines));
        if !suffix.is_empty() {
            diffs.push(Difference::equal(collect(suffix)));
        }
        cleanup_merge(&mut diffs);
        diffs
    }

    /// Diff two texts that share no prefix or suffix.
    fn compute(&self, source: &[char], target: &[char], check_lines: bool) -> Vec<Difference> {
        if source.is_empty() {
            return vec![Difference::insert(collect(target))];
        }
        if target.is_empty() {
            return vec![Difference::delete(collect(source))];
        }

        let (long, short, edit_type) = if source.len() > target.len() {
            (source, target, EditType::Delete)
        } else {
            (target, source, EditType::Insert)
        };
        if let Some(i) = index_of(long, short, 0) {
            // Shorter text is inside the longer one.
            let mut diffs = Vec::with_capacity(3);
            if i > 0 {
                diffs.push(Difference::new(edit_type, collect(&long[..i])));
            }
            diffs.push(Difference::equal(collect(short)));
            if i + short.len() < long.len() {
                diffs.push(Difference::new(edit_type, collect(&long[i + short.len()..])));
            }
            return diffs;
        }

        if let Some(hm) = half_match(source, target) {
            let source_prefix: Vec<char> = hm.source_prefix.chars().collect();
            let target_prefix: Vec<char> = hm.target_prefix.chars().collect();
            let source_suffix: Vec<char> = hm.source_suffix.chars().collect();
            let target_suffix: Vec<char> = hm.target_suffix.chars().collect();
            let mut diffs = self.main(&source_prefix, &target_prefix, check_lines);
            diffs.push(Difference::equal(hm.commonality));
            diffs.extend(self.main(&source_suffix, &target_suffix, check_lines));
            return diffs;
        }

        let line_mode = check_lines && source.len() + target.len() >= LINE_MODE_MIN_LENGTH;
        let engine = DifferenceEngine::new(self.config);
        let generated = if line_mode {
            let map = LineMap::new(source, target);
            debug!(
                "diffing {} + {} chars in line mode over {} distinct lines",
                source.len(),
                target.len(),
                map.line_count()
            );
            engine
                .generate(map.source_map(), map.target_map())
                .map(|mut diffs| {
                    map.restore(&mut diffs);
                    diffs
                })
        } else {
            engine.generate(source, target)
        };

        let mut diffs = generated.unwrap_or_else(|| {
            vec![
                Difference::delete(collect(source)),
                Difference::insert(collect(target)),
            ]
        });

        if line_mode {
            // Drop freak matches such as lone blank lines.
            cleanup_semantic(&mut diffs);
            diffs = self.rediff_replacements(diffs);
        }
        diffs
    }

    /// Re-diff every run of deletions and insertions between two equalities
    /// a char at a time.
    fn rediff_replacements(&self, diffs: Vec<Difference>) -> Vec<Difference> {
        let mut refined = Vec::with_capacity(diffs.len());
        let mut pending: Vec<Difference> = Vec::new();
        let mut text_delete = String::new();
        let mut text_insert = String::new();

        for diff in diffs.into_iter().chain(std::iter::once(Difference::equal(""))) {
            match diff.edit_type {
                EditType::Delete => {
                    text_delete.push_str(&diff.text);
                    pending.push(diff);
                }
                EditType::Insert => {
                    text_insert.push_str(&diff.text);
                    pending.push(diff);
                }
                EditType::Equal => {
                    let has_delete = pending.iter().any(|d| d.edit_type == EditType::Delete);
                    let has_insert = pending.iter().any(|d| d.edit_type == EditType::Insert);
                    if has_delete && has_insert {
                        let deleted: Vec<char> = text_delete.chars().collect();
                        let inserted: Vec<char> = text_insert.chars().collect();
                        refined.extend(self.main(&deleted, &inserted, false));
                        pending.clear();
                    } else {
                        refined.append(&mut pending);
                    }
                    text_delete.clear();
                    text_insert.clear();
                    if !diff.text.is_empty() {
                        refined.push(diff);
                    }
                }
            }
        }
        refined
    }

    /// Translate a char offset in the source into the matching offset in
    /// the target.
    ///
    /// A location inside a deletion maps to the target offset where that
    /// deletion starts.
    pub fn x_index(diffs: &[Difference], loc: usize) -> usize {
        let mut chars1 = 0;
        let mut chars2 = 0;
        let mut last_chars1 = 0;
        let mut last_chars2 = 0;
        let mut stopped_at = None;
        for diff in diffs {
            let len = diff.char_len();
            if diff.edit_type != EditType::Insert {
                chars1 += len;
            }
            if diff.edit_type != EditType::Delete {
                chars2 += len;
            }
            if chars1 > loc {
                stopped_at = Some(diff);
                break;
            }
            last_chars1 = chars1;
            last_chars2 = chars2;
        }
        match stopped_at {
            Some(diff) if diff.edit_type == EditType::Delete => last_chars2,
            _ => last_chars2 + (loc - last_chars1),
        }
    }

    /// Edit distance implied by an edit script: the number of inserted,
    /// deleted or substituted chars.
    pub fn levenshtein(diffs: &[Difference]) -> usize {
        let mut levenshtein = 0;
        let mut insertions = 0;
        let mut deletions = 0;
        for diff in diffs {
            match diff.edit_type {
                EditType::Insert => insertions += diff.char_len(),
                EditType::Delete => deletions += diff.char_len(),
                EditType::Equal => {
                    // A deletion and an insertion together are one substitution.
                    levenshtein += insertions.max(deletions);
                    insertions = 0;
                    deletions = 0;
                }
            }
        }
        levenshtein + insertions.max(deletions)
    }

    /// Set each span's `index` to its offset in the target text.
    pub fn assign_indices(diffs: &mut [Difference]) {
        let mut index = 0;
        for diff in diffs {
            diff.index = Some(index);
            if diff.edit_type != EditType::Delete {
                index += diff.char_len();
            }
        }
    }

    /// Render an edit script as HTML, one element per span.
    pub fn pretty_html(diffs: &[Difference]) -> String {
        let mut html = String::new();
        let mut index = 0;
        for diff in diffs {
            let text = diff
                .text
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;")
                .replace('\n', "&para;<BR>");
            let index_title = diff.index.unwrap_or(index);
            html.push_str(&match diff.edit_type {
                EditType::Insert => format!(
                    "<INS STYLE=\"background:#E6FFE6;\" TITLE=\"i={}\">{}</INS>",
                    index_title, text
                ),
                EditType::Delete => format!(
                    "<DEL STYLE=\"background:#FFE6E6;\" TITLE=\"i={}\">{}</DEL>",
                    index_title, text
                ),
                EditType::Equal => format!("<SPAN TITLE=\"i={}\">{}</SPAN>", index_title, text),
            });
            if diff.edit_type != EditType::Delete {
                index += diff.char_len();
            }
        }
        html
    }
}

/// Reconstruct the source text of an edit script.
pub fn source_text(diffs: &[Difference]) -> String {
    diffs
        .iter()
        .filter(|d| d.edit_type != EditType::Insert)
        .map(|d| d.text.as_str())
        .collect()
}

/// Reconstruct the target text of an edit script.
pub fn target_text(diffs: &[Difference]) -> String {
    diffs
        .iter()
        .filter(|d| d.edit_type != EditType::Delete)
        .map(|d| d.text.as_str())
        .collect()
}
