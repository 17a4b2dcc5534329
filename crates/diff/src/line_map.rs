//! Line-mode speedup: every distinct line becomes one synthetic char.

use std::collections::HashMap;

use crate::difference::Difference;

/// Highest line index that still maps to a valid `char` once the surrogate
/// range is skipped.
const LAST_LINE: usize = 0x10FFFF - 0x800;

/// Lines of the source beyond this count are folded into one final line so
/// the target still has codes left.
const SOURCE_LINE_LIMIT: usize = LAST_LINE / 3 * 2;

/// Maps the lines of two texts to synthetic chars so the engine can diff
/// them a line at a time.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Unique lines; index 0 is an unused sentinel so no line maps to `'\0'`
    lines: Vec<String>,
    source_map: Vec<char>,
    target_map: Vec<char>,
}

impl LineMap {
    /// Split both texts into lines (each keeping its trailing `\n`) and encode
    /// them against a shared line table.
    pub fn new(source: &[char], target: &[char]) -> Self {
        let mut map = Self {
            lines: vec![String::new()],
            source_map: Vec::new(),
            target_map: Vec::new(),
        };
        let mut index = HashMap::new();
        map.source_map = map.encode(source, &mut index, SOURCE_LINE_LIMIT);
        map.target_map = map.encode(target, &mut index, LAST_LINE);
        map
    }

    /// Source text with each line replaced by its code
    pub fn source_map(&self) -> &[char] {
        &self.source_map
    }

    /// Target text with each line replaced by its code
    pub fn target_map(&self) -> &[char] {
        &self.target_map
    }

    /// Number of distinct lines seen in both texts
    pub fn line_count(&self) -> usize {
        self.lines.len() - 1
    }

    /// Expand the line codes of every difference back into real text.
    pub fn restore(&self, diffs: &mut [Difference]) {
        for diff in diffs {
            let text: String = diff
                .text
                .chars()
                .filter_map(|code| self.lines.get(line_index(code)))
                .map(String::as_str)
                .collect();
            diff.text = text;
        }
    }

    fn encode(&mut self, text: &[char], index: &mut HashMap<String, usize>, limit: usize) -> Vec<char> {
        let mut codes = Vec::new();
        let mut start = 0;
        while start < text.len() {
            let end = if self.lines.len() >= limit {
                text.len()
            } else {
                text[start..]
                    .iter()
                    .position(|&c| c == '\n')
                    .map_or(text.len(), |i| start + i + 1)
            };
            let line: String = text[start..end].iter().collect();
            let i = match index.get(&line) {
                Some(&i) => i,
                None => {
                    self.lines.push(line.clone());
                    index.insert(line, self.lines.len() - 1);
                    self.lines.len() - 1
                }
            };
            codes.push(line_code(i));
            start = end;
        }
        codes
    }
}

fn line_code(index: usize) -> char {
    let value = if index < 0xD800 { index } else { index + 0x800 };
    // Indices never exceed LAST_LINE, which keeps the value in range.
    char::from_u32(value as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn line_index(code: char) -> usize {
    let value = code as usize;
    if value >= 0xE000 {
        value - 0x800
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn lines_to_codes() {
        let map = LineMap::new(&chars("alpha\nbeta\nalpha\n"), &chars("beta\nalpha\nbeta\n"));
        assert_eq!(map.source_map(), &['\u{1}', '\u{2}', '\u{1}']);
        assert_eq!(map.target_map(), &['\u{2}', '\u{1}', '\u{2}']);
        assert_eq!(map.line_count(), 2);
    }

    #[test]
    fn last_line_without_newline_is_distinct() {
        let map = LineMap::new(&chars("a\nb"), &chars("a\nb\n"));
        assert_eq!(map.source_map(), &['\u{1}', '\u{2}']);
        assert_eq!(map.target_map(), &['\u{1}', '\u{3}']);
    }

    #[test]
    fn restore_expands_codes() {
        let map = LineMap::new(&chars("alpha\nbeta\nalpha\n"), &chars("beta\nalpha\nbeta\n"));
        let mut diffs = vec![
            Difference::equal("\u{1}\u{2}\u{1}"),
            Difference::insert("\u{2}"),
        ];
        map.restore(&mut diffs);
        assert_eq!(
            diffs,
            vec![
                Difference::equal("alpha\nbeta\nalpha\n"),
                Difference::insert("beta\n"),
            ]
        );
    }

    #[test]
    fn codes_skip_surrogates() {
        assert_eq!(line_index(line_code(0xD7FF)), 0xD7FF);
        assert_eq!(line_index(line_code(0xD800)), 0xD800);
        assert_eq!(line_code(0xD800), '\u{E000}');
        assert_eq!(line_index(line_code(LAST_LINE)), LAST_LINE);
    }
}
