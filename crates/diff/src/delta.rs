//! Compact delta encoding of an edit script.
//!
//! A delta only stores what cannot be recovered from the source text:
//! `=N` keeps N chars, `-N` drops N chars and `+text` inserts the
//! percent-encoded text. Tokens are separated by tabs, which the encoding
//! always escapes inside inserted text.

use crate::chars::collect;
use crate::difference::Difference;
use crate::edit_type::EditType;
use crate::encoding::{decode, encode};
use crate::error::{Error, Result};

/// Encode an edit script as a delta against its source text.
pub fn to_delta(diffs: &[Difference]) -> String {
    diffs
        .iter()
        .map(|diff| match diff.edit_type {
            EditType::Insert => format!("+{}", encode(&diff.text)),
            EditType::Delete => format!("-{}", diff.char_len()),
            EditType::Equal => format!("={}", diff.char_len()),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

/// Rebuild the full edit script from a source text and its delta.
pub fn from_delta(source: &str, delta: &str) -> Result<Vec<Difference>> {
    let source: Vec<char> = source.chars().collect();
    let mut diffs = Vec::new();
    let mut pointer = 0;

    for token in delta.split('\t') {
        let mut chars = token.chars();
        let Some(op) = chars.next() else {
            // Blank tokens, e.g. from a trailing tab, are ignored.
            continue;
        };
        let param = chars.as_str();
        match op {
            '+' => diffs.push(Difference::insert(decode(param)?)),
            '-' | '=' => {
                let count: usize = param.parse().map_err(|_| Error::InvalidDelta {
                    reason: format!("invalid length in token {:?}", token),
                })?;
                let end = pointer + count;
                let text = source.get(pointer..end).ok_or_else(|| Error::InvalidDelta {
                    reason: format!(
                        "token {:?} runs past the end of a {}-char source",
                        token,
                        source.len()
                    ),
                })?;
                let edit_type = if op == '-' {
                    EditType::Delete
                } else {
                    EditType::Equal
                };
                diffs.push(Difference::new(edit_type, collect(text)));
                pointer = end;
            }
            _ => {
                return Err(Error::InvalidDelta {
                    reason: format!("unknown operation in token {:?}", token),
                })
            }
        }
    }

    if pointer != source.len() {
        return Err(Error::InvalidDelta {
            reason: format!(
                "delta covers {} chars but the source has {}",
                pointer,
                source.len()
            ),
        });
    }
    Ok(diffs)
}
