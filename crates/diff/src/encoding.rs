//! Percent-encoding of span text inside patches and deltas.
//!
//! `%`, ASCII control chars (newlines and tabs among them) and non-ASCII
//! chars are escaped, so a span never breaks the line or token structure.
//! Decoding accepts any well-formed `%XX` sequence so patches written by
//! other tools still parse.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{Error, Result};

/// Chars escaped in patch and delta text.
const SPAN_TEXT: &AsciiSet = &CONTROLS.add(b'%');

/// Escape `%`, control chars and non-ASCII chars.
pub fn encode(text: &str) -> String {
    utf8_percent_encode(text, SPAN_TEXT).to_string()
}

/// Undo percent-encoding.
pub fn decode(text: &str) -> Result<String> {
    let invalid = || Error::InvalidEscape {
        text: text.to_string(),
    };

    // The decoder passes stray `%` through untouched; a patch with one is
    // corrupt.
    let bytes = text.as_bytes();
    let well_formed = bytes
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'%')
        .all(|(i, _)| {
            bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
        });
    if !well_formed {
        return Err(invalid());
    }

    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| invalid())
}
