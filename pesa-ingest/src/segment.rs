//! Record segmenter: split statement text into per-transaction spans.
//!
//! Extracted statement text has no reliable column delimiters, but every row
//! starts with a receipt code (`U` + 9 or more uppercase letters/digits).
//! Those codes are the only anchors we trust.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::RawSpan;

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bU[A-Z0-9]{9,}\b").expect("transaction code pattern"));

/// Split raw text into `(code, body)` spans in document order.
///
/// Text before the first code is header/preamble and is dropped. A body runs
/// up to the next code, the last one to end of text. No codes, no spans.
pub fn segment(text: &str) -> Vec<RawSpan<'_>> {
    let codes: Vec<_> = CODE_RE.find_iter(text).collect();

    codes
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let end = codes.get(i + 1).map_or(text.len(), |next| next.start());
            RawSpan {
                code: m.as_str(),
                body: &text[m.end()..end],
            }
        })
        .collect()
}
