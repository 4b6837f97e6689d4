//! Byte-range edits over the original buffer.

use serde::Serialize;

use crate::error::{Error, Result};

/// Replacement of a half-open byte range in the original buffer.
#[derive(Debug, Clone, Serialize)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Apply a full edit set atomically, by ascending start offset.
///
/// Overlap means the rewriter classified some token twice; that is an
/// internal inconsistency and the run aborts rather than guessing which
/// edit wins.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<String> {
    edits.sort_by_key(|e| (e.start, e.end));
    let mut out = String::with_capacity(source.len());
    let mut pos = 0usize;
    for edit in &edits {
        if edit.start < pos || edit.end < edit.start || edit.end > source.len() {
            return Err(Error::EditConflict { offset: edit.start });
        }
        out.push_str(&source[pos..edit.start]);
        out.push_str(&edit.text);
        pos = edit.end;
    }
    out.push_str(&source[pos..]);
    Ok(out)
}
