//! # cmin — C source minifier
//!
//! Shrinks a single-file C translation unit by renaming every renamable
//! identifier to the shortest available non-colliding name, then stripping
//! comments and semantically unnecessary whitespace.
//!
//! ## Pipeline invariants
//!
//! 1. **Two-pass order**: collection fully completes before allocation
//!    (allocation needs the complete used-name set and block membership);
//!    allocation completes before rewriting; rewriting completes before
//!    the edit set is applied. Strictly sequential, no shared mutable
//!    state across phase boundaries.
//! 2. **Traversal order**: both walking passes visit the tree in lexical
//!    (preorder) order; that fixes the order in which allocator counters
//!    are consumed and makes the output deterministic.
//! 3. **Non-collision**: two declarations visible at the same program
//!    point never share an assigned name. Per-category alphabets keep
//!    categories apart by their first character; block counters seeded
//!    from enclosing scopes keep nested locals apart; sibling blocks may
//!    reuse names freely.
//! 4. **Never longer**: an assigned name is strictly shorter than the
//!    original spelling, or the original is kept unchanged.
//! 5. **Atomic edits**: the edit set is pairwise non-overlapping; overlap
//!    aborts the run. A partially renamed file would silently break
//!    compilation, so correctness is all-or-nothing.

mod allocator;
mod collector;
mod edit;
mod error;
mod minify;
mod reformat;
mod renamer;
mod symbols;
mod syntax;

#[cfg(test)]
mod pipeline_tests;

use serde::Serialize;
use tracing::debug;

pub use edit::{apply_edits, Edit};
pub use error::{Error, Result};
pub use minify::minify_text;
pub use symbols::SymbolCategory;

/// Per-run configuration, read-only to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct MinifyOptions {
    /// Function names excluded from renaming. The entry point is always
    /// implicitly excluded.
    pub ignores: Vec<String>,
}

/// One original-to-assigned mapping, for diagnostic output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRecord {
    pub category: SymbolCategory,
    pub from: String,
    pub to: String,
}

/// Result of one run: the minified text plus the rename table.
#[derive(Debug)]
pub struct MinifyResult {
    pub output: String,
    pub renames: Vec<RenameRecord>,
}

/// Run the whole pipeline over one translation unit.
pub fn minify_source(source: &str, options: &MinifyOptions) -> Result<MinifyResult> {
    let unit = syntax::SourceUnit::parse(source)?;

    let mut table = symbols::SymbolTable::new(&options.ignores);
    collector::collect(&unit, &mut table);
    allocator::allocate(&mut table);

    let edits = renamer::rewrite(&unit, &table);
    debug!(edits = edits.len(), "rewrite complete");
    let renamed = apply_edits(source, edits)?;

    let reformatted = reformat::reformat(&renamed);
    let output = minify_text(&reformatted)?;

    let renames = table
        .decls
        .iter()
        .filter_map(|d| {
            d.assigned.as_ref().map(|to| RenameRecord {
                category: d.category,
                from: d.original.clone(),
                to: to.clone(),
            })
        })
        .collect();

    Ok(MinifyResult { output, renames })
}
