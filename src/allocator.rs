//! Name allocation.
//!
//! Each category owns a fixed first-character alphabet and a monotonically
//! increasing counter; locals draw from their block's private counter
//! instead. Candidates that collide with a reserved spelling are skipped;
//! a candidate that is not strictly shorter than the original is discarded
//! and the counter rolled back so the slot is not wasted.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::symbols::{Block, BlockId, SymbolCategory, SymbolTable};

pub const FUNCTION_ALPHABET: &str = "abcdefghijklm";
pub const GLOBAL_ALPHABET: &str = "nopq";
pub const LOCAL_ALPHABET: &str = "rstuvwxyz";
pub const FIELD_ALPHABET: &str = "nopqrstuvwxyz";
pub const TYPE_ALPHABET: &str = "ABCDEFGHIJKLM";
pub const ENUM_ALPHABET: &str = "NOPQRSTUVWXYZ";

const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generate the next candidate for `counter`. The first character comes
/// from the category alphabet; any overflow is spelled in base-62 digits
/// appended least-significant first (repeated division, not reversed).
/// That digit order is observable output and is kept as-is.
fn next_name(
    used: &HashSet<String>,
    alphabet: &str,
    counter: &mut usize,
    original: &str,
) -> String {
    let letters = alphabet.as_bytes();
    let start = *counter;
    loop {
        let mut candidate = String::new();
        candidate.push(letters[*counter % letters.len()] as char);
        let mut i = *counter / letters.len();
        while i != 0 {
            candidate.push(BASE62[i % 62] as char);
            i /= 62;
        }
        *counter += 1;
        if used.contains(&candidate) {
            continue;
        }
        if candidate.len() >= original.len() {
            // No win over the original spelling: keep it and give the
            // slot back.
            *counter = start;
            return original.to_string();
        }
        return candidate;
    }
}

/// Current effective counter for a block: its own if initialized, else the
/// nearest initialized ancestor's, else zero. Seeding from the ancestor is
/// what keeps a nested block from reusing a letter still visible from an
/// enclosing scope, while sibling blocks restart freely.
fn effective_counter(blocks: &HashMap<BlockId, Block>, id: BlockId) -> usize {
    let mut current = Some(id);
    while let Some(block_id) = current {
        let Some(block) = blocks.get(&block_id) else {
            break;
        };
        if let Some(counter) = block.counter {
            return counter;
        }
        current = block.parent;
    }
    0
}

/// Assign a name to every renamable declaration, in collection order.
pub fn allocate(table: &mut SymbolTable) {
    let mut n_fn = 0usize;
    let mut n_var = 0usize;
    let mut n_field = 0usize;
    let mut n_type = 0usize;
    let mut n_enum = 0usize;

    for id in 0..table.decls.len() {
        let (category, block, original, renamable, defined, initialized) = {
            let d = &table.decls[id];
            (
                d.category,
                d.block,
                d.original.clone(),
                d.renamable,
                d.defined,
                d.initialized,
            )
        };
        if !renamable {
            continue;
        }
        let assigned = match category {
            SymbolCategory::Function => {
                // Declared-only functions live elsewhere; protect, don't
                // rename.
                if !defined {
                    continue;
                }
                next_name(&table.used, FUNCTION_ALPHABET, &mut n_fn, &original)
            }
            SymbolCategory::Variable => match block {
                Some(block_id) => {
                    let mut counter = effective_counter(&table.blocks, block_id);
                    let name =
                        next_name(&table.used, LOCAL_ALPHABET, &mut counter, &original);
                    if let Some(b) = table.blocks.get_mut(&block_id) {
                        b.counter = Some(counter);
                    }
                    name
                }
                None => {
                    // Tentative definitions stay untouched, matching the
                    // definition-only rule for globals.
                    if !initialized {
                        continue;
                    }
                    next_name(&table.used, GLOBAL_ALPHABET, &mut n_var, &original)
                }
            },
            SymbolCategory::Field => {
                next_name(&table.used, FIELD_ALPHABET, &mut n_field, &original)
            }
            SymbolCategory::Type => {
                next_name(&table.used, TYPE_ALPHABET, &mut n_type, &original)
            }
            SymbolCategory::EnumConstant => {
                next_name(&table.used, ENUM_ALPHABET, &mut n_enum, &original)
            }
        };
        debug!(?category, from = %original, to = %assigned, "allocated");
        table.decls[id].assigned = Some(assigned);
    }
}
