//! Symbol tables shared across the pipeline.
//!
//! All per-entity state lives here, keyed by canonical identity: file-scope
//! ordinary symbols, type names, and field names collapse by spelling
//! (redeclarations of the same entity yield one record), locals collapse by
//! (block, spelling). The tables are filled by the collector, completed by
//! the allocator, and read-only afterwards.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use serde::Serialize;

lazy_static! {
    /// libm names the allocator must never hand out: the short Bessel
    /// function names are exactly the shape generated names take.
    static ref PROTECTED_LIBM: HashSet<&'static str> = {
        let mut s = HashSet::new();
        for name in [
            "j0", "j1", "jn", "j0f", "j1f", "jnf", "j0l", "j1l", "jnl",
            "y0", "y1", "yn", "y0f", "y1f", "ynf", "y0l", "y1l", "ynl",
        ] {
            s.insert(name);
        }
        s
    };
}

/// The program entry point; implicitly on the ignore list and reserved.
pub const ENTRY_POINT: &str = "main";

pub type DeclId = usize;
pub type BlockId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolCategory {
    Function,
    Variable,
    Field,
    Type,
    EnumConstant,
}

/// One canonical declared entity.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub category: SymbolCategory,
    pub original: String,
    /// Present after allocation. Equal to `original` when no strictly
    /// shorter candidate existed.
    pub assigned: Option<String>,
    /// Owning block for function-local variables and parameters; `None`
    /// for globals, fields, types, and enum constants.
    pub block: Option<BlockId>,
    /// Functions: a body was seen somewhere in the file.
    pub defined: bool,
    /// Global variables: some declarator carried an initializer.
    pub initialized: bool,
    pub renamable: bool,
    /// Byte offset of the declaring name token. A local is not in scope
    /// before this point, so earlier references of the same spelling
    /// resolve past it.
    pub declared_at: usize,
}

/// A lexical compound scope. A function's parameter list shares the block
/// of the body's outermost compound statement, so parameters and top-level
/// locals draw from one counter.
#[derive(Debug, Default)]
pub struct Block {
    pub parent: Option<BlockId>,
    pub bindings: HashMap<String, DeclId>,
    /// Private allocation counter, lazily seeded from the nearest
    /// initialized ancestor so nested blocks never reuse a letter that is
    /// still visible. Sibling blocks restart and may reuse letters.
    pub counter: Option<usize>,
}

pub struct SymbolTable {
    pub decls: Vec<Declaration>,
    pub blocks: HashMap<BlockId, Block>,
    /// Every identifier spelling seen anywhere in the buffer, plus the
    /// protected libm names and the entry point. Reserved spellings are
    /// never assigned as fresh names.
    pub used: HashSet<String>,
    /// File-scope ordinary namespace: functions, global variables, enum
    /// constants.
    pub ordinary: HashMap<String, DeclId>,
    /// Tag names, typedefs, aliases, template type parameters.
    pub types: HashMap<String, DeclId>,
    /// Member namespace, collapsed by spelling across aggregates.
    pub fields: HashMap<String, DeclId>,
    /// Identifier-token node id -> declaration. Constructor name tokens
    /// map to their class's type declaration.
    pub decl_sites: HashMap<usize, DeclId>,
    /// Function names excluded from renaming.
    pub ignores: HashSet<String>,
}

impl SymbolTable {
    pub fn new(ignores: &[String]) -> Self {
        let mut used: HashSet<String> =
            PROTECTED_LIBM.iter().map(|s| s.to_string()).collect();
        used.insert(ENTRY_POINT.to_string());

        let mut ignore_set: HashSet<String> = ignores.iter().cloned().collect();
        ignore_set.insert(ENTRY_POINT.to_string());

        SymbolTable {
            decls: Vec::new(),
            blocks: HashMap::new(),
            used,
            ordinary: HashMap::new(),
            types: HashMap::new(),
            fields: HashMap::new(),
            decl_sites: HashMap::new(),
            ignores: ignore_set,
        }
    }

    pub fn reserve(&mut self, spelling: &str) {
        if !spelling.is_empty() && !self.used.contains(spelling) {
            self.used.insert(spelling.to_string());
        }
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id]
    }

    fn push_decl(&mut self, category: SymbolCategory, original: &str) -> DeclId {
        self.decls.push(Declaration {
            category,
            original: original.to_string(),
            assigned: None,
            block: None,
            defined: false,
            initialized: false,
            renamable: true,
            declared_at: 0,
        });
        self.decls.len() - 1
    }

    /// File-scope ordinary symbol, canonicalized by spelling.
    pub fn intern_ordinary(&mut self, spelling: &str, category: SymbolCategory) -> DeclId {
        if let Some(&id) = self.ordinary.get(spelling) {
            return id;
        }
        let id = self.push_decl(category, spelling);
        self.ordinary.insert(spelling.to_string(), id);
        id
    }

    pub fn intern_type(&mut self, spelling: &str) -> DeclId {
        if let Some(&id) = self.types.get(spelling) {
            return id;
        }
        let id = self.push_decl(SymbolCategory::Type, spelling);
        self.types.insert(spelling.to_string(), id);
        id
    }

    pub fn intern_field(&mut self, spelling: &str) -> DeclId {
        if let Some(&id) = self.fields.get(spelling) {
            return id;
        }
        let id = self.push_decl(SymbolCategory::Field, spelling);
        self.fields.insert(spelling.to_string(), id);
        id
    }

    pub fn ensure_block(&mut self, block: BlockId, parent: Option<BlockId>) {
        self.blocks.entry(block).or_insert_with(|| Block {
            parent,
            ..Block::default()
        });
    }

    /// Local variable or parameter, canonicalized by (block, spelling).
    pub fn intern_local(&mut self, block: BlockId, spelling: &str, declared_at: usize) -> DeclId {
        if let Some(&id) = self
            .blocks
            .get(&block)
            .and_then(|b| b.bindings.get(spelling))
        {
            return id;
        }
        let id = self.push_decl(SymbolCategory::Variable, spelling);
        self.decls[id].block = Some(block);
        self.decls[id].declared_at = declared_at;
        let entry = self.blocks.entry(block).or_default();
        entry.bindings.insert(spelling.to_string(), id);
        id
    }

    pub fn record_site(&mut self, node_id: usize, decl: DeclId) {
        self.decl_sites.insert(node_id, decl);
    }

    /// Ordinary-namespace lookup along an active block chain, innermost
    /// first, then file scope. This is what gives shadowing its meaning.
    /// A local declared after `offset` is not yet in scope at the
    /// reference and the search continues outward.
    pub fn lookup_ordinary(
        &self,
        active_blocks: &[BlockId],
        spelling: &str,
        offset: usize,
    ) -> Option<DeclId> {
        for block in active_blocks.iter().rev() {
            if let Some(&id) = self
                .blocks
                .get(block)
                .and_then(|b| b.bindings.get(spelling))
            {
                if self.decls[id].declared_at <= offset {
                    return Some(id);
                }
            }
        }
        self.ordinary.get(spelling).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn libm_and_entry_point_are_reserved_up_front() {
        let table = SymbolTable::new(&[]);
        assert!(table.used.contains("j0"));
        assert!(table.used.contains("ynl"));
        assert!(table.used.contains("main"));
        assert!(table.ignores.contains("main"));
    }

    #[test]
    fn redeclarations_collapse_to_one_record() {
        let mut table = SymbolTable::new(&[]);
        let a = table.intern_ordinary("f", SymbolCategory::Function);
        let b = table.intern_ordinary("f", SymbolCategory::Function);
        assert_eq!(a, b);
        assert_eq!(table.decls.len(), 1);
    }

    #[test]
    fn locals_shadow_file_scope() {
        let mut table = SymbolTable::new(&[]);
        let global = table.intern_ordinary("x", SymbolCategory::Variable);
        table.ensure_block(7, None);
        let local = table.intern_local(7, "x", 40);
        assert_ne!(global, local);
        assert_eq!(table.lookup_ordinary(&[7], "x", 50), Some(local));
        assert_eq!(table.lookup_ordinary(&[], "x", 50), Some(global));
    }

    #[test]
    fn local_not_in_scope_before_its_declaration() {
        let mut table = SymbolTable::new(&[]);
        let global = table.intern_ordinary("x", SymbolCategory::Variable);
        table.ensure_block(7, None);
        let local = table.intern_local(7, "x", 40);
        // A reference earlier in the block still sees the global.
        assert_eq!(table.lookup_ordinary(&[7], "x", 12), Some(global));
        assert_eq!(table.lookup_ordinary(&[7], "x", 40), Some(local));
    }
}
