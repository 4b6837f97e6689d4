//! Reference rewriting: the second walking pass.
//!
//! Revisits the same tree in the same preorder and emits one edit per
//! identifier token that resolves to a renamed declaration. Dispatch is
//! per token, so each byte range is considered exactly once and two edits
//! can never target the same token.
//!
//! Resolution per token kind:
//! - a recorded declaration site uses its declaration directly (this
//!   covers prototypes, enumerators, type and field declarations, and
//!   constructor names, which were recorded against their class's type);
//! - a plain identifier resolves through the active block chain into the
//!   file-scope ordinary namespace; a local declared later in the block
//!   is not yet in scope at the reference and is skipped;
//! - a type identifier resolves in the type namespace (for a template
//!   specialization only the name token is a `type_identifier`, so the
//!   argument list is untouched by construction);
//! - a field identifier resolves in the member namespace by spelling,
//!   which also covers member initializers, designated initializers, and
//!   members reached through unresolved template instantiations.

use tracing::trace;
use tree_sitter::Node;

use crate::edit::Edit;
use crate::symbols::{DeclId, SymbolTable};
use crate::syntax::{in_preprocessor, walk_tree, SourceUnit, SyntaxKind, SyntaxVisitor};

/// Produce the full edit set for a completed symbol table.
pub fn rewrite(unit: &SourceUnit, table: &SymbolTable) -> Vec<Edit> {
    let mut renamer = Renamer {
        unit,
        table,
        block_stack: Vec::new(),
        edits: Vec::new(),
    };
    walk_tree(unit, &mut renamer);
    renamer.edits
}

struct Renamer<'a, 'src> {
    unit: &'a SourceUnit<'src>,
    table: &'a SymbolTable,
    block_stack: Vec<usize>,
    edits: Vec<Edit>,
}

impl SyntaxVisitor for Renamer<'_, '_> {
    fn enter_node(&mut self, node: Node<'_>) {
        match SyntaxKind::of(&node) {
            SyntaxKind::CompoundStatement => self.block_stack.push(node.id()),
            SyntaxKind::Identifier => self.visit_identifier(node),
            SyntaxKind::TypeIdentifier => self.visit_type_identifier(node),
            SyntaxKind::FieldIdentifier => self.visit_field_identifier(node),
            _ => {}
        }
    }

    fn leave_node(&mut self, node: Node<'_>) {
        if SyntaxKind::of(&node) == SyntaxKind::CompoundStatement {
            self.block_stack.pop();
        }
    }
}

impl Renamer<'_, '_> {
    fn emit(&mut self, node: Node, decl: DeclId) {
        let declaration = self.table.decl(decl);
        let Some(assigned) = &declaration.assigned else {
            return;
        };
        let spelling = self.unit.text(node);
        if assigned == spelling {
            return;
        }
        trace!(from = %spelling, to = %assigned, start = node.start_byte(), "edit");
        self.edits.push(Edit {
            start: node.start_byte(),
            end: node.end_byte(),
            text: assigned.clone(),
        });
    }

    fn visit_identifier(&mut self, node: Node) {
        if let Some(&decl) = self.table.decl_sites.get(&node.id()) {
            self.emit(node, decl);
            return;
        }
        if in_preprocessor(node) {
            return;
        }
        // `~A()` names the type, not an ordinary symbol.
        if node.parent().is_some_and(|p| p.kind() == "destructor_name") {
            let spelling = self.unit.text(node);
            if let Some(&decl) = self.table.types.get(spelling) {
                self.emit(node, decl);
            }
            return;
        }
        let spelling = self.unit.text(node);
        if let Some(decl) =
            self.table
                .lookup_ordinary(&self.block_stack, spelling, node.start_byte())
        {
            self.emit(node, decl);
        }
    }

    fn visit_type_identifier(&mut self, node: Node) {
        if let Some(&decl) = self.table.decl_sites.get(&node.id()) {
            self.emit(node, decl);
            return;
        }
        if in_preprocessor(node) {
            return;
        }
        let spelling = self.unit.text(node);
        if let Some(&decl) = self.table.types.get(spelling) {
            self.emit(node, decl);
        }
    }

    fn visit_field_identifier(&mut self, node: Node) {
        if let Some(&decl) = self.table.decl_sites.get(&node.id()) {
            self.emit(node, decl);
            return;
        }
        if in_preprocessor(node) {
            return;
        }
        let spelling = self.unit.text(node);
        if let Some(&decl) = self.table.fields.get(spelling) {
            self.emit(node, decl);
        }
    }
}
