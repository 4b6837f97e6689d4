//! Front-end seam around tree-sitter.
//!
//! The parser builds one tree per run; the collector and the rewriter walk
//! that same tree, so node ids are stable across both passes and byte
//! ranges index the original input buffer. Everything downstream dispatches
//! on [`SyntaxKind`], a lowering of the grammar's node kinds to the small
//! set this pipeline actually distinguishes.

use tree_sitter::{Node, Parser, Tree};

use crate::error::{Error, Result};

/// One parsed translation unit. Owns the tree, borrows the source text.
pub struct SourceUnit<'src> {
    source: &'src str,
    tree: Tree,
}

impl<'src> SourceUnit<'src> {
    pub fn parse(source: &'src str) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_cpp::LANGUAGE.into())?;
        let tree = parser.parse(source, None).ok_or(Error::Parse)?;
        Ok(SourceUnit { source, tree })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text slice behind a node.
    pub fn text(&self, node: Node) -> &'src str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// The node kinds the collector and rewriter care about. Everything else
/// is `Other` and only contributes its identifier tokens to the used-name
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    FunctionDefinition,
    Declaration,
    ParameterDeclaration,
    FieldDeclaration,
    TypeDefinition,
    AliasDeclaration,
    StructSpecifier,
    EnumSpecifier,
    Enumerator,
    TypeParameter,
    CompoundStatement,
    Identifier,
    TypeIdentifier,
    FieldIdentifier,
    PreprocBody,
    Other,
}

impl SyntaxKind {
    pub fn of(node: &Node) -> SyntaxKind {
        match node.kind() {
            "function_definition" => SyntaxKind::FunctionDefinition,
            "declaration" => SyntaxKind::Declaration,
            "parameter_declaration" | "optional_parameter_declaration" => {
                SyntaxKind::ParameterDeclaration
            }
            "field_declaration" => SyntaxKind::FieldDeclaration,
            "type_definition" => SyntaxKind::TypeDefinition,
            "alias_declaration" => SyntaxKind::AliasDeclaration,
            "struct_specifier" | "union_specifier" | "class_specifier" => {
                SyntaxKind::StructSpecifier
            }
            "enum_specifier" => SyntaxKind::EnumSpecifier,
            "enumerator" => SyntaxKind::Enumerator,
            "type_parameter_declaration" => SyntaxKind::TypeParameter,
            "compound_statement" => SyntaxKind::CompoundStatement,
            "identifier" | "namespace_identifier" => SyntaxKind::Identifier,
            "type_identifier" => SyntaxKind::TypeIdentifier,
            "field_identifier" => SyntaxKind::FieldIdentifier,
            "preproc_arg" => SyntaxKind::PreprocBody,
            _ => SyntaxKind::Other,
        }
    }
}

/// The single traversal mechanism shared by both walking passes.
///
/// `enter_node` fires in lexical (preorder) order, which is what makes the
/// allocator's counter consumption deterministic; `leave_node` exists so
/// implementers can maintain a scope stack.
pub trait SyntaxVisitor {
    fn enter_node(&mut self, node: Node<'_>);
    fn leave_node(&mut self, _node: Node<'_>) {}
}

/// Preorder walk over the whole tree, iterative so deeply nested input
/// cannot overflow the stack.
pub fn walk_tree<V: SyntaxVisitor + ?Sized>(unit: &SourceUnit, visitor: &mut V) {
    let mut cursor = unit.root().walk();
    loop {
        visitor.enter_node(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            visitor.leave_node(cursor.node());
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Nearest ancestor with the given grammar kind, excluding the node itself.
pub fn ancestor_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut current = node.parent();
    while let Some(n) = current {
        if n.kind() == kind {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// True when some ancestor belongs to the preprocessor (`preproc_def`,
/// `preproc_if`, ...). Tokens in that territory are never rewritten.
pub fn in_preprocessor(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        if n.kind().starts_with("preproc") {
            return true;
        }
        current = n.parent();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_unit() {
        let unit = SourceUnit::parse("int main(void) { return 0; }").unwrap();
        assert_eq!(unit.root().kind(), "translation_unit");
    }

    #[test]
    fn walk_is_preorder_and_balanced() {
        let unit = SourceUnit::parse("int f(){int x;{int y;}}").unwrap();

        struct Depth {
            depth: usize,
            max: usize,
        }
        impl SyntaxVisitor for Depth {
            fn enter_node(&mut self, _node: Node<'_>) {
                self.depth += 1;
                self.max = self.max.max(self.depth);
            }
            fn leave_node(&mut self, _node: Node<'_>) {
                self.depth -= 1;
            }
        }

        let mut v = Depth { depth: 0, max: 0 };
        walk_tree(&unit, &mut v);
        assert_eq!(v.depth, 0);
        assert!(v.max > 3);
    }

    #[test]
    fn preprocessor_guard_sees_directives() {
        let unit = SourceUnit::parse("#define LIMIT 8\nint g = LIMIT;\n").unwrap();

        struct Probe {
            guarded: usize,
            free: usize,
        }
        impl SyntaxVisitor for Probe {
            fn enter_node(&mut self, node: Node<'_>) {
                if node.kind() == "identifier" {
                    if in_preprocessor(node) {
                        self.guarded += 1;
                    } else {
                        self.free += 1;
                    }
                }
            }
        }

        let mut probe = Probe { guarded: 0, free: 0 };
        walk_tree(&unit, &mut probe);
        assert!(probe.guarded >= 1); // the LIMIT definition
        assert!(probe.free >= 2); // g and the LIMIT reference
    }
}
