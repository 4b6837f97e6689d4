//! Symbol collection: the first of the two walking passes.
//!
//! One preorder walk records every declared symbol (canonical identity,
//! category, owning block for locals) and reserves every identifier
//! spelling in the buffer, including identifier-like tokens inside
//! preprocessor directive bodies. Collection fully completes before any
//! name is allocated.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use tree_sitter::Node;

use crate::symbols::{SymbolCategory, SymbolTable};
use crate::syntax::{walk_tree, SourceUnit, SyntaxKind, SyntaxVisitor};

lazy_static! {
    static ref IDENT_TOKEN: Regex = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

/// Declarator wrappers that sit between a declaration and its name token.
const DECLARATOR_WRAPPERS: &[&str] = &[
    "init_declarator",
    "pointer_declarator",
    "array_declarator",
    "parenthesized_declarator",
    "reference_declarator",
    "attributed_declarator",
];

fn is_wrapper(kind: &str) -> bool {
    DECLARATOR_WRAPPERS.contains(&kind)
}

fn is_declarator(kind: &str) -> bool {
    is_wrapper(kind) || kind == "function_declarator" || kind == "identifier"
}

/// Descend through declarator wrappers to the first structural node:
/// a name token or a `function_declarator`.
fn unwrap_declarator(mut node: Node) -> Node {
    while is_wrapper(node.kind()) {
        match node.child_by_field_name("declarator") {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

pub fn collect(unit: &SourceUnit, table: &mut SymbolTable) {
    let mut collector = Collector {
        unit,
        table,
        block_stack: Vec::new(),
    };
    walk_tree(unit, &mut collector);
    debug!(
        decls = collector.table.decls.len(),
        blocks = collector.table.blocks.len(),
        reserved = collector.table.used.len(),
        "symbol collection complete"
    );
}

struct Collector<'a, 'src> {
    unit: &'a SourceUnit<'src>,
    table: &'a mut SymbolTable,
    block_stack: Vec<usize>,
}

impl SyntaxVisitor for Collector<'_, '_> {
    fn enter_node(&mut self, node: Node<'_>) {
        match SyntaxKind::of(&node) {
            SyntaxKind::CompoundStatement => {
                let parent = self.block_stack.last().copied();
                self.table.ensure_block(node.id(), parent);
                self.block_stack.push(node.id());
            }
            SyntaxKind::FunctionDefinition => self.collect_function(node),
            SyntaxKind::Declaration => self.collect_declaration(node),
            SyntaxKind::ParameterDeclaration => self.collect_parameter(node),
            SyntaxKind::FieldDeclaration => self.collect_field(node),
            SyntaxKind::TypeDefinition => self.collect_typedef(node),
            SyntaxKind::AliasDeclaration => self.collect_alias(node),
            SyntaxKind::StructSpecifier | SyntaxKind::EnumSpecifier => {
                self.collect_tag(node)
            }
            SyntaxKind::Enumerator => self.collect_enumerator(node),
            SyntaxKind::TypeParameter => self.collect_type_parameter(node),
            SyntaxKind::Identifier
            | SyntaxKind::TypeIdentifier
            | SyntaxKind::FieldIdentifier => {
                let spelling = self.unit.text(node);
                self.table.reserve(spelling);
            }
            SyntaxKind::PreprocBody => {
                // Macro bodies are opaque text to the grammar; reserve
                // anything identifier-shaped inside them.
                let body = self.unit.text(node);
                for token in IDENT_TOKEN.find_iter(body) {
                    self.table.reserve(token.as_str());
                }
            }
            SyntaxKind::Other => {}
        }
    }

    fn leave_node(&mut self, node: Node<'_>) {
        if SyntaxKind::of(&node) == SyntaxKind::CompoundStatement {
            self.block_stack.pop();
        }
    }
}

impl Collector<'_, '_> {
    /// Name of the class/struct whose member list directly contains `node`.
    fn enclosing_class_name(&self, node: Node) -> Option<String> {
        let list = node.parent()?;
        if list.kind() != "field_declaration_list" {
            return None;
        }
        let spec = list.parent()?;
        let name = spec.child_by_field_name("name")?;
        Some(self.unit.text(name).to_string())
    }

    fn collect_function(&mut self, node: Node) {
        let Some(declarator) = node.child_by_field_name("declarator") else {
            return;
        };
        let fn_decl = unwrap_declarator(declarator);
        if fn_decl.kind() != "function_declarator" {
            return;
        }
        let Some(name) = fn_decl
            .child_by_field_name("declarator")
            .map(unwrap_declarator)
        else {
            return;
        };
        // A definition inside a class body whose name matches the class is
        // a constructor: its name token tracks the type's assigned name.
        let spelling = self.unit.text(name).to_string();
        if matches!(name.kind(), "identifier" | "field_identifier")
            && self.enclosing_class_name(node).as_deref() == Some(&spelling)
        {
            let id = self.table.intern_type(&spelling);
            self.table.record_site(name.id(), id);
            return;
        }
        match name.kind() {
            "identifier" => {
                let id = self
                    .table
                    .intern_ordinary(&spelling, SymbolCategory::Function);
                self.table.decls[id].defined = true;
                if self.table.ignores.contains(&spelling) {
                    self.table.decls[id].renamable = false;
                }
                self.table.record_site(name.id(), id);
            }
            "field_identifier" => {
                // In-class method definition: member namespace.
                let id = self.table.intern_field(&spelling);
                self.table.record_site(name.id(), id);
            }
            // Operator names and qualified names are never renamed; their
            // component tokens are still reserved by the token arms.
            _ => {}
        }
    }

    fn collect_declaration(&mut self, node: Node) {
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|c| is_declarator(c.kind()))
            .collect();
        for top in declarators {
            let core = unwrap_declarator(top);
            if core.kind() == "function_declarator" {
                self.collect_prototype_or_fnptr(top, core);
                continue;
            }
            if core.kind() != "identifier" {
                continue;
            }
            let has_init = top.kind() == "init_declarator";
            self.collect_variable(core, has_init, node);
        }
    }

    /// `int f(void);` declares a function; `void (*cb)(int)` declares a
    /// function-pointer variable. The parenthesized inner declarator tells
    /// them apart.
    fn collect_prototype_or_fnptr(&mut self, top: Node, fn_decl: Node) {
        let Some(inner) = fn_decl.child_by_field_name("declarator") else {
            return;
        };
        if inner.kind() == "parenthesized_declarator" {
            let core = unwrap_declarator(inner);
            if core.kind() == "identifier" {
                let has_init = top.kind() == "init_declarator";
                self.collect_variable(core, has_init, top);
            }
            return;
        }
        let name = unwrap_declarator(inner);
        if name.kind() != "identifier" {
            return;
        }
        let spelling = self.unit.text(name).to_string();
        let id = self
            .table
            .intern_ordinary(&spelling, SymbolCategory::Function);
        if self.table.ignores.contains(&spelling) {
            self.table.decls[id].renamable = false;
        }
        self.table.record_site(name.id(), id);
    }

    fn collect_variable(&mut self, name: Node, has_init: bool, context: Node) {
        let spelling = self.unit.text(name).to_string();
        if let Some(&block) = self.block_stack.last() {
            // Local: owning block is the nearest compound-statement
            // ancestor, which is exactly the top of the active stack.
            let id = self
                .table
                .intern_local(block, &spelling, name.start_byte());
            self.table.record_site(name.id(), id);
        } else if crate::syntax::ancestor_of_kind(context, "function_definition").is_none() {
            let id = self
                .table
                .intern_ordinary(&spelling, SymbolCategory::Variable);
            self.table.decls[id].initialized |= has_init;
            self.table.record_site(name.id(), id);
        }
        // A local with no enclosing block is left unrenamed entirely.
    }

    fn collect_parameter(&mut self, node: Node) {
        // Only parameters of a function definition are collected; their
        // block is the body's outermost compound statement, shared with
        // the top-level locals.
        let Some(body) = self.owning_body(node) else {
            return;
        };
        let Some(name) = node
            .child_by_field_name("declarator")
            .map(unwrap_declarator)
        else {
            return;
        };
        if name.kind() != "identifier" {
            return;
        }
        let parent = self.block_stack.last().copied();
        self.table.ensure_block(body.id(), parent);
        let spelling = self.unit.text(name).to_string();
        let id = self
            .table
            .intern_local(body.id(), &spelling, name.start_byte());
        self.table.record_site(name.id(), id);
    }

    /// Body of the defined function this parameter belongs to, if any.
    fn owning_body<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let list = node.parent()?;
        if list.kind() != "parameter_list" {
            return None;
        }
        let fn_decl = list.parent()?;
        if fn_decl.kind() != "function_declarator" {
            return None;
        }
        let mut owner = fn_decl.parent()?;
        while is_wrapper(owner.kind()) {
            owner = owner.parent()?;
        }
        if owner.kind() != "function_definition" {
            return None;
        }
        owner.child_by_field_name("body")
    }

    fn collect_field(&mut self, node: Node) {
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|c| is_declarator(c.kind()) || c.kind() == "field_identifier")
            .collect();
        for top in declarators {
            let mut core = unwrap_declarator(top);
            if core.kind() == "function_declarator" {
                // Method prototype; still member namespace.
                match core.child_by_field_name("declarator").map(unwrap_declarator) {
                    Some(inner) => core = inner,
                    None => continue,
                }
            }
            if core.kind() != "field_identifier" {
                continue;
            }
            let spelling = self.unit.text(core).to_string();
            let id = self.table.intern_field(&spelling);
            self.table.record_site(core.id(), id);
        }
    }

    fn collect_typedef(&mut self, node: Node) {
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|c| is_declarator(c.kind()) || c.kind() == "type_identifier")
            .collect();
        for top in declarators {
            let mut core = unwrap_declarator(top);
            if core.kind() == "function_declarator" {
                // Function-pointer typedef: the name hides inside.
                match core.child_by_field_name("declarator").map(unwrap_declarator) {
                    Some(inner) => core = unwrap_declarator(inner),
                    None => continue,
                }
                if core.kind() == "parenthesized_declarator" {
                    core = unwrap_declarator(core);
                }
            }
            if core.kind() != "type_identifier" {
                continue;
            }
            let spelling = self.unit.text(core).to_string();
            let id = self.table.intern_type(&spelling);
            self.table.record_site(core.id(), id);
        }
    }

    fn collect_alias(&mut self, node: Node) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let spelling = self.unit.text(name).to_string();
        let id = self.table.intern_type(&spelling);
        self.table.record_site(name.id(), id);
    }

    /// Tag declarations: `struct S { ... }`, `enum E { ... }`. A specifier
    /// without a body is a type reference and records nothing here.
    fn collect_tag(&mut self, node: Node) {
        if node.child_by_field_name("body").is_none() {
            return;
        }
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        if name.kind() != "type_identifier" {
            return;
        }
        let spelling = self.unit.text(name).to_string();
        let id = self.table.intern_type(&spelling);
        self.table.record_site(name.id(), id);
    }

    fn collect_enumerator(&mut self, node: Node) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let spelling = self.unit.text(name).to_string();
        let id = self
            .table
            .intern_ordinary(&spelling, SymbolCategory::EnumConstant);
        self.table.record_site(name.id(), id);
    }

    fn collect_type_parameter(&mut self, node: Node) {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "type_identifier");
        if let Some(name) = name {
            let spelling = self.unit.text(name).to_string();
            let id = self.table.intern_type(&spelling);
            self.table.record_site(name.id(), id);
        }
    }
}
