//! ArkTS (`.ets`) frontend using Tree-sitter.
//!
//! ArkTS is TypeScript plus `struct` component declarations and trailing
//! builder blocks. The TypeScript grammar handles everything the decorator
//! rules need once `struct` is rewritten to a same-width `class ` keyword;
//! the rewritten declarations are tagged back as structs while lowering.
//! Syntax errors inside `build()` bodies are tolerated: Tree-sitter recovers
//! and the surrounding declarations survive.

use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use arkui_lint_core::ast::{
    Accessor, Annotation, AnnotationArg, ClassDecl, EnumDecl, EnumMemberDecl, InterfaceDecl,
    MethodDecl, PropertyDecl, StructDecl, TypeNode,
};
use arkui_lint_core::{Ast, AstBuilder, NodeId, NodeKind, ParseError, SourceParser, Span};

use crate::source::rewrite_structs;

/// Parses ArkTS source into the decorator-aware [`Ast`].
pub struct EtsParser {
    language: Language,
}

impl EtsParser {
    /// Creates a new ArkTS parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

impl Default for EtsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for EtsParser {
    fn language_id(&self) -> &'static str {
        "arkts"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ets"]
    }

    fn parse(&self, source: &str) -> Result<Ast, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::new(format!("failed to load TypeScript grammar: {e}")))?;

        let rewritten = rewrite_structs(source);
        let src = rewritten.text.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or_else(|| ParseError::new("parser produced no tree"))?;
        let root = tree.root_node();
        if root.has_error() {
            debug!("Recovered from syntax errors");
        }

        let mut lowering = Lowering {
            src,
            structs: &rewritten.struct_offsets,
            builder: AstBuilder::new(span_of(root)),
        };
        let module = lowering.builder.root();
        for child in children(root) {
            lowering.statement(child, module);
        }
        Ok(lowering.builder.finish())
    }
}

fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn span_of(node: Node<'_>) -> Span {
    let pos = node.start_position();
    Span::new(node.start_byte(), node.end_byte(), pos.row + 1, pos.column + 1)
}

/// Returns true if `node` has an anonymous child token `keyword`.
fn has_keyword(node: Node<'_>, keyword: &str) -> bool {
    children(node)
        .iter()
        .any(|c| !c.is_named() && c.kind() == keyword)
}

/// Removes matching surrounding quotes or backticks.
fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&open), Some(&close))
            if text.len() >= 2 && open == close && matches!(open, b'\'' | b'"' | b'`') =>
        {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

struct Lowering<'s> {
    src: &'s [u8],
    structs: &'s [usize],
    builder: AstBuilder,
}

impl Lowering<'_> {
    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.src).unwrap_or("")
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| unquote(self.text(n)).to_string())
    }

    fn statement(&mut self, node: Node<'_>, parent: NodeId) {
        match node.kind() {
            "export_statement" => {
                let decorators: Vec<Node<'_>> = children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "decorator")
                    .collect();
                match node.child_by_field_name("declaration") {
                    Some(declaration) => self.declaration(declaration, parent, &decorators),
                    None => self.other(node, parent),
                }
            }
            "ERROR" => {
                for child in children(node) {
                    self.statement(child, parent);
                }
            }
            _ => self.declaration(node, parent, &[]),
        }
    }

    fn declaration(&mut self, node: Node<'_>, parent: NodeId, decorators: &[Node<'_>]) {
        match node.kind() {
            "class_declaration" | "abstract_class_declaration" => {
                self.class(node, parent, decorators);
            }
            "class" if node.is_named() => self.class(node, parent, decorators),
            "interface_declaration" => self.interface(node, parent),
            "enum_declaration" => self.enumeration(node, parent),
            _ if node.is_named() => self.other(node, parent),
            _ => {}
        }
    }

    /// Mirrors an unmodelled node and keeps looking for declarations below.
    fn other(&mut self, node: Node<'_>, parent: NodeId) {
        let id = self
            .builder
            .push(parent, NodeKind::Other(node.kind().to_string()), span_of(node));
        for child in named_children(node) {
            self.statement(child, id);
        }
    }

    fn class(&mut self, node: Node<'_>, parent: NodeId, outer_decorators: &[Node<'_>]) {
        let name = self.field_text(node, "name").unwrap_or_default();
        let is_struct = children(node)
            .iter()
            .any(|c| c.kind() == "class" && !c.is_named() && self.structs.contains(&c.start_byte()));

        let kind = if is_struct {
            NodeKind::Struct(StructDecl { name })
        } else {
            let super_class = children(node)
                .into_iter()
                .find(|c| c.kind() == "class_heritage")
                .and_then(|heritage| {
                    children(heritage)
                        .into_iter()
                        .find(|c| c.kind() == "extends_clause")
                })
                .and_then(|extends| extends.child_by_field_name("value"))
                .map(|value| self.text(value).to_string());
            NodeKind::Class(ClassDecl { name, super_class })
        };

        let id = self.builder.push(parent, kind, span_of(node));
        for &decorator in outer_decorators {
            self.decorator(decorator, id);
        }
        for child in children(node) {
            if child.kind() == "decorator" {
                self.decorator(child, id);
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            let mut pending = Vec::new();
            self.class_body(body, id, &mut pending);
        }
    }

    /// Lowers class members. Method decorators are siblings preceding the
    /// method in the grammar, so they are carried in `pending`.
    fn class_body<'t>(&mut self, body: Node<'t>, owner: NodeId, pending: &mut Vec<Node<'t>>) {
        for child in children(body) {
            match child.kind() {
                "decorator" => pending.push(child),
                "method_definition" | "method_signature" | "abstract_method_signature" => {
                    let decorators = std::mem::take(pending);
                    self.method(child, owner, &decorators);
                }
                "public_field_definition" | "property_signature" => {
                    let decorators = std::mem::take(pending);
                    self.property(child, owner, &decorators);
                }
                "ERROR" => self.class_body(child, owner, pending),
                _ => {}
            }
        }
    }

    fn property(&mut self, node: Node<'_>, owner: NodeId, decorators: &[Node<'_>]) {
        let Some(name) = self.field_text(node, "name") else {
            return;
        };
        let kind = NodeKind::Property(PropertyDecl {
            name,
            type_annotation: node.child_by_field_name("type").map(|t| self.type_node(t)),
            is_static: has_keyword(node, "static"),
        });
        let id = self.builder.push(owner, kind, span_of(node));
        self.member_decorators(node, id, decorators);
        if let Some(value) = node.child_by_field_name("value") {
            self.statement(value, id);
        }
    }

    fn method(&mut self, node: Node<'_>, owner: NodeId, decorators: &[Node<'_>]) {
        let Some(name) = self.field_text(node, "name") else {
            return;
        };
        let accessor = if has_keyword(node, "get") {
            Accessor::Get
        } else if has_keyword(node, "set") {
            Accessor::Set
        } else {
            Accessor::Plain
        };
        let kind = NodeKind::Method(MethodDecl {
            name,
            accessor,
            return_type: node
                .child_by_field_name("return_type")
                .map(|t| self.type_node(t)),
            is_static: has_keyword(node, "static"),
        });
        let id = self.builder.push(owner, kind, span_of(node));
        self.member_decorators(node, id, decorators);
        if let Some(body) = node.child_by_field_name("body") {
            self.statement(body, id);
        }
    }

    fn member_decorators(&mut self, node: Node<'_>, id: NodeId, pending: &[Node<'_>]) {
        for &decorator in pending {
            self.decorator(decorator, id);
        }
        for child in children(node) {
            if child.kind() == "decorator" {
                self.decorator(child, id);
            }
        }
    }

    fn interface(&mut self, node: Node<'_>, parent: NodeId) {
        let name = self.field_text(node, "name").unwrap_or_default();
        let extends = children(node)
            .into_iter()
            .filter(|c| c.kind() == "extends_type_clause")
            .flat_map(|clause| named_children(clause))
            .map(|t| match t.child_by_field_name("name") {
                Some(name) => self.text(name).to_string(),
                None => self.text(t).to_string(),
            })
            .collect();

        let id = self.builder.push(
            parent,
            NodeKind::Interface(InterfaceDecl { name, extends }),
            span_of(node),
        );
        if let Some(body) = node.child_by_field_name("body") {
            let mut pending = Vec::new();
            self.class_body(body, id, &mut pending);
        }
    }

    fn enumeration(&mut self, node: Node<'_>, parent: NodeId) {
        let name = self.field_text(node, "name").unwrap_or_default();
        let id = self
            .builder
            .push(parent, NodeKind::Enum(EnumDecl { name }), span_of(node));
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };

        for member in named_children(body) {
            let decl = match member.kind() {
                "enum_assignment" => {
                    let parts = named_children(member);
                    let Some(name) = member
                        .child_by_field_name("name")
                        .or_else(|| parts.first().copied())
                    else {
                        continue;
                    };
                    let string_value = member
                        .child_by_field_name("value")
                        .or_else(|| parts.get(1).copied())
                        .filter(|v| v.kind() == "string")
                        .map(|v| unquote(self.text(v)).to_string());
                    EnumMemberDecl {
                        name: unquote(self.text(name)).to_string(),
                        string_value,
                    }
                }
                "property_identifier" | "string" => EnumMemberDecl {
                    name: unquote(self.text(member)).to_string(),
                    string_value: None,
                },
                _ => continue,
            };
            self.builder
                .push(id, NodeKind::EnumMember(decl), span_of(member));
        }
    }

    fn decorator(&mut self, node: Node<'_>, parent: NodeId) {
        let Some(expr) = named_children(node).into_iter().next() else {
            return;
        };
        let (callee, arguments) = match expr.kind() {
            "call_expression" => (
                expr.child_by_field_name("function"),
                expr.child_by_field_name("arguments"),
            ),
            _ => (Some(expr), None),
        };
        let Some(callee) = callee else {
            return;
        };
        // `@ns.Name` is named by its last component.
        let name_node = match callee.kind() {
            "member_expression" => callee.child_by_field_name("property").unwrap_or(callee),
            _ => callee,
        };

        let args: Vec<AnnotationArg> = arguments
            .map(|a| named_children(a).into_iter().map(|arg| self.argument(arg)).collect())
            .unwrap_or_default();

        self.builder.push(
            parent,
            NodeKind::Annotation(Annotation {
                name: self.text(name_node).to_string(),
                name_span: span_of(name_node),
                args,
            }),
            span_of(node),
        );
    }

    fn argument(&self, node: Node<'_>) -> AnnotationArg {
        match node.kind() {
            "string" => AnnotationArg::Str(unquote(self.text(node)).to_string()),
            "template_string" if !children(node).iter().any(|c| c.kind() == "template_substitution") => {
                AnnotationArg::Str(unquote(self.text(node)).to_string())
            }
            "identifier" => AnnotationArg::Ident(self.text(node).to_string()),
            "member_expression" => {
                match (
                    node.child_by_field_name("object"),
                    node.child_by_field_name("property"),
                ) {
                    (Some(object), Some(property)) if object.kind() == "identifier" => {
                        AnnotationArg::Member {
                            object: self.text(object).to_string(),
                            property: self.text(property).to_string(),
                        }
                    }
                    _ => AnnotationArg::Other,
                }
            }
            "array" => AnnotationArg::Array(
                named_children(node)
                    .into_iter()
                    .map(|item| self.argument(item))
                    .collect(),
            ),
            "object" => AnnotationArg::Object(
                named_children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "pair")
                    .filter_map(|pair| {
                        let key = self.field_text(pair, "key")?;
                        let value = pair.child_by_field_name("value")?;
                        Some((key, self.argument(value)))
                    })
                    .collect(),
            ),
            "parenthesized_expression" => named_children(node)
                .into_iter()
                .next()
                .map_or(AnnotationArg::Other, |inner| self.argument(inner)),
            _ => AnnotationArg::Other,
        }
    }

    fn type_node(&self, node: Node<'_>) -> TypeNode {
        match node.kind() {
            "type_annotation" | "parenthesized_type" | "readonly_type" => named_children(node)
                .into_iter()
                .next()
                .map_or_else(|| TypeNode::Other(self.text(node).to_string()), |t| self.type_node(t)),
            "predefined_type" => TypeNode::predefined(self.text(node)),
            "literal_type" | "null" | "undefined" => TypeNode::Literal(self.text(node).to_string()),
            "type_identifier" | "nested_type_identifier" => TypeNode::reference(self.text(node)),
            "generic_type" => {
                let name = self
                    .field_text(node, "name")
                    .unwrap_or_else(|| self.text(node).to_string());
                let args: Vec<TypeNode> = node
                    .child_by_field_name("type_arguments")
                    .map(|a| named_children(a).into_iter().map(|t| self.type_node(t)).collect())
                    .unwrap_or_default();
                TypeNode::generic(name, args)
            }
            "array_type" => named_children(node)
                .into_iter()
                .next()
                .map_or_else(|| TypeNode::Other(self.text(node).to_string()), |t| {
                    TypeNode::array(self.type_node(t))
                }),
            "union_type" => {
                let mut parts = Vec::new();
                self.union_parts(node, &mut parts);
                TypeNode::Union(parts)
            }
            _ => TypeNode::Other(self.text(node).to_string()),
        }
    }

    /// The grammar nests `A | B | C` left-deep; flatten it.
    fn union_parts(&self, node: Node<'_>, out: &mut Vec<TypeNode>) {
        for child in named_children(node) {
            if child.kind() == "union_type" {
                self.union_parts(child, out);
            } else {
                out.push(self.type_node(child));
            }
        }
    }
}
