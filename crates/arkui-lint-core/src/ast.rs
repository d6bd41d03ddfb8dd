//! Read-only syntax tree walked by the rule engine.
//!
//! Frontends lower their parser output into an [`Ast`]: an arena of
//! [`Node`]s addressed by [`NodeId`], each carrying a [`NodeKind`], a
//! source [`Span`], a parent link and its children in source order.
//! Only the declarations that decorator rules care about are modelled
//! precisely; everything else is kept as [`NodeKind::Other`] so the
//! traversal still sees it.

/// Index of a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Source range of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line of `start` (1-indexed).
    pub line: usize,
    /// Column of `start` (1-indexed).
    pub column: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for zero-width spans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A type annotation as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// Built-in keyword type: `number`, `string`, `boolean`, `any`, ...
    Predefined(String),
    /// Literal type: `null`, `undefined`, `'a'`, `1`.
    Literal(String),
    /// Named type, possibly generic: `Foo`, `Map<string, number>`.
    Reference {
        /// Type name, dotted when qualified.
        name: String,
        /// Generic arguments.
        args: Vec<TypeNode>,
    },
    /// `T[]`
    Array(Box<TypeNode>),
    /// `A | B | C`
    Union(Vec<TypeNode>),
    /// Anything else (function types, object literals, tuples).
    Other(String),
}

impl TypeNode {
    /// `name` without generic arguments.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// `name<args>`.
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<TypeNode>) -> Self {
        Self::Reference {
            name: name.into(),
            args,
        }
    }

    /// A keyword type.
    #[must_use]
    pub fn predefined(name: impl Into<String>) -> Self {
        Self::Predefined(name.into())
    }

    /// `element[]`.
    #[must_use]
    pub fn array(element: TypeNode) -> Self {
        Self::Array(Box::new(element))
    }
}

/// Accessor flavour of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accessor {
    /// Ordinary method.
    #[default]
    Plain,
    /// `get name()`
    Get,
    /// `set name(v)`
    Set,
}

/// An argument passed to an annotation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationArg {
    /// `'a.b'`
    Str(String),
    /// `name`
    Ident(String),
    /// `Object.property`, e.g. an enum member.
    Member {
        /// Left-hand side.
        object: String,
        /// Right-hand side.
        property: String,
    },
    /// `['a', 'b']`
    Array(Vec<AnnotationArg>),
    /// `{ key: value }`
    Object(Vec<(String, AnnotationArg)>),
    /// Any other expression.
    Other,
}

/// Class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// Name of the `extends` target, if any.
    pub super_class: Option<String>,
}

/// `struct` component declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    /// Struct name.
    pub name: String,
}

/// Interface declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    /// Interface name.
    pub name: String,
    /// Names listed in `extends`.
    pub extends: Vec<String>,
}

/// Enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// Enum name.
    pub name: String,
}

/// Enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberDecl {
    /// Member name.
    pub name: String,
    /// Initializer when it is a string literal.
    pub string_value: Option<String>,
}

/// Property or property signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub type_annotation: Option<TypeNode>,
    /// `static` modifier.
    pub is_static: bool,
}

/// Method, accessor or method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// Accessor flavour.
    pub accessor: Accessor,
    /// Declared return type.
    pub return_type: Option<TypeNode>,
    /// `static` modifier.
    pub is_static: bool,
}

/// `@Name` or `@Name(args)` attached to its parent node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Decorator name without `@`.
    pub name: String,
    /// Span of the name identifier.
    pub name_span: Span,
    /// Call arguments, empty for the bare form.
    pub args: Vec<AnnotationArg>,
}

/// Node kind discriminator with its typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Compilation unit root.
    Module,
    /// `class`
    Class(ClassDecl),
    /// `struct`
    Struct(StructDecl),
    /// `interface`
    Interface(InterfaceDecl),
    /// `enum`
    Enum(EnumDecl),
    /// Enum member.
    EnumMember(EnumMemberDecl),
    /// Class, struct or interface property.
    Property(PropertyDecl),
    /// Class, struct or interface method.
    Method(MethodDecl),
    /// Decorator.
    Annotation(Annotation),
    /// Node not modelled in detail, tagged with the frontend's kind name.
    Other(String),
}

impl NodeKind {
    /// Declared name for declarations, members and annotations.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Class(d) => Some(&d.name),
            Self::Struct(d) => Some(&d.name),
            Self::Interface(d) => Some(&d.name),
            Self::Enum(d) => Some(&d.name),
            Self::EnumMember(d) => Some(&d.name),
            Self::Property(d) => Some(&d.name),
            Self::Method(d) => Some(&d.name),
            Self::Annotation(a) => Some(&a.name),
            Self::Module | Self::Other(_) => None,
        }
    }

    /// Returns true for class, struct, interface and enum declarations.
    #[must_use]
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Self::Class(_) | Self::Struct(_) | Self::Interface(_) | Self::Enum(_)
        )
    }

    /// Returns true for properties, methods and enum members.
    #[must_use]
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            Self::Property(_) | Self::Method(_) | Self::EnumMember(_)
        )
    }
}

/// One arena slot.
#[derive(Debug, Clone)]
pub struct Node {
    /// Kind and payload.
    pub kind: NodeKind,
    /// Source range.
    pub span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in source order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Immutable syntax tree of one compilation unit.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// The module root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node for `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns the kind of `id`.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the span of `id`.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Returns the parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of `id` in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Declared name of `id`, if it has one.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.kind(id).name()
    }

    /// Annotations attached to `id`, in source order.
    pub fn annotations(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Annotation)> + '_ {
        self.children(id)
            .iter()
            .filter_map(move |&child| match self.kind(child) {
                NodeKind::Annotation(a) => Some((child, a)),
                _ => None,
            })
    }

    /// Returns true if `id` carries an annotation called `name`.
    #[must_use]
    pub fn has_annotation(&self, id: NodeId, name: &str) -> bool {
        self.annotations(id).any(|(_, a)| a.name == name)
    }

    /// Members declared directly inside `id`.
    pub fn members(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.kind(child).is_member())
    }

    /// Declared type of a property or return type of a method.
    #[must_use]
    pub fn type_annotation(&self, id: NodeId) -> Option<&TypeNode> {
        match self.kind(id) {
            NodeKind::Property(p) => p.type_annotation.as_ref(),
            NodeKind::Method(m) => m.return_type.as_ref(),
            _ => None,
        }
    }
}

/// Incremental constructor for an [`Ast`].
///
/// Nodes must be pushed parent-first; children keep the order in which
/// they were pushed.
#[derive(Debug)]
pub struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    /// Starts a tree whose module root covers `span`.
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Module,
                span,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The module root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a node under `parent`.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Appends a node under `parent` with a synthetic span on its own line.
    ///
    /// Useful for hand-built trees where source text does not exist.
    pub fn child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let line = self.nodes.len() + 1;
        let start = line * 100;
        let span = Span::new(start, start + 50, line, 1);
        let kind = match kind {
            NodeKind::Annotation(mut a) if a.name_span == Span::default() => {
                a.name_span = Span::new(start + 1, start + 1 + a.name.len(), line, 2);
                NodeKind::Annotation(a)
            }
            other => other,
        };
        self.push(parent, kind, span)
    }

    /// Freezes the tree.
    #[must_use]
    pub fn finish(self) -> Ast {
        Ast { nodes: self.nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Ast, NodeId, NodeId, NodeId) {
        let mut b = AstBuilder::new(Span::new(0, 1000, 1, 1));
        let class = b.child(
            b.root(),
            NodeKind::Class(ClassDecl {
                name: "Store".into(),
                super_class: None,
            }),
        );
        b.child(
            class,
            NodeKind::Annotation(Annotation {
                name: "ObservedV2".into(),
                name_span: Span::default(),
                args: Vec::new(),
            }),
        );
        let prop = b.child(
            class,
            NodeKind::Property(PropertyDecl {
                name: "count".into(),
                type_annotation: Some(TypeNode::predefined("number")),
                is_static: false,
            }),
        );
        let trace = b.child(
            prop,
            NodeKind::Annotation(Annotation {
                name: "Trace".into(),
                name_span: Span::default(),
                args: Vec::new(),
            }),
        );
        (b.finish(), class, prop, trace)
    }

    #[test]
    fn children_keep_push_order() {
        let (ast, class, prop, _) = sample();
        assert_eq!(ast.children(ast.root()), &[class]);
        assert_eq!(ast.children(class).len(), 2);
        assert_eq!(ast.children(class)[1], prop);
        assert_eq!(ast.parent(prop), Some(class));
        assert_eq!(ast.parent(ast.root()), None);
    }

    #[test]
    fn typed_accessors() {
        let (ast, class, prop, _) = sample();
        assert_eq!(ast.name(class), Some("Store"));
        assert!(ast.has_annotation(class, "ObservedV2"));
        assert!(ast.has_annotation(prop, "Trace"));
        assert!(!ast.has_annotation(prop, "Local"));
        assert_eq!(ast.members(class).collect::<Vec<_>>(), vec![prop]);
        assert_eq!(
            ast.type_annotation(prop),
            Some(&TypeNode::predefined("number"))
        );
    }

    #[test]
    fn synthetic_annotation_name_span_is_inside_node_span() {
        let (ast, _, _, trace) = sample();
        let span = ast.span(trace);
        let NodeKind::Annotation(a) = ast.kind(trace) else {
            panic!("expected annotation");
        };
        assert!(a.name_span.start > span.start);
        assert!(a.name_span.end <= span.end);
    }
}
