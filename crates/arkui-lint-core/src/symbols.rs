//! Symbol catalog for a single compilation unit.
//!
//! The catalog indexes the top-level classes, interfaces and enums of a
//! module by name, and keeps a side table of string-valued enum members
//! (`Enum.Member` → value). Structs are deliberately left out: rules that
//! care about them build per-struct [`Declaration`]s on demand.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::ast::{Accessor, Ast, NodeId, NodeKind, TypeNode};

/// Declaration variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
}

/// Member variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Field or property signature.
    Property,
    /// Plain method.
    Method,
    /// `get` accessor.
    Getter,
    /// `set` accessor.
    Setter,
    /// Enum member.
    EnumMember,
}

/// Semantic view of a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Keyword or literal type; nothing can be accessed through it.
    Primitive(String),
    /// Reference to a declaration by name.
    Named(String),
    /// Flattened union.
    Union(Vec<TypeDescriptor>),
    /// `T[]`, `Array<T>` and nestings thereof.
    Array {
        /// Innermost non-array element type.
        element: Box<TypeDescriptor>,
        /// Nesting depth, at least 1.
        dims: usize,
    },
    /// `Map<K, V>`
    Map,
    /// `Set<T>`
    Set,
}

impl TypeDescriptor {
    /// Lowers a syntactic type annotation.
    ///
    /// `Array<T>` and `T[]` produce the same descriptor and nested arrays
    /// fold into a single descriptor with a dimension count.
    #[must_use]
    pub fn from_type_node(node: &TypeNode) -> Self {
        match node {
            TypeNode::Predefined(name) | TypeNode::Literal(name) | TypeNode::Other(name) => {
                Self::Primitive(name.clone())
            }
            TypeNode::Reference { name, args } => match name.as_str() {
                "Array" | "ReadonlyArray" => Self::array_of(
                    args.first()
                        .map_or_else(|| Self::Primitive("any".into()), Self::from_type_node),
                ),
                "Map" | "WeakMap" => Self::Map,
                "Set" | "WeakSet" => Self::Set,
                _ => Self::Named(name.clone()),
            },
            TypeNode::Array(element) => Self::array_of(Self::from_type_node(element)),
            TypeNode::Union(types) => {
                let mut parts = Vec::with_capacity(types.len());
                for t in types {
                    match Self::from_type_node(t) {
                        Self::Union(inner) => parts.extend(inner),
                        other => parts.push(other),
                    }
                }
                if parts.len() == 1 {
                    parts.remove(0)
                } else {
                    Self::Union(parts)
                }
            }
        }
    }

    fn array_of(element: Self) -> Self {
        match element {
            Self::Array { element, dims } => Self::Array {
                element,
                dims: dims + 1,
            },
            other => Self::Array {
                element: Box::new(other),
                dims: 1,
            },
        }
    }

    /// Returns true for keyword and literal types.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Returns true for arrays and unions with an array constituent.
    #[must_use]
    pub fn has_array(&self) -> bool {
        match self {
            Self::Array { .. } => true,
            Self::Union(parts) => parts.iter().any(Self::has_array),
            _ => false,
        }
    }
}

/// A member of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name.
    pub name: String,
    /// Member variant.
    pub kind: MemberKind,
    /// Names of the decorators attached to the member.
    pub decorators: Vec<String>,
    /// `static` modifier.
    pub is_static: bool,
    /// Declared type; the return type for accessors. `None` when absent.
    pub ty: Option<TypeDescriptor>,
    /// Declaring node.
    pub node: NodeId,
}

impl Member {
    /// Builds a member from a property, method or enum member node.
    #[must_use]
    pub fn from_node(ast: &Ast, id: NodeId) -> Option<Self> {
        let (name, kind, is_static) = match ast.kind(id) {
            NodeKind::Property(p) => (p.name.clone(), MemberKind::Property, p.is_static),
            NodeKind::Method(m) => {
                let kind = match m.accessor {
                    Accessor::Plain => MemberKind::Method,
                    Accessor::Get => MemberKind::Getter,
                    Accessor::Set => MemberKind::Setter,
                };
                (m.name.clone(), kind, m.is_static)
            }
            NodeKind::EnumMember(e) => (e.name.clone(), MemberKind::EnumMember, true),
            _ => return None,
        };

        Some(Self {
            name,
            kind,
            decorators: ast.annotations(id).map(|(_, a)| a.name.clone()).collect(),
            is_static,
            ty: ast.type_annotation(id).map(TypeDescriptor::from_type_node),
            node: id,
        })
    }

    /// Returns true if the member carries decorator `name`.
    #[must_use]
    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|d| d == name)
    }

    /// Instance properties and getters can appear in a watched path.
    #[must_use]
    pub fn is_watchable(&self) -> bool {
        !self.is_static && matches!(self.kind, MemberKind::Property | MemberKind::Getter)
    }
}

/// A class, struct, interface or enum with its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Declaration variant.
    pub kind: DeclKind,
    /// Declared name.
    pub name: String,
    /// Declaring node.
    pub node: NodeId,
    /// Names of the decorators on the declaration.
    pub annotations: Vec<String>,
    /// Superclass for classes, extended interfaces for interfaces.
    pub supertypes: Vec<String>,
    /// Members in source order.
    pub members: Vec<Member>,
}

impl Declaration {
    /// Builds a declaration from its node; `None` for non-declarations.
    #[must_use]
    pub fn from_node(ast: &Ast, id: NodeId) -> Option<Self> {
        let (kind, name, supertypes) = match ast.kind(id) {
            NodeKind::Class(c) => (
                DeclKind::Class,
                c.name.clone(),
                c.super_class.iter().cloned().collect(),
            ),
            NodeKind::Struct(s) => (DeclKind::Struct, s.name.clone(), Vec::new()),
            NodeKind::Interface(i) => (DeclKind::Interface, i.name.clone(), i.extends.clone()),
            NodeKind::Enum(e) => (DeclKind::Enum, e.name.clone(), Vec::new()),
            _ => return None,
        };

        Some(Self {
            kind,
            name,
            node: id,
            annotations: ast.annotations(id).map(|(_, a)| a.name.clone()).collect(),
            supertypes,
            members: ast
                .members(id)
                .filter_map(|m| Member::from_node(ast, m))
                .collect(),
        })
    }

    /// Returns true if the declaration carries decorator `name`.
    #[must_use]
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    /// Own watchable member called `name`, without climbing supertypes.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        match self.kind {
            DeclKind::Class | DeclKind::Struct | DeclKind::Interface => self
                .members
                .iter()
                .find(|m| m.name == name && m.is_watchable()),
            DeclKind::Enum => None,
        }
    }
}

/// Name-indexed registry of the top-level declarations of one module.
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    declarations: HashMap<String, Declaration>,
    enum_values: HashMap<String, String>,
}

impl SymbolCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes the direct children of the module root.
    ///
    /// When two declarations share a name the first one wins.
    #[must_use]
    pub fn build(ast: &Ast) -> Self {
        let mut catalog = Self::new();
        for &child in ast.children(ast.root()) {
            match ast.kind(child) {
                NodeKind::Class(_) | NodeKind::Interface(_) => {}
                NodeKind::Enum(e) => {
                    for member in ast.members(child) {
                        if let NodeKind::EnumMember(m) = ast.kind(member) {
                            if let Some(value) = &m.string_value {
                                catalog
                                    .enum_values
                                    .insert(format!("{}.{}", e.name, m.name), value.clone());
                            }
                        }
                    }
                }
                _ => continue,
            }
            if let Some(decl) = Declaration::from_node(ast, child) {
                catalog.insert(decl);
            }
        }
        catalog
    }

    /// Adds a declaration unless the name is already taken.
    pub fn insert(&mut self, decl: Declaration) {
        self.declarations.entry(decl.name.clone()).or_insert(decl);
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.declarations.clear();
        self.enum_values.clear();
    }

    /// Number of cataloged declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if nothing is cataloged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.enum_values.is_empty()
    }

    /// Declaration called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    /// String value of `Enum.Member`.
    #[must_use]
    pub fn enum_value(&self, qualified: &str) -> Option<&str> {
        self.enum_values.get(qualified).map(String::as_str)
    }

    /// Finds watchable member `name` on `decl` or along its supertypes.
    ///
    /// Supertypes missing from the catalog end that branch of the climb; a
    /// visited set cuts inheritance cycles.
    #[must_use]
    pub fn lookup_member<'a>(&'a self, decl: &'a Declaration, name: &str) -> Option<&'a Member> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue = VecDeque::from([decl]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.name.as_str()) {
                continue;
            }
            if let Some(member) = current.member(name) {
                return Some(member);
            }
            queue.extend(current.supertypes.iter().filter_map(|s| self.get(s)));
        }
        None
    }
}
