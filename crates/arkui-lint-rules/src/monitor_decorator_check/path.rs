//! Resolution of `@Monitor` path strings.
//!
//! A path such as `"items.0.owner.name"` is resolved segment by segment
//! against the declaring class or struct: the first segment must be an
//! instance member of the host, later segments walk through the declared
//! types of the members they reach. Arrays accept index segments and
//! `length`, `Map`/`Set` accept `size`, unions fan out over their
//! constituents.
//!
//! Every traversed member must carry the state decorator of its owner for
//! the path to be tracked; an untracked or ambiguous path is a warning, an
//! unreachable one an error.

use arkui_lint_core::symbols::{DeclKind, Declaration, Member, MemberKind, SymbolCatalog, TypeDescriptor};
use tracing::trace;

use crate::decorators::{COMPUTED, STRUCT_STATE, TRACE};

/// Largest integer index JavaScript can represent exactly.
const MAX_SAFE_INDEX: u64 = (1 << 53) - 1;

/// Outcome of resolving a path, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    /// Reachable and tracked.
    Valid,
    /// Reachable only on some branches, or through an untracked member.
    Warn,
    /// Not reachable.
    Error,
}

/// Intermediate result of resolving a path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Found { tracked: bool },
    Ambiguous,
    Missing,
}

impl Resolution {
    fn verdict(self) -> Verdict {
        match self {
            Self::Found { tracked: true } => Verdict::Valid,
            Self::Found { tracked: false } | Self::Ambiguous => Verdict::Warn,
            Self::Missing => Verdict::Error,
        }
    }

    /// Combines the results of alternative branches.
    ///
    /// Nothing found is `Missing`, found on some branches only is
    /// `Ambiguous`, found everywhere is tracked only if every branch is.
    fn merge(results: impl IntoIterator<Item = Self>) -> Self {
        let mut found = false;
        let mut partial = false;
        let mut tracked = true;
        for result in results {
            match result {
                Self::Found { tracked: t } => {
                    found = true;
                    tracked &= t;
                }
                Self::Ambiguous => {
                    found = true;
                    partial = true;
                }
                Self::Missing => partial = true,
            }
        }
        match (found, partial) {
            (false, _) => Self::Missing,
            (true, true) => Self::Ambiguous,
            (true, false) => Self::Found { tracked },
        }
    }
}

/// Returns true if `segment` is a canonical, safe array index.
#[must_use]
pub fn is_index(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let canonical = match bytes {
        [] => false,
        [b'0'] => true,
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    canonical && segment.parse::<u64>().is_ok_and(|n| n <= MAX_SAFE_INDEX)
}

/// Splits a path into its non-blank segments.
#[must_use]
pub fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.trim().is_empty()).collect()
}

/// Whether `member` carries the state decorator its owner requires.
fn is_tracked(member: &Member, owner: DeclKind) -> bool {
    if member.kind == MemberKind::Getter {
        return member.has_decorator(COMPUTED);
    }
    match owner {
        DeclKind::Class => member.has_decorator(TRACE),
        DeclKind::Struct => STRUCT_STATE.iter().any(|d| member.has_decorator(d)),
        DeclKind::Interface | DeclKind::Enum => false,
    }
}

/// Resolves monitor paths within one compilation unit.
pub struct PathResolver<'a> {
    catalog: &'a SymbolCatalog,
}

impl<'a> PathResolver<'a> {
    /// Creates a resolver over `catalog`.
    #[must_use]
    pub fn new(catalog: &'a SymbolCatalog) -> Self {
        Self { catalog }
    }

    /// Resolves `path` against `host`, the class or struct declaring the
    /// monitor. Returns `None` for a path without segments.
    #[must_use]
    pub fn resolve(&self, host: &Declaration, path: &str) -> Option<Verdict> {
        let segments = segments(path);
        let (head, rest) = segments.split_first()?;

        let resolution = match self.catalog.lookup_member(host, head) {
            None => Resolution::Missing,
            Some(member) => {
                let tracked = is_tracked(member, host.kind);
                self.descend(member.ty.as_ref(), tracked, rest)
            }
        };

        trace!(path = %path, host = %host.name, ?resolution, "resolved monitor path");
        Some(resolution.verdict())
    }

    /// Resolves `rest` against a value of type `ty`; `None` is an undeclared
    /// type and accepts anything.
    fn descend(&self, ty: Option<&TypeDescriptor>, tracked: bool, rest: &[&str]) -> Resolution {
        let Some(ty) = ty else {
            return Resolution::Found { tracked };
        };
        if rest.is_empty() {
            return Resolution::Found { tracked };
        }

        match ty {
            TypeDescriptor::Primitive(_) => Resolution::Missing,
            TypeDescriptor::Map | TypeDescriptor::Set => {
                if rest == ["size"] {
                    Resolution::Found { tracked }
                } else {
                    Resolution::Missing
                }
            }
            TypeDescriptor::Array { .. } => self.resolve_array(ty, tracked, rest),
            TypeDescriptor::Union(parts) => {
                if ty.has_array() && (is_index(rest[0]) || rest == ["length"]) {
                    self.resolve_array(ty, tracked, rest)
                } else {
                    self.resolve_union(parts, tracked, rest)
                }
            }
            TypeDescriptor::Named(name) => self.resolve_named(name, tracked, rest),
        }
    }

    fn resolve_named(&self, name: &str, tracked: bool, rest: &[&str]) -> Resolution {
        let Some(decl) = self.catalog.get(name) else {
            return Resolution::Missing;
        };
        let Some((head, tail)) = rest.split_first() else {
            return Resolution::Found { tracked };
        };
        match self.catalog.lookup_member(decl, head) {
            Some(member) if member.kind == MemberKind::Getter && member.ty.is_none() => {
                Resolution::Found { tracked }
            }
            Some(member) => {
                let tracked = tracked && is_tracked(member, decl.kind);
                self.descend(member.ty.as_ref(), tracked, tail)
            }
            None => Resolution::Missing,
        }
    }

    fn resolve_union(&self, parts: &[TypeDescriptor], tracked: bool, rest: &[&str]) -> Resolution {
        let candidates: Vec<&TypeDescriptor> =
            parts.iter().filter(|part| self.is_candidate(part)).collect();

        Resolution::merge(
            candidates
                .into_iter()
                .map(|candidate| self.descend(Some(candidate), tracked, rest)),
        )
    }

    /// Element types of every array constituent with their nesting depth.
    ///
    /// A union element type contributes its candidate constituents, or
    /// itself as one entry when it has none.
    fn dimension_map<'t>(&self, ty: &'t TypeDescriptor) -> Vec<(&'t TypeDescriptor, usize)> {
        let mut out = Vec::new();
        let arrays: Vec<&TypeDescriptor> = match ty {
            TypeDescriptor::Union(parts) => parts.iter().collect(),
            other => vec![other],
        };
        for array in arrays {
            let TypeDescriptor::Array { element, dims } = array else {
                continue;
            };
            let element = element.as_ref();
            let candidates: Vec<&TypeDescriptor> = match element {
                TypeDescriptor::Union(parts) => {
                    parts.iter().filter(|part| self.is_candidate(part)).collect()
                }
                _ => Vec::new(),
            };
            if candidates.is_empty() {
                out.push((element, *dims));
            } else {
                out.extend(candidates.into_iter().map(|part| (part, *dims)));
            }
        }
        out
    }

    /// Union constituents a path can step into: cataloged named types and
    /// collections.
    fn is_candidate(&self, ty: &TypeDescriptor) -> bool {
        match ty {
            TypeDescriptor::Named(name) => self.catalog.get(name).is_some(),
            TypeDescriptor::Union(_) => false,
            other => !other.is_primitive(),
        }
    }

    fn resolve_array(&self, ty: &TypeDescriptor, tracked: bool, rest: &[&str]) -> Resolution {
        if rest == ["length"] {
            return Resolution::Found { tracked };
        }

        let dimensions = self.dimension_map(ty);
        let max = dimensions.iter().map(|(_, dims)| *dims).max().unwrap_or(0);
        let k = rest.iter().take_while(|s| is_index(s)).count();
        if k > max {
            return Resolution::Missing;
        }

        let tail = &rest[k..];
        if tail.is_empty() {
            let mut at_max: Vec<&TypeDescriptor> = Vec::new();
            for (element, _) in dimensions.iter().filter(|(_, dims)| *dims == max) {
                if !at_max.contains(element) {
                    at_max.push(*element);
                }
            }
            if k == max && at_max.len() > 1 {
                return Resolution::Ambiguous;
            }
            return Resolution::Found { tracked };
        }
        if k == 0 {
            return Resolution::Missing;
        }

        Resolution::merge(dimensions.iter().filter(|(_, dims)| *dims >= k).map(
            |(element, dims)| {
                if *dims == k {
                    self.descend(Some(*element), tracked, tail)
                } else if tail == ["length"] {
                    Resolution::Found { tracked }
                } else {
                    Resolution::Missing
                }
            },
        ))
    }
}
