//! Hierarchical reserved-name registry.
//!
//! Namespaces live in an arena and refer to each other by [`NamespaceId`],
//! so a long-lived package namespace and short-lived render-scoped children
//! coexist without borrow gymnastics. A child inherits every ancestor
//! reservation for collision checks; its own reservations stay invisible to
//! the ancestor.

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::trace;

/// Index of a namespace within its [`NamespaceArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamespaceId(u32);

impl NamespaceId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A name was already reserved in the namespace or one of its ancestors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("name `{name}` is already declared")]
pub struct ReserveConflict {
    pub name: String,
}

struct Node {
    parent: Option<NamespaceId>,
    names: FxHashSet<String>,
}

/// Arena of parent-linked namespaces.
///
/// The arena always contains a root namespace; [`NamespaceArena::child`]
/// derives scoped namespaces from it (or from other children). Nodes are
/// never removed; scoped children are simply abandoned when a render
/// finishes, which keeps every id valid for the arena's lifetime.
pub struct NamespaceArena {
    nodes: Vec<Node>,
}

impl NamespaceArena {
    /// Create an arena holding just the root namespace.
    pub fn new() -> Self {
        NamespaceArena {
            nodes: vec![Node {
                parent: None,
                names: FxHashSet::default(),
            }],
        }
    }

    /// The root namespace.
    pub fn root(&self) -> NamespaceId {
        NamespaceId(0)
    }

    /// Derive a child namespace.
    ///
    /// The child sees all current and future reservations of its ancestor
    /// chain for collision checks, but names reserved in the child are
    /// local to it.
    pub fn child(&mut self, parent: NamespaceId) -> NamespaceId {
        let id = NamespaceId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            parent: Some(parent),
            names: FxHashSet::default(),
        });
        id
    }

    /// Whether `name` is reserved in `ns` or any of its ancestors.
    pub fn is_reserved(&self, ns: NamespaceId, name: &str) -> bool {
        let mut current = Some(ns);
        while let Some(id) = current {
            let node = &self.nodes[id.index()];
            if node.names.contains(name) {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Reserve `name` in `ns`.
    ///
    /// Fails when the name is already reserved here or in any ancestor.
    /// Collision resolution belongs to the caller; nothing is renamed.
    pub fn reserve(&mut self, ns: NamespaceId, name: impl Into<String>) -> Result<(), ReserveConflict> {
        let name = name.into();
        if self.is_reserved(ns, &name) {
            trace!(name = %name, "reserve conflict");
            return Err(ReserveConflict { name });
        }
        self.nodes[ns.index()].names.insert(name);
        Ok(())
    }

    /// Remove a reservation made directly in `ns`, permitting one
    /// subsequent re-reservation of the exact name.
    ///
    /// No-op when the name is not reserved in `ns` itself (ancestor
    /// reservations are never touched).
    pub fn forget(&mut self, ns: NamespaceId, name: &str) {
        if self.nodes[ns.index()].names.remove(name) {
            trace!(name, "forgot reservation");
        }
    }
}

impl Default for NamespaceArena {
    fn default() -> Self {
        NamespaceArena::new()
    }
}
