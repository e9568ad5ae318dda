//! Stable synthetic names for compiler-generated helpers.

use rustc_hash::FxHashMap;
use tracing::debug;

use skein_ir::TypeRef;

use crate::{NamespaceArena, NamespaceId};

/// Derives collision-free synthetic identifiers, one per type identity.
///
/// Names are memoized for the whole package run: repeated requests for a
/// structurally identical [`TypeRef`] return the same string, even across
/// output files. Winning candidates are reserved in the package namespace,
/// so mangled names never collide with user-authored declarations or with
/// each other.
pub struct Mangler {
    memo: FxHashMap<TypeRef, String>,
}

impl Mangler {
    /// Create an empty mangler.
    pub fn new() -> Self {
        Mangler {
            memo: FxHashMap::default(),
        }
    }

    /// The unique helper name for `ty`.
    ///
    /// The base candidate is `_<module short name>_<type name>` sanitized
    /// to identifier characters; on collision a `_2`, `_3`, … suffix is
    /// probed until the package namespace admits the name.
    pub fn mangle(
        &mut self,
        arena: &mut NamespaceArena,
        package_ns: NamespaceId,
        ty: &TypeRef,
    ) -> String {
        if let Some(name) = self.memo.get(ty) {
            return name.clone();
        }

        let base = base_candidate(ty);
        let mut candidate = base.clone();
        let mut counter = 2u32;
        while arena.reserve(package_ns, candidate.as_str()).is_err() {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }

        debug!(ty = %ty.name, name = %candidate, "mangled helper name");
        self.memo.insert(ty.clone(), candidate.clone());
        candidate
    }
}

impl Default for Mangler {
    fn default() -> Self {
        Mangler::new()
    }
}

/// `_<short>_<name>` with non-identifier characters mapped to `_`.
fn base_candidate(ty: &TypeRef) -> String {
    let short = ty.module.short_name();
    let mut out = String::with_capacity(short.len() + ty.name.len() + 2);
    out.push('_');
    for c in short.chars().chain(std::iter::once('_')).chain(ty.name.chars()) {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}
