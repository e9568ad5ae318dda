//! Parsed top-level declarations and their collision identities.

use std::fmt;

use smallvec::SmallVec;

use crate::ModulePath;

/// Kind of a top-level declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Import,
    Type,
    Const,
    Var,
    Func,
    Method,
}

/// Identity used for duplicate detection.
///
/// Free functions, types, constants, and variables collide on their plain
/// name. Methods collide on receiver type + method name, so two unrelated
/// receiver types may each define a same-named method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CollisionKey {
    Plain(String),
    Method { receiver: String, name: String },
}

impl CollisionKey {
    /// Key for a plain named declaration.
    pub fn plain(name: impl Into<String>) -> Self {
        CollisionKey::Plain(name.into())
    }

    /// Key for a method declaration.
    pub fn method(receiver: impl Into<String>, name: impl Into<String>) -> Self {
        CollisionKey::Method {
            receiver: receiver.into(),
            name: name.into(),
        }
    }
}

// The reservation table stores keys in rendered form, so Display is the
// canonical encoding: `name` or `receiver.name`.
impl fmt::Display for CollisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionKey::Plain(name) => f.write_str(name),
            CollisionKey::Method { receiver, name } => write!(f, "{receiver}.{name}"),
        }
    }
}

/// One explicit import directive extracted from a fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSpec {
    pub path: ModulePath,
    /// Explicit local alias, when the directive carried one. `_` and `.`
    /// aliases are preserved verbatim.
    pub alias: Option<String>,
}

impl ImportSpec {
    /// An unaliased import of `path`.
    pub fn plain(path: impl Into<ModulePath>) -> Self {
        ImportSpec {
            path: path.into(),
            alias: None,
        }
    }

    /// An aliased import of `path`.
    pub fn aliased(path: impl Into<ModulePath>, alias: impl Into<String>) -> Self {
        ImportSpec {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }
}

/// One validated top-level construct of a rendered fragment.
///
/// `text` is the construct's source slice, leading documentation comments
/// included. Import declarations carry their parsed [`ImportSpec`]s and an
/// empty key list; every other kind carries the collision keys it declares
/// (grouped `const`/`var` blocks declare several).
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub kind: DeclKind,
    pub keys: SmallVec<[CollisionKey; 1]>,
    pub text: String,
    pub imports: Vec<ImportSpec>,
}

impl Declaration {
    /// A named (non-import) declaration.
    pub fn named(kind: DeclKind, keys: SmallVec<[CollisionKey; 1]>, text: impl Into<String>) -> Self {
        Declaration {
            kind,
            keys,
            text: text.into(),
            imports: Vec::new(),
        }
    }

    /// An import declaration.
    pub fn import(specs: Vec<ImportSpec>, text: impl Into<String>) -> Self {
        Declaration {
            kind: DeclKind::Import,
            keys: SmallVec::new(),
            text: text.into(),
            imports: specs,
        }
    }
}
