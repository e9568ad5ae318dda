//! Shared data model for the skein emission backend.
//!
//! Everything the emission pipeline passes between stages lives here so the
//! naming, parsing, template, and orchestration crates agree on one
//! vocabulary:
//!
//! - [`ModulePath`] / [`TypeRef`]: identities of generated modules and of
//!   the types they define.
//! - [`Value`]: the tree of data a template is expanded against.
//! - [`Declaration`] / [`CollisionKey`]: one parsed top-level construct and
//!   the identity used for duplicate detection.

mod decl;
mod module_path;
mod ty;
mod value;

pub use decl::{CollisionKey, DeclKind, Declaration, ImportSpec};
pub use module_path::ModulePath;
pub use ty::TypeRef;
pub use value::Value;
