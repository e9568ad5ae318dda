//! Template expansion for the skein emission backend.
//!
//! Templates mix literal target-language text with `$( … )` actions. The
//! `$` sigil is not part of the target language's grammar, so literal
//! output and control syntax never collide; `$$` emits a literal `$`.
//!
//! Action forms:
//!
//! - `$(path)` substitutes the scalar at dotted `path` (`.` is the
//!   current root).
//! - `$(fn arg …)` invokes a bound function; arguments are dotted paths
//!   or `"quoted"` string literals.
//! - `$(if path) … $(else) … $(end)` branches on truthiness.
//! - `$(each path) … $(end)` iterates a list, each element becoming the
//!   current root inside the body.
//!
//! Bound functions receive the generation state as an explicit `&mut S`
//! first argument; the table is assembled from closures up front, and
//! template authors never pass state themselves. Rendering aborts with no
//! partial output on malformed syntax, unknown functions, or data missing
//! from the context.

mod error;
mod parse;
mod render;

pub use error::TemplateError;
pub use render::{render, BoundFn, FuncTable};
