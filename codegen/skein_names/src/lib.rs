//! Name management for the skein emission backend.
//!
//! Three collaborating pieces, all collision-aware and none of which ever
//! silently renames a caller-supplied identifier:
//!
//! - [`NamespaceArena`]: hierarchical reserved-name registry. One root
//!   namespace exists per generated package and lives for the whole run;
//!   children see ancestor reservations but keep their own local.
//! - [`Mangler`]: stable synthetic names for compiler-generated helpers,
//!   memoized by the type identity they serve.
//! - [`ImportRegistry`]: per-file module-path → local-alias table with
//!   deterministic emission of the grouped import block.

mod imports;
mod mangler;
mod namespace;

pub use imports::{ImportConflict, ImportRegistry};
pub use mangler::Mangler;
pub use namespace::{NamespaceArena, NamespaceId, ReserveConflict};
