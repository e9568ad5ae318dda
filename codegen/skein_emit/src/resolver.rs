//! Boundary to the schema compiler's module layout.

use skein_ir::ModulePath;

/// Maps schema source files to the import paths of their generated
/// modules.
///
/// Implemented by the schema compiler driving the generator. Type and
/// constant descriptors in template data may carry a `file` key instead
/// of a resolved `module` key; this trait turns the former into the
/// latter.
pub trait ModuleResolver {
    /// The import path of the module generated from `schema_file`, or
    /// `None` when the file is unknown.
    fn module_path(&self, schema_file: &str) -> Option<ModulePath>;
}

/// Resolver for callers whose descriptors always carry resolved `module`
/// keys. Any `file` lookup fails.
pub struct PreResolved;

impl ModuleResolver for PreResolved {
    fn module_path(&self, _schema_file: &str) -> Option<ModulePath> {
        None
    }
}
