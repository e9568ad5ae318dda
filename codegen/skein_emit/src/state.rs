//! Mutable generation state threaded through template functions.

use skein_ir::{ModulePath, TypeRef};
use skein_names::{ImportRegistry, Mangler, NamespaceArena, NamespaceId};

use crate::resolver::ModuleResolver;

/// All state a template function may touch, passed explicitly as the
/// first argument of every bound function.
///
/// The namespace arena and mangler memo live for the package's entire
/// generation run; the import registry is replaced at every file flush.
pub struct EmitState {
    pub(crate) namespaces: NamespaceArena,
    pub(crate) package_ns: NamespaceId,
    /// Render-scoped child namespace for fresh variable names; replaced
    /// at the start of every render.
    pub(crate) scratch: NamespaceId,
    pub(crate) mangler: Mangler,
    pub(crate) imports: ImportRegistry,
    module: ModulePath,
    resolver: Box<dyn ModuleResolver>,
}

impl EmitState {
    pub(crate) fn new(module: ModulePath, resolver: Box<dyn ModuleResolver>) -> Self {
        let mut namespaces = NamespaceArena::new();
        let package_ns = namespaces.root();
        let scratch = namespaces.child(package_ns);
        EmitState {
            namespaces,
            package_ns,
            scratch,
            mangler: Mangler::new(),
            imports: ImportRegistry::new(),
            module,
            resolver,
        }
    }

    /// Start a render: fresh-variable names allocated from now on live in
    /// a new scope that still sees every package-level reservation.
    pub(crate) fn begin_render(&mut self) {
        self.scratch = self.namespaces.child(self.package_ns);
    }

    /// Import path of the package being generated.
    pub fn module(&self) -> &ModulePath {
        &self.module
    }

    /// Import `path` into the current file, returning its local alias.
    pub fn import(&mut self, path: &ModulePath) -> String {
        self.imports.import(&self.namespaces, self.package_ns, path)
    }

    /// The qualified form of a type or constant reference: the bare name
    /// for same-package references, `alias.Name` (auto-importing the
    /// defining module) otherwise.
    pub fn qualified_name(&mut self, ty: &TypeRef) -> String {
        if ty.module == self.module {
            ty.name.clone()
        } else {
            let alias = self.import(&ty.module);
            format!("{alias}.{}", ty.name)
        }
    }

    /// The stable mangled helper name for `ty`.
    pub fn mangle(&mut self, ty: &TypeRef) -> String {
        self.mangler
            .mangle(&mut self.namespaces, self.package_ns, ty)
    }

    /// A fresh local variable name scoped to the current render.
    ///
    /// Probes `base`, `base2`, … against the render scope and everything
    /// the package has reserved, then reserves the winner in the render
    /// scope only.
    pub fn fresh(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut counter = 2u32;
        while self.namespaces.reserve(self.scratch, candidate.as_str()).is_err() {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        candidate
    }

    /// Resolve a schema source file to its generated module path.
    pub fn resolve_module(&self, schema_file: &str) -> Option<ModulePath> {
        self.resolver.module_path(schema_file)
    }
}
