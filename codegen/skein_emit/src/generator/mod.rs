//! The Declare/Write protocol.

use std::io;

use thiserror::Error;
use tracing::{debug, trace};

use skein_gosyn::{parse_fragment, CompileError};
use skein_ir::{DeclKind, Declaration, TypeRef, Value};
use skein_names::{ImportConflict, ImportRegistry};
use skein_template::{render, FuncTable, TemplateError};

use crate::bindings::builtin_table;
use crate::config::GeneratorConfig;
use crate::resolver::{ModuleResolver, PreResolved};
use crate::state::EmitState;

/// What a reservation conflict does to a `Declare` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// A conflict fails the call; the call's admissions are rolled back.
    Strict,
    /// A conflicting declaration is treated as already present and
    /// silently skipped; the rest of the fragment continues.
    Lenient,
}

/// Errors of the Declare/Write protocol.
///
/// Nothing is retried internally. Under [`ConflictPolicy::Lenient`] a
/// reservation conflict becomes a silent skip instead of
/// [`EmitError::Conflict`]; explicit-import conflicts are hard errors
/// under both policies.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("name `{key}` is already declared in this package")]
    Conflict { key: String },
    #[error(transparent)]
    Import(#[from] ImportConflict),
    #[error("sink write failed: {0}")]
    Sink(#[from] io::Error),
}

/// Emits one generated package, one file per [`Generator::write`] call.
///
/// Run-lifetime state (package namespace, mangler memo) persists across
/// files; file-lifetime state (import registry, pending buffer) resets at
/// every flush. Calls must be serialized: the generator is synchronous
/// and single-threaded by design, and parallel package generation takes
/// one generator per package.
pub struct Generator {
    config: GeneratorConfig,
    state: EmitState,
    funcs: FuncTable<EmitState>,
    pending: Vec<Declaration>,
}

impl Generator {
    /// A generator whose type descriptors are pre-resolved (carry
    /// `module` keys).
    pub fn new(config: GeneratorConfig) -> Self {
        Generator::with_resolver(config, Box::new(PreResolved))
    }

    /// A generator that resolves schema files through `resolver`.
    pub fn with_resolver(config: GeneratorConfig, resolver: Box<dyn ModuleResolver>) -> Self {
        let state = EmitState::new(config.module.clone(), resolver);
        Generator {
            config,
            state,
            funcs: builtin_table(),
            pending: Vec::new(),
        }
    }

    /// Merge an external helper generator (encoding, equality,
    /// serialization, …) into the template function table under `name`.
    pub fn register_helper(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut EmitState, &[Value]) -> Result<String, TemplateError> + 'static,
    ) {
        self.funcs.bind(name, f);
    }

    /// Render `template` against `data`, validate the fragment, and admit
    /// its declarations under the strict policy.
    ///
    /// A failing call is atomic with respect to name admission: every
    /// reservation and buffer entry it made is rolled back. Import
    /// aliases allocated as render side effects (a `typeref` to another
    /// module, say) remain registered; abandoning the whole file is the
    /// caller's decision.
    pub fn declare(&mut self, template: &str, data: &Value) -> Result<(), EmitError> {
        self.declare_with(template, data, ConflictPolicy::Strict)
    }

    /// Lenient [`Generator::declare`]: already-declared names are skipped
    /// without error, so idempotent "make sure this exists" templates can
    /// run once per schema item that needs them.
    pub fn ensure_declared(&mut self, template: &str, data: &Value) -> Result<(), EmitError> {
        self.declare_with(template, data, ConflictPolicy::Lenient)
    }

    /// Declare under an explicit conflict policy.
    pub fn declare_with(
        &mut self,
        template: &str,
        data: &Value,
        policy: ConflictPolicy,
    ) -> Result<(), EmitError> {
        self.state.begin_render();
        let fragment = render(template, data, &self.funcs, &mut self.state)?;
        trace!(bytes = fragment.len(), "rendered fragment");
        let decls = parse_fragment(&fragment)?;
        self.admit(decls, policy)
    }

    /// Admit validated declarations in source order.
    fn admit(&mut self, decls: Vec<Declaration>, policy: ConflictPolicy) -> Result<(), EmitError> {
        let pending_start = self.pending.len();
        let mut call_reserved: Vec<String> = Vec::new();

        for decl in decls {
            if decl.kind == DeclKind::Import {
                for spec in &decl.imports {
                    if let Err(conflict) = self.state.imports.add_spec(
                        &self.state.namespaces,
                        self.state.package_ns,
                        spec,
                    ) {
                        // Explicit imports cannot be skipped without
                        // changing fragment semantics: hard error under
                        // both policies.
                        self.rollback(&call_reserved, pending_start);
                        return Err(conflict.into());
                    }
                }
                continue;
            }

            let mut decl_reserved: Vec<String> = Vec::new();
            let mut conflict: Option<String> = None;
            for key in &decl.keys {
                let rendered = key.to_string();
                match self
                    .state
                    .namespaces
                    .reserve(self.state.package_ns, rendered.clone())
                {
                    Ok(()) => decl_reserved.push(rendered),
                    Err(_) => {
                        conflict = Some(rendered);
                        break;
                    }
                }
            }

            match conflict {
                None => {
                    call_reserved.extend(decl_reserved);
                    debug!(kind = ?decl.kind, keys = ?decl.keys, "admitted declaration");
                    self.pending.push(decl);
                }
                Some(key) => {
                    // The declaration is not admitted, so its partially
                    // reserved keys are released.
                    for k in &decl_reserved {
                        self.state.namespaces.forget(self.state.package_ns, k);
                    }
                    match policy {
                        ConflictPolicy::Lenient => {
                            debug!(key = %key, "already declared, skipping");
                        }
                        ConflictPolicy::Strict => {
                            self.rollback(&call_reserved, pending_start);
                            return Err(EmitError::Conflict { key });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Undo everything this call admitted.
    fn rollback(&mut self, reserved: &[String], pending_start: usize) {
        for key in reserved {
            self.state.namespaces.forget(self.state.package_ns, key);
        }
        self.pending.truncate(pending_start);
    }

    /// Flush the current file: banner, package header, import block, then
    /// every pending declaration in admission order, blank-line
    /// separated.
    ///
    /// On success the pending buffer and import registry reset and each
    /// configured re-entrant name becomes declarable again; every other
    /// reservation and the whole mangler memo persist. A sink error
    /// propagates verbatim and leaves the generator state untouched; the
    /// sink may hold a truncated file, and retry or cleanup belongs to
    /// the caller.
    pub fn write(&mut self, sink: &mut dyn io::Write) -> Result<(), EmitError> {
        let mut out = String::with_capacity(1024);
        out.push_str(&self.config.banner);
        out.push_str("\n\n");
        out.push_str("package ");
        out.push_str(&self.config.package_name);
        out.push('\n');
        if let Some(block) = self.state.imports.emit() {
            out.push('\n');
            out.push_str(&block);
            out.push('\n');
        }
        for decl in &self.pending {
            out.push('\n');
            out.push_str(decl.text.trim_end());
            out.push('\n');
        }

        sink.write_all(out.as_bytes())?;

        debug!(
            decls = self.pending.len(),
            imports = self.state.imports.len(),
            "flushed file"
        );
        self.pending.clear();
        self.state.imports = ImportRegistry::new();
        for name in &self.config.forgettable {
            self.state.namespaces.forget(self.state.package_ns, name);
        }
        Ok(())
    }

    /// Stable mangled helper name for `ty`, for callers that need one
    /// outside a template.
    pub fn mangle_type(&mut self, ty: &TypeRef) -> String {
        self.state.mangle(ty)
    }

    /// Package clause name of the generated files.
    pub fn package_name(&self) -> &str {
        &self.config.package_name
    }

    /// Number of declarations buffered for the current file.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests;
