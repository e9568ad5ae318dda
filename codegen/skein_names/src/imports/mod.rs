//! Per-file import tracking and alias assignment.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use skein_ir::{ImportSpec, ModulePath};

use crate::{NamespaceArena, NamespaceId};

/// An explicit import could not be merged without changing its meaning.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ImportConflict {
    /// Two different module paths contend for one alias.
    #[error("import alias `{alias}` already refers to `{existing}`, cannot alias `{incoming}`")]
    AliasTaken {
        alias: String,
        existing: String,
        incoming: String,
    },
    /// One module path was imported under two different aliases.
    #[error("module `{path}` already imported as `{existing}`, cannot re-alias as `{incoming}`")]
    Realiased {
        path: String,
        existing: String,
        incoming: String,
    },
    /// The alias collides with a name declared in the package.
    #[error("import alias `{alias}` collides with a package-level declaration")]
    ShadowsDeclaration { alias: String },
}

struct Entry {
    path: ModulePath,
    alias: String,
    /// Alias was written by the fragment author (or is `_`/`.`), so it is
    /// printed even when it equals the natural short name.
    explicit: bool,
}

/// Tracks the modules one output file references and their local aliases.
///
/// Scoped to a single output file: created empty when a file begins and
/// discarded at flush. Aliases are file-local and never reserved in the
/// package namespace, but candidate probing consults the namespace so an
/// alias cannot shadow a package-level declaration.
pub struct ImportRegistry {
    entries: Vec<Entry>,
    /// path text → index into `entries`.
    by_path: FxHashMap<String, usize>,
    /// alias → path text, for collision checks. Side-effect (`_`) and
    /// dot imports are exempt: any number of them is legal.
    by_alias: FxHashMap<String, String>,
}

impl ImportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ImportRegistry {
            entries: Vec::new(),
            by_path: FxHashMap::default(),
            by_alias: FxHashMap::default(),
        }
    }

    /// Number of imported modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no module has been imported yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The alias assigned to `path`, if it is imported.
    pub fn alias_of(&self, path: &ModulePath) -> Option<&str> {
        self.by_path
            .get(path.as_str())
            .map(|&i| self.entries[i].alias.as_str())
    }

    /// Import `path`, assigning a collision-free local alias.
    ///
    /// Idempotent per file: re-importing a known path returns its existing
    /// alias. Otherwise the natural short name is probed against this
    /// file's aliases and the package namespace, with `<base>2`, `<base>3`,
    /// … fallbacks until a free candidate is found.
    pub fn import(
        &mut self,
        arena: &NamespaceArena,
        package_ns: NamespaceId,
        path: &ModulePath,
    ) -> String {
        if let Some(&i) = self.by_path.get(path.as_str()) {
            return self.entries[i].alias.clone();
        }

        let base = path.short_name();
        let mut candidate = base.clone();
        let mut counter = 2u32;
        while self.by_alias.contains_key(&candidate)
            || arena.is_reserved(package_ns, &candidate)
        {
            candidate = format!("{base}{counter}");
            counter += 1;
        }

        debug!(path = %path, alias = %candidate, "imported module");
        self.insert(path.clone(), candidate.clone(), candidate != base);
        candidate
    }

    /// Merge an explicit import directive written out by a fragment.
    ///
    /// Unlike [`ImportRegistry::import`], nothing here may be renamed: the
    /// fragment's code already refers to the alias it wrote. Any collision
    /// is a hard error regardless of the caller's conflict policy.
    pub fn add_spec(
        &mut self,
        arena: &NamespaceArena,
        package_ns: NamespaceId,
        spec: &ImportSpec,
    ) -> Result<(), ImportConflict> {
        let alias = spec
            .alias
            .clone()
            .unwrap_or_else(|| spec.path.short_name());
        let exempt = alias == "_" || alias == ".";

        if let Some(&i) = self.by_path.get(spec.path.as_str()) {
            let existing = &self.entries[i];
            if existing.alias == alias {
                return Ok(());
            }
            return Err(ImportConflict::Realiased {
                path: spec.path.as_str().to_string(),
                existing: existing.alias.clone(),
                incoming: alias,
            });
        }

        if !exempt {
            if let Some(existing) = self.by_alias.get(&alias) {
                return Err(ImportConflict::AliasTaken {
                    alias,
                    existing: existing.clone(),
                    incoming: spec.path.as_str().to_string(),
                });
            }
            if arena.is_reserved(package_ns, &alias) {
                return Err(ImportConflict::ShadowsDeclaration { alias });
            }
        }

        debug!(path = %spec.path, alias = %alias, "merged explicit import");
        let explicit = spec.alias.is_some();
        self.insert(spec.path.clone(), alias, explicit);
        Ok(())
    }

    fn insert(&mut self, path: ModulePath, alias: String, explicit: bool) {
        self.by_path.insert(path.as_str().to_string(), self.entries.len());
        if alias != "_" && alias != "." {
            self.by_alias.insert(alias.clone(), path.as_str().to_string());
        }
        self.entries.push(Entry {
            path,
            alias,
            explicit,
        });
    }

    /// The canonical grouped import block for the current file, or `None`
    /// when nothing was imported.
    ///
    /// Entries are sorted by module path so regenerated files are
    /// byte-stable regardless of reference order. Aliases equal to the
    /// module's natural short name are omitted unless written explicitly.
    pub fn emit(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let mut sorted: Vec<&Entry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        let mut block = String::from("import (\n");
        for entry in sorted {
            if entry.explicit || entry.alias != entry.path.short_name() {
                let _ = writeln!(block, "\t{} \"{}\"", entry.alias, entry.path);
            } else {
                let _ = writeln!(block, "\t\"{}\"", entry.path);
            }
        }
        block.push(')');
        Some(block)
    }
}

impl Default for ImportRegistry {
    fn default() -> Self {
        ImportRegistry::new()
    }
}
