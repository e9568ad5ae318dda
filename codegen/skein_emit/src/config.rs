//! Generator configuration.

use skein_ir::ModulePath;

/// Banner written at the top of every generated file.
pub const DEFAULT_BANNER: &str = "// Code generated by skein. DO NOT EDIT.";

/// Explicit configuration for one generated package.
///
/// Passed by value into [`crate::Generator::new`]; there is no ambient or
/// process-wide generation state.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Package clause name written into every output file.
    pub package_name: String,
    /// Import path of the generated package, compared against type
    /// descriptors to decide when a reference needs an import.
    pub module: ModulePath,
    /// First line of every output file.
    pub banner: String,
    /// Names that may legally be redeclared once per output file.
    ///
    /// The target language's file-scoped initializer (`init`) is the one
    /// such name for Go; other targets may configure more, or none.
    pub forgettable: Vec<String>,
}

impl GeneratorConfig {
    /// Configuration with the default banner and the `init` exemption.
    pub fn new(package_name: impl Into<String>, module: impl Into<ModulePath>) -> Self {
        GeneratorConfig {
            package_name: package_name.into(),
            module: module.into(),
            banner: DEFAULT_BANNER.to_string(),
            forgettable: vec!["init".to_string()],
        }
    }

    /// Replace the generated-file banner.
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = banner.into();
        self
    }

    /// Replace the set of re-entrant names.
    pub fn with_forgettable(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.forgettable = names.into_iter().collect();
        self
    }
}
