//! Import paths of generated and external modules.

use std::fmt;

/// Slash-separated import path of a module (`"example.org/api/color"`).
///
/// Ordered and hashable so registries can sort import blocks and key
/// lookup tables by path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModulePath(String);

impl ModulePath {
    /// Create a module path from its textual form.
    pub fn new(path: impl Into<String>) -> Self {
        ModulePath(path.into())
    }

    /// The textual form of the path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The natural short name of the module, used as the default local
    /// alias candidate.
    ///
    /// This is the final path segment sanitized to an identifier, with
    /// trailing major-version segments (`v2`, `v3`, …) skipped the way the
    /// target toolchain derives package names:
    ///
    /// ```
    /// use skein_ir::ModulePath;
    ///
    /// assert_eq!(ModulePath::new("example.org/api/color").short_name(), "color");
    /// assert_eq!(ModulePath::new("example.org/api/color/v2").short_name(), "color");
    /// assert_eq!(ModulePath::new("example.org/go-cmp").short_name(), "go_cmp");
    /// ```
    pub fn short_name(&self) -> String {
        let segment = self
            .0
            .split('/')
            .rev()
            .find(|s| !s.is_empty() && !is_version_segment(s))
            .unwrap_or("pkg");
        sanitize_identifier(segment)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModulePath {
    fn from(path: &str) -> Self {
        ModulePath::new(path)
    }
}

impl From<String> for ModulePath {
    fn from(path: String) -> Self {
        ModulePath::new(path)
    }
}

/// `v2`, `v10`, and other version suffixes are not package names.
fn is_version_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next() == Some('v') && segment.len() > 1 && chars.all(|c| c.is_ascii_digit())
}

/// Map a path segment onto identifier characters.
///
/// Non-identifier characters become `_`; a leading digit gets an `_`
/// prefix. An empty segment falls back to `pkg`.
fn sanitize_identifier(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        return "pkg".to_string();
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
