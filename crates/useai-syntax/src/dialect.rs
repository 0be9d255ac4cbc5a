//! Source dialects

use crate::SyntaxError;
use std::path::Path;

/// Supported source dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// TypeScript (`.ts`, `.mts`, `.cts`)
    #[default]
    TypeScript,
    /// TypeScript with JSX (`.tsx`)
    Tsx,
    /// JavaScript, parsed with the TSX grammar so JSX is accepted
    JavaScript,
}

impl Dialect {
    /// Get file extensions for this dialect
    #[inline]
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Dialect::TypeScript => &["ts", "mts", "cts"],
            Dialect::Tsx => &["tsx"],
            Dialect::JavaScript => &["js", "jsx", "mjs", "cjs"],
        }
    }

    /// Detect dialect from file extension
    #[inline]
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        [Dialect::TypeScript, Dialect::Tsx, Dialect::JavaScript]
            .into_iter()
            .find(|d| d.extensions().contains(&ext))
    }

    /// Detect dialect from a path's extension
    #[inline]
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect dialect from a path, failing on unknown extensions
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnsupportedDialect`] for unknown extensions.
    pub fn detect(path: &Path) -> Result<Self, SyntaxError> {
        Self::from_path(path)
            .ok_or_else(|| SyntaxError::UnsupportedDialect(path.display().to_string()))
    }

    /// Get human-readable name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
            Dialect::JavaScript => "javascript",
        }
    }

    /// Get tree-sitter language
    #[inline]
    #[must_use]
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx | Dialect::JavaScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_from_extension() {
        assert_eq!(Dialect::from_extension("ts"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_extension(".tsx"), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_extension("jsx"), Some(Dialect::JavaScript));
        assert_eq!(Dialect::from_extension("rs"), None);
    }

    #[test]
    fn dialect_from_path() {
        assert_eq!(
            Dialect::from_path(Path::new("app/index.tsx")),
            Some(Dialect::Tsx)
        );
        assert_eq!(Dialect::from_path(Path::new("Makefile")), None);
        assert!(matches!(
            Dialect::detect(Path::new("main.rs")),
            Err(SyntaxError::UnsupportedDialect(_))
        ));
    }
}
