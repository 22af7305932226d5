pub mod default_export;
pub mod duplicate_imports;
pub mod export_order;
pub mod import_order;
pub mod index_import;
pub mod layer_direction;
pub mod layer_public_api;
pub mod react_default_import;
pub mod shared_depth;

use crate::config::{RuleLevel, Severity};
use crate::layer::FileLocation;
use crate::specifier::{Import, ParsedSpecifier};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Static description of a rule, used for `[rules]` validation and `layer-guard rules`.
#[derive(Debug)]
pub struct RuleInfo {
    pub id: &'static str,
    pub default_level: RuleLevel,
    pub description: &'static str,
}

/// Every rule, per-import rules first in the order they are evaluated.
pub const RULES: &[RuleInfo] = &[
    RuleInfo {
        id: react_default_import::ID,
        default_level: RuleLevel::Error,
        description: "Forbid binding the default export of 'react'",
    },
    RuleInfo {
        id: layer_public_api::ID,
        default_level: RuleLevel::Error,
        description: "Forbid importing a layer root such as '@/shared'",
    },
    RuleInfo {
        id: index_import::ID,
        default_level: RuleLevel::Error,
        description: "Forbid importing index files",
    },
    RuleInfo {
        id: shared_depth::ID,
        default_level: RuleLevel::Error,
        description: "Limit how deep imports may reach into 'shared'",
    },
    RuleInfo {
        id: layer_direction::ID,
        default_level: RuleLevel::Error,
        description: "Forbid imports of higher layers and of sibling slices",
    },
    RuleInfo {
        id: duplicate_imports::ID,
        default_level: RuleLevel::Error,
        description: "Forbid importing the same module twice",
    },
    RuleInfo {
        id: default_export::ID,
        default_level: RuleLevel::Error,
        description: "Forbid 'export default' outside allowed entry points",
    },
    RuleInfo {
        id: import_order::ID,
        default_level: RuleLevel::Error,
        description: "Require imports in canonical group order",
    },
    RuleInfo {
        id: export_order::ID,
        default_level: RuleLevel::Error,
        description: "Require each run of re-exports sorted by module",
    },
];

pub fn rule_info(id: &str) -> Option<&'static RuleInfo> {
    RULES.iter().find(|r| r.id == id)
}

/// Where the file an import rule is being evaluated for sits in the layer tree.
pub struct FileContext {
    pub location: Option<FileLocation>,
}

/// A rule evaluated against one well-formed import at a time.
pub trait ImportRule: Send + Sync {
    fn id(&self) -> &'static str;

    /// Return the diagnostic message when `import` breaks the rule.
    fn check(
        &self,
        file: &FileContext,
        import: &Import,
        spec: &ParsedSpecifier,
    ) -> Option<String>;
}

/// A rule that looks at a whole file: its text and all of its imports.
pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;

    fn severity(&self) -> Severity;

    /// Scan a single file and return any violations found.
    fn check_file(&self, ctx: &ScanContext) -> Vec<Violation>;
}

/// The file currently being scanned.
pub struct ScanContext<'a> {
    pub file_path: &'a Path,
    pub content: &'a str,
    pub imports: &'a [Import],
}

impl ScanContext<'_> {
    /// The text of the given 1-based line.
    pub fn source_line(&self, line: usize) -> Option<String> {
        self.content
            .lines()
            .nth(line.saturating_sub(1))
            .map(String::from)
    }
}

/// Machine-actionable fix data for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub old: String,
    pub new: String,
}

/// A single violation reported for a file.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: String,
    pub suggest: Option<String>,
    pub source_line: Option<String>,
    pub fix: Option<Fix>,
}
