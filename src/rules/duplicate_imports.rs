use crate::config::Severity;
use crate::rules::{Rule, ScanContext, Violation};
use crate::specifier::ImportKind;
use std::collections::HashSet;

pub const ID: &str = "no-duplicate-imports";

/// Flags a second `import` statement for a module that was already imported.
///
/// Re-exports are not counted; `import` followed by `export ... from` of the
/// same module is allowed.
#[derive(Debug)]
pub struct DuplicateImportsRule {
    severity: Severity,
}

impl DuplicateImportsRule {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }
}

impl Rule for DuplicateImportsRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check_file(&self, ctx: &ScanContext) -> Vec<Violation> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut violations = Vec::new();

        for import in ctx.imports.iter().filter(|i| i.kind == ImportKind::Import) {
            if seen.insert(import.specifier.as_str()) {
                continue;
            }
            violations.push(Violation {
                rule_id: ID.to_string(),
                severity: self.severity,
                file: ctx.file_path.to_path_buf(),
                line: Some(import.line),
                column: Some(import.column),
                message: format!("'{}' import is duplicated.", import.specifier),
                suggest: Some("Merge the bindings into the first import statement".into()),
                source_line: ctx.source_line(import.line),
                fix: None,
            });
        }

        violations
    }
}
