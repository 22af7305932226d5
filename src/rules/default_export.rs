use crate::config::{ConfigError, Severity};
use crate::extract::find_default_exports;
use crate::rules::{Rule, ScanContext, Violation};
use crate::scan::build_glob_set;
use globset::GlobSet;

pub const ID: &str = "no-default-export";

/// Flags `export default` outside the allow-listed entry points.
///
/// Frameworks like Next.js require pages, layouts and tool configs to use a
/// default export, so those paths are exempt.
#[derive(Debug)]
pub struct DefaultExportRule {
    severity: Severity,
    allowed: GlobSet,
}

impl DefaultExportRule {
    pub fn new(severity: Severity, allowed: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            severity,
            allowed: build_glob_set(allowed)?,
        })
    }
}

impl Rule for DefaultExportRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check_file(&self, ctx: &ScanContext) -> Vec<Violation> {
        if self.allowed.is_match(ctx.file_path) {
            return Vec::new();
        }

        find_default_exports(ctx.content)
            .into_iter()
            .map(|(line, column)| Violation {
                rule_id: ID.to_string(),
                severity: self.severity,
                file: ctx.file_path.to_path_buf(),
                line: Some(line),
                column: Some(column),
                message: "Prefer named exports.".into(),
                suggest: Some("Export the value by name and import it with braces".into()),
                source_line: ctx.source_line(line),
                fix: None,
            })
            .collect()
    }
}
