use crate::config::Severity;
use crate::order::{is_sorted, render_block, GroupTable};
use crate::rules::{Fix, Rule, ScanContext, Violation};
use crate::specifier::{Import, ImportKind};

pub const ID: &str = "import-order";

/// Flags files whose imports are not in canonical group order.
/// Re-exports (`export … from`) are left to the export-order rule.
///
/// When the imports form one contiguous block (only whitespace between the
/// statements) the violation carries a fix replacing the whole block.
#[derive(Debug)]
pub struct ImportOrderRule {
    severity: Severity,
    table: GroupTable,
}

impl ImportOrderRule {
    pub fn new(severity: Severity, table: GroupTable) -> Self {
        Self { severity, table }
    }
}

impl Rule for ImportOrderRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check_file(&self, ctx: &ScanContext) -> Vec<Violation> {
        let imports: Vec<Import> = ctx
            .imports
            .iter()
            .filter(|i| i.kind == ImportKind::Import)
            .cloned()
            .collect();
        let grouped = self.table.group(&imports);
        if is_sorted(&grouped) {
            return Vec::new();
        }

        // First position holding the wrong import.
        let Some((pos, expected)) = grouped.iter().enumerate().find(|(i, g)| g.index != *i) else {
            return Vec::new();
        };
        let found = &imports[pos];

        let fix = block_range(&imports, ctx.content).map(|range| Fix {
            old: ctx.content[range].to_string(),
            new: render_block(&grouped, ctx.content),
        });

        vec![Violation {
            rule_id: ID.to_string(),
            severity: self.severity,
            file: ctx.file_path.to_path_buf(),
            line: Some(found.line),
            column: Some(found.column),
            message: "Run autofix to sort these imports!".into(),
            suggest: Some(format!(
                "'{}' belongs before '{}'",
                expected.import.specifier, found.specifier
            )),
            source_line: ctx.source_line(found.line),
            fix,
        }]
    }
}

/// Byte range from the first import to the end of the last one, if nothing
/// but whitespace sits between the statements.
fn block_range(imports: &[Import], content: &str) -> Option<std::ops::Range<usize>> {
    let mut spans = Vec::with_capacity(imports.len());
    for import in imports {
        spans.push(import.span.clone()?);
    }

    for pair in spans.windows(2) {
        let gap = content.get(pair[0].end..pair[1].start)?;
        if !gap.trim().is_empty() {
            return None;
        }
    }

    Some(spans.first()?.start..spans.last()?.end)
}
