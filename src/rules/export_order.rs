use crate::config::Severity;
use crate::order::{is_sorted, render_block, GroupedImport};
use crate::rules::{Fix, Rule, ScanContext, Violation};
use crate::specifier::{Import, ImportKind};

pub const ID: &str = "export-order";

/// Flags runs of `export … from` statements that are not sorted by module.
///
/// A run is a sequence of re-exports with only whitespace between them; any
/// other statement or comment starts a new run. Each unsorted run is reported
/// once, with a fix replacing the run.
#[derive(Debug)]
pub struct ExportOrderRule {
    severity: Severity,
}

impl ExportOrderRule {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }

    fn check_run(&self, ctx: &ScanContext, run: &[&Import]) -> Option<Violation> {
        let mut order: Vec<usize> = (0..run.len()).collect();
        order.sort_by_key(|&i| {
            let spec = run[i].specifier.as_str();
            (spec.to_lowercase(), spec, i)
        });

        let grouped: Vec<GroupedImport> = order
            .iter()
            .map(|&index| GroupedImport {
                group: 0,
                index,
                import: run[index],
            })
            .collect();
        if is_sorted(&grouped) {
            return None;
        }

        let (pos, expected) = grouped.iter().enumerate().find(|(i, g)| g.index != *i)?;
        let found = run[pos];

        let start = run.first()?.span.as_ref()?.start;
        let end = run.last()?.span.as_ref()?.end;
        let fix = ctx.content.get(start..end).map(|old| Fix {
            old: old.to_string(),
            new: render_block(&grouped, ctx.content),
        });

        Some(Violation {
            rule_id: ID.to_string(),
            severity: self.severity,
            file: ctx.file_path.to_path_buf(),
            line: Some(found.line),
            column: Some(found.column),
            message: "Run autofix to sort these exports!".into(),
            suggest: Some(format!(
                "'{}' belongs before '{}'",
                expected.import.specifier, found.specifier
            )),
            source_line: ctx.source_line(found.line),
            fix,
        })
    }
}

impl Rule for ExportOrderRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn check_file(&self, ctx: &ScanContext) -> Vec<Violation> {
        runs(ctx)
            .iter()
            .filter(|run| run.len() > 1)
            .filter_map(|run| self.check_run(ctx, run))
            .collect()
    }
}

/// Maximal runs of re-exports separated by whitespace only.
fn runs<'a>(ctx: &ScanContext<'a>) -> Vec<Vec<&'a Import>> {
    let mut runs = Vec::new();
    let mut current: Vec<&Import> = Vec::new();

    for import in ctx.imports {
        let Some(span) = import.span.as_ref().filter(|_| import.kind == ImportKind::ReExport) else {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
            continue;
        };

        let adjacent = current
            .last()
            .and_then(|prev| prev.span.as_ref())
            .and_then(|prev| ctx.content.get(prev.end..span.start))
            .map_or(true, |gap| gap.trim().is_empty());
        if !adjacent {
            runs.push(std::mem::take(&mut current));
        }
        current.push(import);
    }

    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
