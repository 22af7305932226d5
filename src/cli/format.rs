use crate::config::{Config, Severity};
use crate::rules::{Violation, RULES};
use crate::scan::ScanResult;
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Write;

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn counts(result: &ScanResult) -> (usize, usize) {
    let errors = result
        .violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count();
    (errors, result.violations.len() - errors)
}

/// Print violations grouped by file with ANSI colors.
pub fn print_pretty(result: &ScanResult) {
    let mut out = std::io::stdout();
    write_pretty(result, &mut out);
}

fn write_pretty(result: &ScanResult, out: &mut dyn Write) {
    if result.violations.is_empty() {
        let _ = writeln!(
            out,
            "\x1b[32m✓\x1b[0m No violations found ({} files scanned, {} rules loaded)",
            result.files_scanned, result.rules_loaded
        );
        return;
    }

    let mut by_file: BTreeMap<String, Vec<&Violation>> = BTreeMap::new();
    for v in &result.violations {
        by_file
            .entry(v.file.display().to_string())
            .or_default()
            .push(v);
    }

    for (file, violations) in &by_file {
        let _ = writeln!(out, "\n\x1b[4m{}\x1b[0m", file);
        for v in violations {
            let severity_str = match v.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarn \x1b[0m",
            };

            let location = format!("{}:{}", v.line.unwrap_or(1), v.column.unwrap_or(1));

            let _ = writeln!(
                out,
                "  \x1b[90m{:<8}\x1b[0m {} \x1b[90m{:<25}\x1b[0m {}",
                location, severity_str, v.rule_id, v.message
            );

            if let Some(ref source) = v.source_line {
                let _ = writeln!(out, "           \x1b[90m│\x1b[0m {}", source.trim());
            }

            if let Some(ref suggest) = v.suggest {
                let _ = writeln!(out, "           \x1b[90m└─\x1b[0m \x1b[36m{}\x1b[0m", suggest);
            }
        }
    }

    let (errors, warnings) = counts(result);

    let _ = writeln!(out);
    let _ = write!(out, "\x1b[1m");
    if errors > 0 {
        let _ = write!(out, "\x1b[31m{} error{}\x1b[0m\x1b[1m", errors, plural(errors));
    }
    if errors > 0 && warnings > 0 {
        let _ = write!(out, ", ");
    }
    if warnings > 0 {
        let _ = write!(out, "\x1b[33m{} warning{}\x1b[0m\x1b[1m", warnings, plural(warnings));
    }
    let _ = writeln!(
        out,
        " ({} files scanned, {} rules loaded)\x1b[0m",
        result.files_scanned, result.rules_loaded
    );

    let fixable = result.fixable();
    if fixable > 0 {
        let _ = writeln!(
            out,
            "\x1b[90mhint\x1b[0m: {} violation{} can be fixed with \x1b[1m--fix\x1b[0m",
            fixable,
            plural(fixable)
        );
    }
}

/// Print violations as structured JSON.
pub fn print_json(result: &ScanResult) {
    let mut out = std::io::stdout();
    write_json(result, &mut out);
}

fn write_json(result: &ScanResult, out: &mut dyn Write) {
    let (errors, warnings) = counts(result);
    let output = json!({
        "violations": result.violations,
        "summary": {
            "total": result.violations.len(),
            "errors": errors,
            "warnings": warnings,
            "fixable": result.fixable(),
            "files_scanned": result.files_scanned,
            "rules_loaded": result.rules_loaded,
        },
    });

    let text = serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string());
    let _ = writeln!(out, "{}", text);
}

/// Print violations in compact one-line-per-violation format.
/// Violations go to stdout; summary goes to stderr.
pub fn print_compact(result: &ScanResult) {
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    write_compact(result, &mut stdout, &mut stderr);
}

fn write_compact(result: &ScanResult, out: &mut dyn Write, err: &mut dyn Write) {
    for v in &result.violations {
        let severity = match v.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };

        let _ = writeln!(
            out,
            "{}:{}:{}: {}[{}] {}",
            v.file.display(),
            v.line.unwrap_or(1),
            v.column.unwrap_or(1),
            severity,
            v.rule_id,
            v.message
        );
    }

    write_summary_stderr(result, err);
}

/// Print violations as GitHub Actions workflow commands.
/// Violations go to stdout; summary goes to stderr.
pub fn print_github(result: &ScanResult) {
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    write_github(result, &mut stdout, &mut stderr);
}

fn write_github(result: &ScanResult, out: &mut dyn Write, err: &mut dyn Write) {
    for v in &result.violations {
        let level = match v.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };

        let mut props = format!("file={},line={}", v.file.display(), v.line.unwrap_or(1));
        if let Some(col) = v.column {
            props.push_str(&format!(",col={}", col));
        }
        props.push_str(&format!(",title={}", v.rule_id));

        let _ = writeln!(out, "::{} {}::{}", level, props, v.message);
    }

    write_summary_stderr(result, err);
}

fn write_summary_stderr(result: &ScanResult, err: &mut dyn Write) {
    let (errors, warnings) = counts(result);

    if errors > 0 || warnings > 0 {
        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(format!("{} error{}", errors, plural(errors)));
        }
        if warnings > 0 {
            parts.push(format!("{} warning{}", warnings, plural(warnings)));
        }
        let _ = writeln!(
            err,
            "{} ({} files scanned, {} rules loaded)",
            parts.join(", "),
            result.files_scanned,
            result.rules_loaded
        );
    } else {
        let _ = writeln!(
            err,
            "No violations found ({} files scanned, {} rules loaded)",
            result.files_scanned, result.rules_loaded
        );
    }
}

/// Print the rule table with each rule's effective level.
pub fn print_rules(config: &Config) {
    let mut out = std::io::stdout();
    write_rules(config, &mut out);
}

fn write_rules(config: &Config, out: &mut dyn Write) {
    for rule in RULES {
        let _ = writeln!(
            out,
            "  {:<25} {:<8} {}",
            rule.id,
            config.level(rule.id).as_str(),
            rule.description
        );
    }
}
