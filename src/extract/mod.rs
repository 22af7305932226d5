//! Import extraction from TypeScript/JavaScript source text.
//!
//! The default extractor is regex based and understands top-level
//! `import`/`export ... from` statements, including clauses spread over
//! several lines. With the `ast` feature, files with a known extension are
//! parsed with tree-sitter instead.

#[cfg(feature = "ast")]
pub mod ast;

use crate::specifier::{Bindings, Import, ImportKind, NamedBinding};
use regex::Regex;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

static STATEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r#"(?m)^[ \t]*(?P<stmt>(?P<kw>import|export)\s+(?:type\s+)?(?P<clause>(?:[\w$]+[ \t]*,[ \t]*)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\}|[\w$]+))\s*from\s*['"](?P<spec>[^'"\n]*)['"][ \t]*;?|import\s*['"](?P<side>[^'"\n]*)['"][ \t]*;?)"#,
    )
    .expect("valid regex")
});

static DEFAULT_EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r"(?m)^[ \t]*(?P<stmt>export\s+default\b|export\s*\{[^}]*\bas\s+default\b[^}]*\}[ \t]*(?P<from>from)?)",
    )
    .expect("valid regex")
});

/// Extract the imports of a file, picking the best extractor available for
/// its extension.
pub fn extract_imports(path: &Path, content: &str) -> Vec<Import> {
    #[cfg(feature = "ast")]
    {
        if let Some(imports) = ast::extract_imports(path, content) {
            return imports;
        }
    }
    #[cfg(not(feature = "ast"))]
    let _ = path;

    extract_imports_text(content)
}

/// Regex based extraction over raw source text. Statements starting inside
/// block comments or template literals are skipped.
pub fn extract_imports_text(content: &str) -> Vec<Import> {
    let inert = inert_ranges(content);
    STATEMENT_RE
        .captures_iter(content)
        .filter_map(|cap| {
            let stmt = cap.name("stmt")?;
            if is_inert(&inert, stmt.start()) {
                return None;
            }
            let (line, column) = line_col(content, stmt.start());

            let mut import = if let Some(side) = cap.name("side") {
                Import::side_effect(side.as_str())
            } else {
                let spec = cap.name("spec")?.as_str();
                let kind = match cap.name("kw").map(|m| m.as_str()) {
                    Some("export") => ImportKind::ReExport,
                    _ => ImportKind::Import,
                };
                let clause = cap.name("clause").map_or("", |m| m.as_str());
                Import {
                    kind,
                    bindings: parse_clause(clause),
                    ..Import::new(spec)
                }
            };

            import.span = Some(stmt.range());
            import.line = line;
            import.column = column;
            Some(import)
        })
        .collect()
}

/// Positions (line, column) of every default export in the file.
pub fn find_default_exports(content: &str) -> Vec<(usize, usize)> {
    let inert = inert_ranges(content);
    DEFAULT_EXPORT_RE
        .captures_iter(content)
        .filter(|cap| cap.name("from").is_none())
        .filter_map(|cap| cap.name("stmt"))
        .filter(|m| !is_inert(&inert, m.start()))
        .map(|m| line_col(content, m.start()))
        .collect()
}

/// Byte ranges of block comments and template literals.
///
/// String literals and line comments are stepped over so that quotes and
/// slashes inside them do not open a range. Regex literals are not
/// recognized.
fn inert_ranges(content: &str) -> Vec<Range<usize>> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = content[i..].find('\n').map_or(len, |nl| i + nl);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = content[i + 2..].find("*/").map_or(len, |p| i + 2 + p + 2);
                ranges.push(i..end);
                i = end;
            }
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < len && bytes[i] != quote && bytes[i] != b'\n' {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i += 1;
            }
            b'`' => {
                let start = i;
                i += 1;
                while i < len && bytes[i] != b'`' {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i = (i + 1).min(len);
                ranges.push(start..i);
            }
            _ => i += 1,
        }
    }

    ranges
}

fn is_inert(ranges: &[Range<usize>], offset: usize) -> bool {
    ranges.iter().any(|r| r.contains(&offset))
}

/// Split an import clause like `React, { useState, type FC as F }` or
/// `* as ns` into bindings.
fn parse_clause(clause: &str) -> Bindings {
    let mut bindings = Bindings::default();

    let (head, braces) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{}{}", &clause[..open], &clause[close + 1..]),
            &clause[open + 1..close],
        ),
        _ => (clause.to_string(), ""),
    };

    for item in braces.split(',') {
        let mut tokens: Vec<&str> = item.split_whitespace().collect();
        if tokens.first() == Some(&"type") && tokens.len() > 1 {
            tokens.remove(0);
        }
        match tokens.as_slice() {
            [imported] => bindings.named.push(NamedBinding {
                imported: imported.to_string(),
                local: None,
            }),
            [imported, "as", local] => bindings.named.push(NamedBinding {
                imported: imported.to_string(),
                local: Some(local.to_string()),
            }),
            _ => {}
        }
    }

    for part in head.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(rest) = part.strip_prefix('*') {
            let local = rest.trim().strip_prefix("as").map(str::trim).unwrap_or("");
            if !local.is_empty() {
                bindings.namespace = Some(local.to_string());
            }
        } else {
            bindings.default = Some(part.to_string());
        }
    }

    bindings
}

/// 1-based line and column of a byte offset.
pub fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => offset - nl,
        None => offset + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(content: &str) -> Vec<String> {
        extract_imports_text(content)
            .into_iter()
            .map(|i| i.specifier)
            .collect()
    }

    #[test]
    fn default_import() {
        let imports = extract_imports_text("import React from 'react';\n");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "react");
        assert_eq!(imports[0].bindings.default.as_deref(), Some("React"));
        assert!(!imports[0].side_effect);
        assert_eq!(imports[0].kind, ImportKind::Import);
    }

    #[test]
    fn default_and_named() {
        let imports = extract_imports_text(r#"import React, { useState, useEffect as effect } from "react";"#);
        let b = &imports[0].bindings;
        assert_eq!(b.default.as_deref(), Some("React"));
        assert_eq!(b.named.len(), 2);
        assert_eq!(b.named[1].imported, "useEffect");
        assert_eq!(b.named[1].local.as_deref(), Some("effect"));
    }

    #[test]
    fn namespace_import() {
        let imports = extract_imports_text("import * as React from 'react'");
        assert_eq!(imports[0].bindings.namespace.as_deref(), Some("React"));
        assert!(!imports[0].bindings.binds_default());
    }

    #[test]
    fn default_alias_in_braces() {
        let imports = extract_imports_text("import { default as R } from 'react';");
        assert!(imports[0].bindings.binds_default());
    }

    #[test]
    fn type_imports() {
        let imports = extract_imports_text(
            "import type { FC } from 'react';\nimport { type ReactNode, useMemo } from 'react';",
        );
        assert_eq!(imports[0].bindings.named[0].imported, "FC");
        assert_eq!(imports[1].bindings.named[0].imported, "ReactNode");
        assert_eq!(imports[1].bindings.named[1].imported, "useMemo");
    }

    #[test]
    fn side_effect_import() {
        let imports = extract_imports_text("import './globals.css';\nimport \"@/shared/styles/reset\"");
        assert!(imports.iter().all(|i| i.side_effect));
        assert_eq!(imports[1].specifier, "@/shared/styles/reset");
    }

    #[test]
    fn multi_line_clause() {
        let content = "import {\n  Button,\n  Input,\n} from '@/shared/ui/index';\nconst x = 1;\n";
        let imports = extract_imports_text(content);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].bindings.named.len(), 2);
        assert_eq!(imports[0].line, 1);
        let span = imports[0].span.clone().unwrap();
        assert!(content[span].ends_with("'@/shared/ui/index';"));
    }

    #[test]
    fn re_exports() {
        let imports = extract_imports_text(
            "export { default } from 'react';\nexport * from './model';\nexport * as api from './api';",
        );
        assert_eq!(imports.len(), 3);
        assert!(imports.iter().all(|i| i.kind == ImportKind::ReExport));
        assert!(imports[0].bindings.binds_default());
        assert!(imports[1].bindings.is_empty());
        assert!(!imports[1].side_effect);
        assert_eq!(imports[2].bindings.namespace.as_deref(), Some("api"));
    }

    #[test]
    fn ignores_non_import_code() {
        let content = r#"
// import fake from 'commented';
export const value = compute(1, 2);
const lazy = import('./dynamic');
export function from() {}
const s = "import x from 'y'";
"#;
        assert!(specs(content).is_empty());
    }

    #[test]
    fn declarations_do_not_swallow_following_imports() {
        let content = "export enum Status { Idle, Busy }\nimport { api } from '@/shared/api/client';\n";
        let imports = extract_imports_text(content);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].kind, ImportKind::Import);
        assert_eq!(imports[0].line, 2);
    }

    #[test]
    fn positions() {
        let content = "'use client';\n\n  import { a } from './a';\n";
        let imports = extract_imports_text(content);
        assert_eq!(imports[0].line, 3);
        assert_eq!(imports[0].column, 3);
    }

    #[test]
    fn keeps_source_order_and_duplicates() {
        let content = "import a from './a';\nimport 'x';\nimport b from './a';\n";
        assert_eq!(specs(content), vec!["./a", "x", "./a"]);
    }

    #[test]
    fn default_exports() {
        let content = "const A = () => null;\nexport default A;\n";
        assert_eq!(find_default_exports(content), vec![(2, 1)]);
        assert_eq!(find_default_exports("export { A as default };"), vec![(1, 1)]);
        assert!(find_default_exports("export { default } from './A';").is_empty());
        assert!(find_default_exports("export { A as default } from './A';").is_empty());
        assert!(find_default_exports("export const defaultValue = 1;").is_empty());
    }

    #[test]
    fn block_comments_and_templates_are_skipped() {
        let content = "/**\nimport React from 'react';\nexport default React;\n*/\nimport { a } from './a';\nconst doc = `\nimport b from './b';\n`;\nconst s = '/* not a comment';\nimport { c } from './c';\n";
        assert_eq!(specs(content), vec!["./a", "./c"]);
        assert!(find_default_exports(content).is_empty());
    }

    #[test]
    fn inert_ranges_span_comments_and_templates() {
        let content = "a /* x */ b `y` 'c//d' // e `f`\ng";
        let ranges = inert_ranges(content);
        assert_eq!(ranges, vec![2..9, 12..15]);
    }

    #[test]
    fn line_col_offsets() {
        let content = "ab\ncd";
        assert_eq!(line_col(content, 0), (1, 1));
        assert_eq!(line_col(content, 1), (1, 2));
        assert_eq!(line_col(content, 3), (2, 1));
        assert_eq!(line_col(content, 4), (2, 2));
    }
}
