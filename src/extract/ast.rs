use crate::specifier::{Bindings, Import, ImportKind, NamedBinding};
use std::path::Path;

/// Supported languages for AST parsing.
#[derive(Debug, Clone, Copy)]
pub enum Lang {
    Tsx,
    Typescript,
    Javascript,
}

/// Detect language from file extension.
pub fn detect_language(path: &Path) -> Option<Lang> {
    match path.extension()?.to_str()? {
        "tsx" => Some(Lang::Tsx),
        "ts" | "mts" | "cts" => Some(Lang::Typescript),
        "js" | "jsx" | "mjs" | "cjs" => Some(Lang::Javascript),
        _ => None,
    }
}

/// Parse a file into a tree-sitter syntax tree.
pub fn parse_file(path: &Path, content: &str) -> Option<tree_sitter::Tree> {
    let lang = detect_language(path)?;
    let mut parser = tree_sitter::Parser::new();
    let ts_lang: tree_sitter::Language = match lang {
        Lang::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        Lang::Typescript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Lang::Javascript => tree_sitter_javascript::LANGUAGE.into(),
    };
    parser.set_language(&ts_lang).ok()?;
    parser.parse(content, None)
}

/// Extract top-level imports and re-exports. `None` when the file type is
/// unknown, so the caller can fall back to text extraction.
pub fn extract_imports(path: &Path, content: &str) -> Option<Vec<Import>> {
    let tree = parse_file(path, content)?;
    let source = content.as_bytes();
    let root = tree.root_node();

    let mut imports = Vec::new();
    for i in 0..root.child_count() {
        let Some(node) = root.child(i) else { continue };
        let kind = match node.kind() {
            "import_statement" => ImportKind::Import,
            "export_statement" => ImportKind::ReExport,
            _ => continue,
        };

        let Some(specifier) = node
            .child_by_field_name("source")
            .and_then(|s| string_value(&s, source))
        else {
            continue;
        };

        let mut import = Import::new(specifier);
        import.kind = kind;
        import.bindings = match kind {
            ImportKind::Import => import_bindings(&node, source),
            ImportKind::ReExport => export_bindings(&node, source),
        };
        import.side_effect = kind == ImportKind::Import && !has_child_kind(&node, "import_clause");
        import.span = Some(node.byte_range());
        import.line = node.start_position().row + 1;
        import.column = node.start_position().column + 1;
        imports.push(import);
    }

    Some(imports)
}

fn string_value(node: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;
    Some(text.trim_matches(|c| c == '\'' || c == '"').to_string())
}

fn text(node: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    node.utf8_text(source).ok().map(String::from)
}

fn has_child_kind(node: &tree_sitter::Node, kind: &str) -> bool {
    (0..node.child_count()).any(|i| node.child(i).map_or(false, |c| c.kind() == kind))
}

fn import_bindings(node: &tree_sitter::Node, source: &[u8]) -> Bindings {
    let mut bindings = Bindings::default();

    for i in 0..node.child_count() {
        let Some(clause) = node.child(i) else { continue };
        if clause.kind() != "import_clause" {
            continue;
        }

        for j in 0..clause.named_child_count() {
            let Some(part) = clause.named_child(j) else { continue };
            match part.kind() {
                "identifier" => bindings.default = text(&part, source),
                "namespace_import" => {
                    bindings.namespace = (0..part.named_child_count())
                        .filter_map(|k| part.named_child(k))
                        .find(|n| n.kind() == "identifier")
                        .and_then(|n| text(&n, source));
                }
                "named_imports" => collect_specifiers(&part, source, "import_specifier", &mut bindings),
                _ => {}
            }
        }
    }

    bindings
}

fn export_bindings(node: &tree_sitter::Node, source: &[u8]) -> Bindings {
    let mut bindings = Bindings::default();

    for i in 0..node.named_child_count() {
        let Some(part) = node.named_child(i) else { continue };
        match part.kind() {
            "export_clause" => collect_specifiers(&part, source, "export_specifier", &mut bindings),
            "namespace_export" => {
                bindings.namespace = (0..part.named_child_count())
                    .filter_map(|k| part.named_child(k))
                    .last()
                    .and_then(|n| text(&n, source));
            }
            _ => {}
        }
    }

    bindings
}

fn collect_specifiers(
    list: &tree_sitter::Node,
    source: &[u8],
    kind: &str,
    bindings: &mut Bindings,
) {
    for i in 0..list.named_child_count() {
        let Some(spec) = list.named_child(i) else { continue };
        if spec.kind() != kind {
            continue;
        }
        let Some(imported) = spec
            .child_by_field_name("name")
            .and_then(|n| string_value(&n, source))
        else {
            continue;
        };
        let local = spec
            .child_by_field_name("alias")
            .and_then(|n| string_value(&n, source));
        bindings.named.push(NamedBinding { imported, local });
    }
}
