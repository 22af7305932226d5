use crate::layer::Layer;
use std::ops::Range;

/// How an import statement brings its specifier in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import ... from 'x'` or `import 'x'`
    Import,
    /// `export ... from 'x'`
    ReExport,
}

/// A single `{ imported as local }` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBinding {
    pub imported: String,
    pub local: Option<String>,
}

/// Names bound by an import statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<NamedBinding>,
}

impl Bindings {
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
    }

    /// True when the statement binds the module's default export, either as
    /// `import X from` or as `{ default as X }`.
    pub fn binds_default(&self) -> bool {
        self.default.is_some() || self.named.iter().any(|n| n.imported == "default")
    }
}

/// One import statement as the guard sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub specifier: String,
    pub kind: ImportKind,
    pub bindings: Bindings,
    /// `import 'x'` with nothing bound.
    pub side_effect: bool,
    /// Byte range of the whole statement in the source file, if known.
    pub span: Option<Range<usize>>,
    /// 1-based line of the statement.
    pub line: usize,
    /// 1-based column of the statement.
    pub column: usize,
}

impl Import {
    /// An `import { ... } from '<specifier>'` with no source position.
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            kind: ImportKind::Import,
            bindings: Bindings::default(),
            side_effect: false,
            span: None,
            line: 1,
            column: 1,
        }
    }

    /// An `import '<specifier>'` with no source position.
    pub fn side_effect(specifier: impl Into<String>) -> Self {
        Self {
            side_effect: true,
            ..Self::new(specifier)
        }
    }

    pub fn with_default(mut self, local: impl Into<String>) -> Self {
        self.bindings.default = Some(local.into());
        self
    }

    pub fn with_named(mut self, imported: impl Into<String>, local: Option<&str>) -> Self {
        self.bindings.named.push(NamedBinding {
            imported: imported.into(),
            local: local.map(String::from),
        });
        self
    }

    pub fn with_namespace(mut self, local: impl Into<String>) -> Self {
        self.bindings.namespace = Some(local.into());
        self
    }

    pub fn re_export(mut self) -> Self {
        self.kind = ImportKind::ReExport;
        self
    }

    /// Text used to match ordering patterns. Side-effect imports are
    /// prefixed with a NUL byte so only the side-effect group can claim them.
    pub fn sort_key_text(&self) -> String {
        if self.side_effect {
            format!("\u{0}{}", self.specifier)
        } else {
            self.specifier.clone()
        }
    }
}

const INDEX_FILES: [&str; 3] = ["index", "index.ts", "index.tsx"];

/// A specifier split into path segments, with its layer detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSpecifier<'a> {
    pub raw: &'a str,
    pub segments: Vec<&'a str>,
    /// Set when the specifier is rooted at `<alias>/<layer>`.
    pub layer: Option<Layer>,
    /// Segments below the layer root; empty for anything without a layer.
    pub below_layer: Vec<&'a str>,
}

impl<'a> ParsedSpecifier<'a> {
    /// Split `raw` into segments. Returns `None` for malformed specifiers,
    /// which callers treat as passing every rule.
    pub fn parse(raw: &'a str, alias: &str) -> Option<Self> {
        if raw.is_empty()
            || raw
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '\'' | '"' | '`' | '\\'))
        {
            return None;
        }

        let trimmed = if raw.len() > 1 {
            raw.strip_suffix('/').unwrap_or(raw)
        } else {
            raw
        };
        let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let segments: Vec<&str> = body.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        let (layer, below_layer) = match segments.split_first() {
            Some((root, rest)) if *root == alias && !rest.is_empty() => {
                match Layer::from_name(rest[0]) {
                    Some(layer) => (Some(layer), rest[1..].to_vec()),
                    None => (None, Vec::new()),
                }
            }
            _ => (None, Vec::new()),
        };

        Some(Self {
            raw,
            segments,
            layer,
            below_layer,
        })
    }

    /// `@/shared` with nothing below it: the layer's aggregation point.
    pub fn is_layer_root(&self) -> bool {
        self.layer.is_some() && self.below_layer.is_empty()
    }

    /// Last segment names an index file.
    pub fn has_index_suffix(&self) -> bool {
        self.segments.len() >= 2
            && self
                .segments
                .last()
                .map_or(false, |last| INDEX_FILES.contains(last))
    }

    /// Number of segments below the layer root.
    pub fn depth(&self) -> usize {
        self.below_layer.len()
    }

    /// First segment below the layer root of a sliced layer.
    pub fn slice(&self) -> Option<&'a str> {
        match self.layer {
            Some(layer) if layer.has_slices() => self.below_layer.first().copied(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParsedSpecifier<'_> {
        ParsedSpecifier::parse(raw, "@").unwrap()
    }

    #[test]
    fn detects_layer() {
        let p = parse("@/features/auth/ui/LoginForm");
        assert_eq!(p.layer, Some(Layer::Features));
        assert_eq!(p.below_layer, vec!["auth", "ui", "LoginForm"]);
        assert_eq!(p.slice(), Some("auth"));
        assert_eq!(p.depth(), 3);
    }

    #[test]
    fn layer_root_with_and_without_slash() {
        assert!(parse("@/widgets").is_layer_root());
        assert!(parse("@/widgets/").is_layer_root());
        assert!(!parse("@/widgets/header").is_layer_root());
    }

    #[test]
    fn unknown_alias_root_has_no_layer() {
        let p = parse("@/lib/date");
        assert_eq!(p.layer, None);
        assert!(!p.is_layer_root());
    }

    #[test]
    fn package_named_like_layer_is_not_a_layer() {
        assert_eq!(parse("shared").layer, None);
        assert_eq!(parse("features/x").layer, None);
    }

    #[test]
    fn custom_alias() {
        let p = ParsedSpecifier::parse("~/shared/ui/Button", "~").unwrap();
        assert_eq!(p.layer, Some(Layer::Shared));
        assert_eq!(ParsedSpecifier::parse("@/shared/ui", "~").unwrap().layer, None);
    }

    #[test]
    fn index_suffix() {
        assert!(parse("@/shared/ui/index").has_index_suffix());
        assert!(parse("./index.ts").has_index_suffix());
        assert!(parse("../button/index.tsx").has_index_suffix());
        assert!(!parse("index").has_index_suffix());
        assert!(!parse("@/shared/ui/indexer").has_index_suffix());
        assert!(!parse("./index.js").has_index_suffix());
    }

    #[test]
    fn relative_tokens_parse() {
        assert_eq!(parse("./").segments, vec!["."]);
        assert_eq!(parse("..").segments, vec![".."]);
        assert_eq!(parse("/abs/path").segments, vec!["abs", "path"]);
    }

    #[test]
    fn malformed_specifiers() {
        for raw in ["", "/", "a b", "@/shared//ui", "it's", "a\\b", "x\ty"] {
            assert!(ParsedSpecifier::parse(raw, "@").is_none(), "{raw:?} should be malformed");
        }
    }

    #[test]
    fn binds_default() {
        assert!(Import::new("react").with_default("React").bindings.binds_default());
        assert!(Import::new("react")
            .with_named("default", Some("R"))
            .bindings
            .binds_default());
        assert!(!Import::new("react")
            .with_named("useState", None)
            .bindings
            .binds_default());
        assert!(!Import::new("react")
            .with_namespace("React")
            .bindings
            .binds_default());
    }

    #[test]
    fn side_effect_sort_text_is_prefixed() {
        assert_eq!(Import::side_effect("./global.css").sort_key_text(), "\u{0}./global.css");
        assert_eq!(Import::new("react").sort_key_text(), "react");
    }
}
