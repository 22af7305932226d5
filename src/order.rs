//! Canonical import ordering.
//!
//! Imports are bucketed by an ordered table of groups; the first group with a
//! matching pattern claims the import. Within a group the input order is kept,
//! except that members matching one of the group's `last` patterns (the bare
//! `.`, `./`, `..`, `../` forms in the default table) move behind the rest.

use crate::config::{ConfigError, GroupDef};
use crate::layer::Layer;
use crate::specifier::{Import, ParsedSpecifier};
use regex::Regex;

/// One bucket of the ordering table.
#[derive(Debug, Clone)]
pub struct ImportGroup {
    pub name: String,
    patterns: Vec<Regex>,
    last: Vec<Regex>,
}

impl ImportGroup {
    fn new(name: &str, patterns: &[&str], last: &[&str]) -> Result<Self, ConfigError> {
        Ok(Self {
            name: name.to_string(),
            patterns: compile(name, patterns)?,
            last: compile(name, last)?,
        })
    }

    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    fn is_trailing(&self, text: &str) -> bool {
        self.last.iter().any(|re| re.is_match(text))
    }
}

fn compile<S: AsRef<str>>(group: &str, patterns: &[S]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|source| ConfigError::InvalidPattern {
                group: group.to_string(),
                pattern: p.as_ref().to_string(),
                source,
            })
        })
        .collect()
}

/// Where an import lands in the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupKey {
    pub group: usize,
    pub trailing: bool,
}

/// An import together with the group it was sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedImport<'a> {
    pub group: usize,
    /// Position of the import in the input list.
    pub index: usize,
    pub import: &'a Import,
}

/// Ordered, non-empty list of import groups.
#[derive(Debug, Clone)]
pub struct GroupTable {
    alias: String,
    groups: Vec<ImportGroup>,
}

impl GroupTable {
    /// The ten-group table: packages, the four lower layers, other internal
    /// aliases, side-effect imports, parent imports, sibling imports, styles.
    pub fn standard(alias: &str) -> Result<Self, ConfigError> {
        let a = regex::escape(alias);
        let mut groups = vec![ImportGroup::new("packages", &["^react", r"^@?\w"], &[])?];

        for layer in Layer::ALL.into_iter().filter(|l| *l != Layer::App) {
            let pattern = format!("^({}/{})(/.*|$)", a, layer);
            groups.push(ImportGroup::new(layer.as_str(), &[pattern.as_str()], &[])?);
        }

        let internal = format!("^({}|components)(/.*|$)", a);
        groups.push(ImportGroup::new("internal", &[internal.as_str()], &[])?);
        groups.push(ImportGroup::new("side-effect", &[r"^\x00"], &[])?);
        groups.push(ImportGroup::new("parent", &[r"^\.\."], &[r"^\.\./?$"])?);
        groups.push(ImportGroup::new("relative", &[r"^\."], &[r"^\./?$"])?);
        groups.push(ImportGroup::new("styles", &[r"^.+\.?(css)$"], &[])?);

        Ok(Self {
            alias: alias.to_string(),
            groups,
        })
    }

    /// Build a table from `[[order.group]]` entries.
    pub fn from_defs(alias: &str, defs: &[GroupDef]) -> Result<Self, ConfigError> {
        if defs.is_empty() {
            return Err(ConfigError::EmptyGroupTable);
        }

        let mut groups = Vec::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            let name = def.name.clone().unwrap_or_else(|| format!("#{}", i));
            if def.patterns.is_empty() {
                return Err(ConfigError::EmptyGroup(name));
            }
            groups.push(ImportGroup {
                patterns: compile(&name, &def.patterns)?,
                last: compile(&name, &def.last)?,
                name,
            });
        }

        Ok(Self {
            alias: alias.to_string(),
            groups,
        })
    }

    pub fn groups(&self) -> &[ImportGroup] {
        &self.groups
    }

    /// Index of the implicit group for malformed and unmatched specifiers.
    pub fn terminal_group(&self) -> usize {
        self.groups.len()
    }

    pub fn classify(&self, import: &Import) -> GroupKey {
        let terminal = GroupKey {
            group: self.terminal_group(),
            trailing: false,
        };

        if ParsedSpecifier::parse(&import.specifier, &self.alias).is_none() {
            return terminal;
        }

        let text = import.sort_key_text();
        self.groups
            .iter()
            .position(|g| g.matches(&text))
            .map_or(terminal, |group| GroupKey {
                group,
                trailing: self.groups[group].is_trailing(&text),
            })
    }

    /// Stable sort of `imports` into canonical order.
    pub fn group<'a>(&self, imports: &'a [Import]) -> Vec<GroupedImport<'a>> {
        let mut keyed: Vec<(GroupKey, usize)> = imports
            .iter()
            .enumerate()
            .map(|(i, import)| (self.classify(import), i))
            .collect();
        keyed.sort_by_key(|(key, i)| (*key, *i));

        keyed
            .into_iter()
            .map(|(key, index)| GroupedImport {
                group: key.group,
                index,
                import: &imports[index],
            })
            .collect()
    }
}

/// True when `grouped` keeps every import at its input position.
pub fn is_sorted(grouped: &[GroupedImport]) -> bool {
    grouped.iter().enumerate().all(|(i, g)| g.index == i)
}

/// Render the grouped imports as a block: one statement per line, groups
/// separated by a blank line.
///
/// Statements are copied from `source` through their spans; imports without
/// a span are written as `import '<specifier>';`.
pub fn render_block(grouped: &[GroupedImport], source: &str) -> String {
    let mut out = String::new();
    let mut previous: Option<usize> = None;

    for g in grouped {
        if let Some(prev) = previous {
            out.push('\n');
            if prev != g.group {
                out.push('\n');
            }
        }
        previous = Some(g.group);

        let statement = g
            .import
            .span
            .as_ref()
            .and_then(|span| source.get(span.clone()));
        match statement {
            Some(text) => out.push_str(text.trim()),
            None => out.push_str(&format!("import '{}';", g.import.specifier)),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GroupTable {
        GroupTable::standard("@").unwrap()
    }

    fn order(specifiers: &[&str]) -> Vec<String> {
        let imports: Vec<Import> = specifiers.iter().map(|s| Import::new(*s)).collect();
        table()
            .group(&imports)
            .iter()
            .map(|g| g.import.specifier.clone())
            .collect()
    }

    fn group_of(import: Import) -> usize {
        table().classify(&import).group
    }

    #[test]
    fn standard_table_has_ten_groups() {
        let t = table();
        let names: Vec<&str> = t.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "packages",
                "widgets",
                "features",
                "entities",
                "shared",
                "internal",
                "side-effect",
                "parent",
                "relative",
                "styles"
            ]
        );
    }

    #[test]
    fn classification() {
        assert_eq!(group_of(Import::new("react")), 0);
        assert_eq!(group_of(Import::new("react-dom/client")), 0);
        assert_eq!(group_of(Import::new("@tanstack/react-query")), 0);
        assert_eq!(group_of(Import::new("next/link")), 0);
        assert_eq!(group_of(Import::new("@/widgets/header/ui/Header")), 1);
        assert_eq!(group_of(Import::new("@/features")), 2);
        assert_eq!(group_of(Import::new("@/entities/user/model/types")), 3);
        assert_eq!(group_of(Import::new("@/shared/ui/Button")), 4);
        assert_eq!(group_of(Import::new("@/app/providers/Root")), 5);
        assert_eq!(group_of(Import::new("@/lib/date")), 5);
        assert_eq!(group_of(Import::side_effect("./global.css")), 6);
        assert_eq!(group_of(Import::side_effect("@/shared/styles/reset")), 6);
        assert_eq!(group_of(Import::new("../model/store")), 7);
        assert_eq!(group_of(Import::new("..")), 7);
        assert_eq!(group_of(Import::new("./Button.styles")), 8);
        assert_eq!(group_of(Import::new("./")), 8);
    }

    #[test]
    fn sharedish_alias_paths_are_not_layers() {
        // "@/sharedkit" is not the shared layer, only an internal alias.
        assert_eq!(group_of(Import::new("@/sharedkit/x")), 5);
    }

    #[test]
    fn malformed_goes_to_terminal_group() {
        let t = table();
        assert_eq!(t.classify(&Import::new("a b")).group, t.terminal_group());
        assert_eq!(t.classify(&Import::new("")).group, 10);
    }

    #[test]
    fn unmatched_goes_to_terminal_group_in_input_order() {
        let order = order(&["$weird", "react", "#internal"]);
        assert_eq!(order, vec!["react", "$weird", "#internal"]);
    }

    #[test]
    fn stable_within_group() {
        assert_eq!(order(&["./b", "react", "./a"]), vec!["react", "./b", "./a"]);
    }

    #[test]
    fn bare_relative_sorts_last() {
        assert_eq!(order(&["./x", "./"]), vec!["./x", "./"]);
        assert_eq!(order(&["./", "./x"]), vec!["./x", "./"]);
        assert_eq!(order(&["..", "../a", "../"]), vec!["../a", "..", "../"]);
    }

    #[test]
    fn deeper_relative_paths_keep_input_order() {
        assert_eq!(order(&["./c", "./a/b", "."]), vec!["./c", "./a/b", "."]);
    }

    #[test]
    fn full_fsd_order() {
        let input = [
            "./styles.module.css",
            "../lib/format",
            "@/shared/ui/Button",
            "@/entities/user/model/types",
            "@/features/auth/ui/LoginForm",
            "@/widgets/header/ui/Header",
            "@/config/env",
            "next/image",
            "react",
        ];
        assert_eq!(
            order(&input),
            vec![
                "next/image",
                "react",
                "@/widgets/header/ui/Header",
                "@/features/auth/ui/LoginForm",
                "@/entities/user/model/types",
                "@/shared/ui/Button",
                "@/config/env",
                "../lib/format",
                "./styles.module.css",
            ]
        );
    }

    #[test]
    fn idempotent() {
        let input = ["./", "@/shared/x/y", "./a", "react", "..", "../b", "zod", "@/widgets/w/ui/W"];
        let once = order(&input);
        let refs: Vec<&str> = once.iter().map(String::as_str).collect();
        assert_eq!(order(&refs), once);
    }

    #[test]
    fn is_sorted_detects_moves() {
        let t = table();
        let sorted = vec![Import::new("react"), Import::new("./a")];
        assert!(is_sorted(&t.group(&sorted)));
        let unsorted = vec![Import::new("./a"), Import::new("react")];
        assert!(!is_sorted(&t.group(&unsorted)));
    }

    #[test]
    fn render_separates_groups_with_blank_lines() {
        let t = table();
        let imports = vec![
            Import::new("./a"),
            Import::new("react"),
            Import::new("zod"),
            Import::new("@/shared/ui/Button"),
        ];
        let block = render_block(&t.group(&imports), "");
        assert_eq!(
            block,
            "import 'react';\nimport 'zod';\n\nimport '@/shared/ui/Button';\n\nimport './a';"
        );
    }

    #[test]
    fn render_uses_statement_spans() {
        let source = "import { a } from './a';\nimport { useState } from 'react';\n";
        let mut first = Import::new("./a");
        first.span = Some(0..24);
        let mut second = Import::new("react");
        second.span = Some(25..58);
        let imports = vec![first, second];
        let block = render_block(&table().group(&imports), source);
        assert_eq!(block, "import { useState } from 'react';\n\nimport { a } from './a';");
    }

    #[test]
    fn custom_table() {
        let defs = vec![
            GroupDef {
                name: Some("relative".into()),
                patterns: vec![r"^\.".into()],
                last: vec![],
            },
            GroupDef {
                name: None,
                patterns: vec![".".into()],
                last: vec![],
            },
        ];
        let t = GroupTable::from_defs("@", &defs).unwrap();
        let imports = vec![Import::new("react"), Import::new("./a")];
        let grouped = t.group(&imports);
        assert_eq!(grouped[0].import.specifier, "./a");
        assert_eq!(t.groups()[1].name, "#1");
    }

    #[test]
    fn invalid_pattern_rejected() {
        let defs = vec![GroupDef {
            name: Some("broken".into()),
            patterns: vec!["(".into()],
            last: vec![],
        }];
        let err = GroupTable::from_defs("@", &defs).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref group, .. } if group == "broken"));
    }

    #[test]
    fn empty_table_rejected() {
        assert!(matches!(
            GroupTable::from_defs("@", &[]),
            Err(ConfigError::EmptyGroupTable)
        ));
    }
}
