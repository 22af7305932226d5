use crate::config::{Config, ConfigError, Severity};
use crate::layer::locate_file;
use crate::order::{GroupTable, GroupedImport};
use crate::rules::index_import::IndexImportRule;
use crate::rules::layer_direction::LayerDirectionRule;
use crate::rules::layer_public_api::LayerPublicApiRule;
use crate::rules::react_default_import::ReactDefaultImportRule;
use crate::rules::shared_depth::SharedDepthRule;
use crate::rules::{FileContext, ImportRule};
use crate::specifier::{Import, ParsedSpecifier};
use std::path::Path;

/// A conformance problem with one import of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportViolation {
    /// Position of the offending import in the list passed to [`LayerImportGuard::check`].
    pub index: usize,
    pub rule_id: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Checks a file's imports against the layer rules and computes their
/// canonical order. Immutable once built; safe to share across threads.
pub struct LayerImportGuard {
    alias: String,
    source_root: String,
    rules: Vec<(Box<dyn ImportRule>, Severity)>,
    table: GroupTable,
}

impl LayerImportGuard {
    /// Build the guard from config. Rules switched off are left out; an
    /// invalid group table is rejected here rather than per file.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let guard = &config.guard;
        let candidates: Vec<Box<dyn ImportRule>> = vec![
            Box::new(ReactDefaultImportRule),
            Box::new(LayerPublicApiRule),
            Box::new(IndexImportRule),
            Box::new(SharedDepthRule::new(guard.shared_max_depth)),
            Box::new(LayerDirectionRule),
        ];

        let rules = candidates
            .into_iter()
            .filter_map(|rule| config.severity(rule.id()).map(|sev| (rule, sev)))
            .collect();

        let table = match &config.order {
            Some(order) => GroupTable::from_defs(&guard.alias, &order.group)?,
            None => GroupTable::standard(&guard.alias)?,
        };

        Ok(Self {
            alias: guard.alias.clone(),
            source_root: guard.source_root.clone(),
            rules,
            table,
        })
    }

    /// Guard with the built-in defaults.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::new(&Config::default())
    }

    /// Number of per-import rules that are switched on.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn table(&self) -> &GroupTable {
        &self.table
    }

    /// Every violation of every enabled rule, ordered by import then by rule.
    ///
    /// Malformed specifiers pass all rules.
    pub fn check(&self, file_path: &Path, imports: &[Import]) -> Vec<ImportViolation> {
        let file = FileContext {
            location: locate_file(file_path, &self.source_root),
        };

        let mut violations = Vec::new();
        for (index, import) in imports.iter().enumerate() {
            let spec = match ParsedSpecifier::parse(&import.specifier, &self.alias) {
                Some(s) => s,
                None => continue,
            };

            for (rule, severity) in &self.rules {
                if let Some(message) = rule.check(&file, import, &spec) {
                    violations.push(ImportViolation {
                        index,
                        rule_id: rule.id(),
                        severity: *severity,
                        message,
                    });
                }
            }
        }

        violations
    }

    /// Stable canonical order of `imports`.
    pub fn group<'a>(&self, imports: &'a [Import]) -> Vec<GroupedImport<'a>> {
        self.table.group(imports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use crate::rules::{index_import, layer_direction, layer_public_api, react_default_import, shared_depth};

    fn guard() -> LayerImportGuard {
        LayerImportGuard::standard().unwrap()
    }

    fn check(specifiers: &[&str]) -> Vec<ImportViolation> {
        let imports: Vec<Import> = specifiers.iter().map(|s| Import::new(*s)).collect();
        guard().check(Path::new("src/pages/home.tsx"), &imports)
    }

    #[test]
    fn react_default_import_yields_one_violation() {
        let imports = vec![Import::new("react").with_default("React")];
        let violations = guard().check(Path::new("src/pages/home.tsx"), &imports);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id, react_default_import::ID);
        assert_eq!(violations[0].index, 0);
    }

    #[test]
    fn layer_roots_flagged_but_not_submodules() {
        for layer in Layer::ALL {
            let root = check(&[&format!("@/{}", layer)]);
            assert!(root
                .iter()
                .any(|v| v.rule_id == layer_public_api::ID && v.message.contains(layer.as_str())));

            let deeper = check(&[&format!("@/{}/foo", layer)]);
            assert!(deeper.iter().all(|v| v.rule_id != layer_public_api::ID));
        }
    }

    #[test]
    fn index_suffix_flagged_regardless_of_prefix() {
        for s in ["@/features/auth/index", "./index.ts", "@/whatever/index.tsx", "../index"] {
            let v = check(&[s]);
            assert!(v.iter().any(|v| v.rule_id == index_import::ID), "{}", s);
        }
    }

    #[test]
    fn shared_depth() {
        assert_eq!(check(&["@/shared/ui/button/Button"])[0].rule_id, shared_depth::ID);
        assert!(check(&["@/shared/ui/Button"]).is_empty());
    }

    #[test]
    fn multiple_rules_fire_in_rule_order() {
        let v = check(&["@/shared/ui/button/index"]);
        let ids: Vec<&str> = v.iter().map(|v| v.rule_id).collect();
        assert_eq!(ids, vec![index_import::ID, shared_depth::ID]);
    }

    #[test]
    fn violations_follow_input_order() {
        let v = check(&["@/widgets", "react", "./index", "@/shared"]);
        let indices: Vec<usize> = v.iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn duplicates_reported_each_time() {
        let v = check(&["@/entities", "@/entities"]);
        assert_eq!(v.len(), 2);
        assert_eq!(v[1].index, 1);
    }

    #[test]
    fn malformed_specifiers_pass() {
        assert!(check(&["", "@/shared/ui/button/ Button", "@/shared//index"]).is_empty());
    }

    #[test]
    fn unknown_layer_is_plain_alias() {
        assert!(check(&["@/pages", "@/lib/a/b/c/d"]).is_empty());
    }

    #[test]
    fn check_is_deterministic() {
        let g = guard();
        let imports = vec![
            Import::new("react").with_default("React"),
            Import::new("@/features"),
            Import::new("@/shared/a/b/index"),
        ];
        let path = Path::new("src/entities/user/ui/Card.tsx");
        assert_eq!(g.check(path, &imports), g.check(path, &imports));
    }

    #[test]
    fn layer_direction_uses_file_path() {
        let g = guard();
        let imports = vec![Import::new("@/features/auth/model/session")];
        let v = g.check(Path::new("src/entities/user/model/store.ts"), &imports);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].rule_id, layer_direction::ID);
        assert!(g
            .check(Path::new("src/widgets/header/ui/Header.tsx"), &imports)
            .is_empty());
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = Config::from_toml("[rules]\nno-index-import = \"off\"\nlayer-direction = \"warning\"\n").unwrap();
        let g = LayerImportGuard::new(&config).unwrap();
        assert_eq!(g.rule_count(), 4);
        let imports = vec![Import::new("@/shared/index"), Import::new("@/app/x")];
        let v = g.check(Path::new("src/shared/lib/a.ts"), &imports);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].rule_id, layer_direction::ID);
        assert_eq!(v[0].severity, Severity::Warning);
    }

    #[test]
    fn custom_alias_applies_to_rules_and_order() {
        let config = Config::from_toml("[guard]\nalias = \"~\"\n").unwrap();
        let g = LayerImportGuard::new(&config).unwrap();
        assert_eq!(check(&["~/shared"]).len(), 0);
        let imports = vec![Import::new("~/shared")];
        assert_eq!(g.check(Path::new("a.ts"), &imports).len(), 1);
        assert_eq!(g.table().classify(&Import::new("~/shared/ui/Button")).group, 4);
    }

    #[test]
    fn group_delegates_to_table() {
        let imports = vec![Import::new("./b"), Import::new("react"), Import::new("./a")];
        let order: Vec<&str> = guard()
            .group(&imports)
            .iter()
            .map(|g| g.import.specifier.as_str())
            .collect();
        assert_eq!(order, vec!["react", "./b", "./a"]);
    }
}
