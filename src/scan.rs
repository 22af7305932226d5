use crate::config::{Config, ConfigError};
use crate::extract;
use crate::guard::LayerImportGuard;
use crate::rules::default_export::DefaultExportRule;
use crate::rules::duplicate_imports::{self, DuplicateImportsRule};
use crate::rules::export_order::{self, ExportOrderRule};
use crate::rules::import_order::{self, ImportOrderRule};
use crate::rules::{default_export, Rule, ScanContext, Violation};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read '{}' while applying fixes: {source}", .path.display())]
    FixRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write fix to '{}': {source}", .path.display())]
    FixWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct ScanResult {
    pub violations: Vec<Violation>,
    pub files_scanned: usize,
    pub rules_loaded: usize,
    /// Directory violation paths are relative to.
    pub root: PathBuf,
}

impl ScanResult {
    pub fn fixable(&self) -> usize {
        self.violations.iter().filter(|v| v.fix.is_some()).count()
    }
}

/// Config compiled into a guard, file-level rules and path filters.
pub struct Scanner {
    root: PathBuf,
    guard: LayerImportGuard,
    file_rules: Vec<Box<dyn Rule>>,
    include: GlobSet,
    exclude: GlobSet,
}

impl Scanner {
    pub fn new(config: &Config, root: &Path) -> Result<Self, ConfigError> {
        let guard = LayerImportGuard::new(config)?;

        let mut file_rules: Vec<Box<dyn Rule>> = Vec::new();
        if let Some(sev) = config.severity(duplicate_imports::ID) {
            file_rules.push(Box::new(DuplicateImportsRule::new(sev)));
        }
        if let Some(sev) = config.severity(default_export::ID) {
            file_rules.push(Box::new(DefaultExportRule::new(
                sev,
                &config.guard.default_export_allowed,
            )?));
        }
        if let Some(sev) = config.severity(import_order::ID) {
            file_rules.push(Box::new(ImportOrderRule::new(sev, guard.table().clone())));
        }
        if let Some(sev) = config.severity(export_order::ID) {
            file_rules.push(Box::new(ExportOrderRule::new(sev)));
        }
        for rule in &file_rules {
            tracing::debug!(rule = rule.id(), severity = ?rule.severity(), "file rule enabled");
        }

        Ok(Self {
            root: root.to_path_buf(),
            guard,
            file_rules,
            include: build_glob_set(&config.guard.include)?,
            exclude: build_glob_set(&config.guard.exclude)?,
        })
    }

    pub fn rules_loaded(&self) -> usize {
        self.guard.rule_count() + self.file_rules.len()
    }

    /// All violations for one file. `path` is the path reported in
    /// violations and matched against layer directories and allow-lists.
    pub fn check_source(&self, path: &Path, content: &str) -> Vec<Violation> {
        let imports = extract::extract_imports(path, content);
        let ctx = ScanContext {
            file_path: path,
            content,
            imports: &imports,
        };

        let mut violations: Vec<Violation> = self
            .guard
            .check(path, &imports)
            .into_iter()
            .map(|v| {
                let import = &imports[v.index];
                Violation {
                    rule_id: v.rule_id.to_string(),
                    severity: v.severity,
                    file: path.to_path_buf(),
                    line: Some(import.line),
                    column: Some(import.column),
                    message: v.message,
                    suggest: None,
                    source_line: ctx.source_line(import.line),
                    fix: None,
                }
            })
            .collect();

        for rule in &self.file_rules {
            violations.extend(rule.check_file(&ctx));
        }

        violations
    }

    /// Walk targets and check every matching file in parallel.
    pub fn scan(&self, targets: &[PathBuf]) -> ScanResult {
        let files = self.collect_files(targets);
        tracing::debug!(files = files.len(), rules = self.rules_loaded(), "scanning");

        let per_file: Vec<Option<Vec<Violation>>> = files
            .par_iter()
            .map(|path| {
                let content = match fs::read_to_string(self.root.join(path)) {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                        return None;
                    }
                };
                Some(self.check_source(path, &content))
            })
            .collect();

        let files_scanned = per_file.iter().filter(|r| r.is_some()).count();
        let violations = per_file.into_iter().flatten().flatten().collect();

        ScanResult {
            violations,
            files_scanned,
            rules_loaded: self.rules_loaded(),
            root: self.root.clone(),
        }
    }

    /// Files to check, relative to the root where possible, sorted and
    /// without duplicates even when targets overlap.
    /// Explicit file targets bypass the include/exclude filters.
    pub fn collect_files(&self, targets: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = BTreeSet::new();

        for target in targets {
            let target = self.root.join(target);
            if target.is_file() {
                files.insert(self.relative(&target));
                continue;
            }

            let walker = WalkBuilder::new(&target)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build();
            for entry in walker {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!(error = %e, "walk error");
                        continue;
                    }
                };
                if !entry.file_type().map_or(false, |t| t.is_file()) {
                    continue;
                }
                let rel = self.relative(entry.path());
                if self.exclude.is_match(&rel) || !self.include.is_match(&rel) {
                    continue;
                }
                files.insert(rel);
            }
        }

        files.into_iter().collect()
    }

    fn relative(&self, path: &Path) -> PathBuf {
        let stripped = path.strip_prefix(&self.root).unwrap_or(path);
        stripped
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
}

/// Run a full scan from `root` over `targets`.
pub fn run_scan(config: &Config, root: &Path, targets: &[PathBuf]) -> Result<ScanResult, ScanError> {
    let scanner = Scanner::new(config, root)?;
    Ok(scanner.scan(targets))
}

/// Write every fix in `result` to disk. Returns the number of files changed.
pub fn apply_fixes(result: &ScanResult) -> Result<usize, ScanError> {
    let mut by_file: BTreeMap<&Path, Vec<&Violation>> = BTreeMap::new();
    for v in result.violations.iter().filter(|v| v.fix.is_some()) {
        by_file.entry(v.file.as_path()).or_default().push(v);
    }

    let mut changed = 0;
    for (file, violations) in by_file {
        let path = result.root.join(file);
        let mut content = fs::read_to_string(&path).map_err(|source| ScanError::FixRead {
            path: path.clone(),
            source,
        })?;

        let original = content.clone();
        for fix in violations.iter().filter_map(|v| v.fix.as_ref()) {
            content = content.replacen(&fix.old, &fix.new, 1);
        }
        if content == original {
            continue;
        }

        fs::write(&path, &content).map_err(|source| ScanError::FixWrite {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %file.display(), "applied fixes");
        changed += 1;
    }

    Ok(changed)
}

pub(crate) fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}
