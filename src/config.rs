use crate::rules;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "layer-guard.toml";

/// Severity level for a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Level a rule is configured at in `[rules]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warning,
    Error,
}

impl RuleLevel {
    /// `None` when the rule is switched off.
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warning => Some(Severity::Warning),
            RuleLevel::Error => Some(Severity::Error),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleLevel::Off => "off",
            RuleLevel::Warning => "warning",
            RuleLevel::Error => "error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown rule '{0}' in [rules]")]
    UnknownRule(String),
    #[error("[order] is present but defines no [[order.group]] entries")]
    EmptyGroupTable,
    #[error("order group '{0}' has no patterns")]
    EmptyGroup(String),
    #[error("order group '{group}': invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        group: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("alias '{0}' must be non-empty and must not contain '/'")]
    InvalidAlias(String),
}

impl ConfigError {
    /// The config file itself is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Top-level `layer-guard.toml` structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub guard: GuardSection,
    /// Per-rule level overrides keyed by rule id.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleLevel>,
    /// Replaces the default import group table when present.
    pub order: Option<OrderSection>,
}

/// The `[guard]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuardSection {
    /// Path alias the layers live under (`@` means `@/shared/...`).
    pub alias: String,
    /// Directory holding the layer directories.
    pub source_root: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Files allowed to use `export default` (framework entry points, tool configs).
    pub default_export_allowed: Vec<String>,
    /// Maximum number of segments below `shared` an import may reach.
    pub shared_max_depth: usize,
}

impl Default for GuardSection {
    fn default() -> Self {
        Self {
            alias: "@".into(),
            source_root: "src".into(),
            include: vec!["**/*.{ts,tsx,js,jsx,mjs,cjs}".into()],
            exclude: vec![
                "node_modules/**".into(),
                "build/**".into(),
                ".next/**".into(),
            ],
            default_export_allowed: vec![
                "src/app/**/page.tsx".into(),
                "src/app/**/layout.tsx".into(),
                "eslint.config.mjs".into(),
                "next.config.ts".into(),
            ],
            shared_max_depth: 2,
        }
    }
}

/// The `[order]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSection {
    #[serde(default)]
    pub group: Vec<GroupDef>,
}

/// A single `[[order.group]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupDef {
    pub name: Option<String>,
    /// A specifier belongs to the group if any of these match.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Members matching one of these sort after the other members.
    #[serde(default)]
    pub last: Vec<String>,
}

impl Config {
    /// Parse and validate config text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Load `explicit` if given, otherwise `layer-guard.toml` from `dir` if it
    /// exists, otherwise the built-in defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            tracing::debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let alias = &self.guard.alias;
        if alias.is_empty() || alias.contains('/') {
            return Err(ConfigError::InvalidAlias(alias.clone()));
        }

        for id in self.rules.keys() {
            if rules::rule_info(id).is_none() {
                return Err(ConfigError::UnknownRule(id.clone()));
            }
        }

        if let Some(order) = &self.order {
            if order.group.is_empty() {
                return Err(ConfigError::EmptyGroupTable);
            }
            for (i, group) in order.group.iter().enumerate() {
                if group.patterns.is_empty() {
                    let name = group.name.clone().unwrap_or_else(|| format!("#{}", i));
                    return Err(ConfigError::EmptyGroup(name));
                }
            }
        }

        Ok(())
    }

    /// Effective level of a rule: the `[rules]` override or the rule's default.
    pub fn level(&self, rule_id: &str) -> RuleLevel {
        self.rules
            .get(rule_id)
            .copied()
            .or_else(|| rules::rule_info(rule_id).map(|r| r.default_level))
            .unwrap_or(RuleLevel::Off)
    }

    pub fn severity(&self, rule_id: &str) -> Option<Severity> {
        self.level(rule_id).severity()
    }
}

/// Written by `layer-guard init`.
pub const STARTER_CONFIG: &str = r#"# layer-guard configuration
# Enforces Feature-Sliced Design import boundaries and a canonical import order.

[guard]
alias = "@"
source_root = "src"
include = ["**/*.{ts,tsx,js,jsx,mjs,cjs}"]
exclude = ["node_modules/**", "build/**", ".next/**"]
# Entry points that frameworks require to be default exports.
default_export_allowed = [
  "src/app/**/page.tsx",
  "src/app/**/layout.tsx",
  "eslint.config.mjs",
  "next.config.ts",
]
shared_max_depth = 2

# Rule levels: "error", "warning" or "off".
[rules]
no-react-default-import = "error"
no-layer-public-api = "error"
no-index-import = "error"
max-shared-depth = "error"
layer-direction = "error"
no-duplicate-imports = "error"
no-default-export = "error"
import-order = "error"
export-order = "error"

# Uncomment to replace the built-in import group table.
# [[order.group]]
# name = "packages"
# patterns = ["^react", "^@?\\w"]
"#;
