use crate::rules::{FileContext, ImportRule};
use crate::specifier::{Import, ParsedSpecifier};

pub const ID: &str = "no-layer-public-api";

/// Flags imports of a bare layer root (`@/features`), which would resolve to
/// a layer-wide `index.ts` aggregation file.
#[derive(Debug, Default)]
pub struct LayerPublicApiRule;

impl ImportRule for LayerPublicApiRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, _file: &FileContext, _import: &Import, spec: &ParsedSpecifier) -> Option<String> {
        if !spec.is_layer_root() {
            return None;
        }
        let layer = spec.layer?;
        Some(format!(
            "Public API (index.ts) files are forbidden in \"{}\" layer. Import specific modules directly.",
            layer
        ))
    }
}
