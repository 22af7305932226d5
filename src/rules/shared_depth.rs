use crate::layer::Layer;
use crate::rules::{FileContext, ImportRule};
use crate::specifier::{Import, ParsedSpecifier};

pub const ID: &str = "max-shared-depth";

/// Flags imports that reach more than `max_depth` segments below `shared`.
///
/// `@/shared/ui/Button` is two levels deep; `@/shared/ui/button/Button` is three.
#[derive(Debug)]
pub struct SharedDepthRule {
    max_depth: usize,
}

impl SharedDepthRule {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl ImportRule for SharedDepthRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, _file: &FileContext, _import: &Import, spec: &ParsedSpecifier) -> Option<String> {
        if spec.layer != Some(Layer::Shared) || spec.depth() <= self.max_depth {
            return None;
        }
        Some(format!(
            "Imports deeper than {} levels in \"shared\" folder are forbidden.",
            self.max_depth
        ))
    }
}
