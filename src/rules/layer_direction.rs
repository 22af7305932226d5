use crate::rules::{FileContext, ImportRule};
use crate::specifier::{Import, ParsedSpecifier};

pub const ID: &str = "layer-direction";

/// Enforces the FSD dependency direction for files that live inside a layer.
///
/// A module may import only from layers below its own. Inside a sliced layer
/// (`widgets`, `features`, `entities`) slices are isolated from each other.
/// Imports without a layer (packages, relative paths, other aliases) pass.
#[derive(Debug, Default)]
pub struct LayerDirectionRule;

impl ImportRule for LayerDirectionRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, file: &FileContext, _import: &Import, spec: &ParsedSpecifier) -> Option<String> {
        let from = file.location.as_ref()?;
        let to = spec.layer?;

        if to.rank() < from.layer.rank() {
            return Some(format!(
                "Layer \"{}\" must not import from higher layer \"{}\".",
                from.layer, to
            ));
        }

        if to == from.layer && to.has_slices() {
            if let (Some(own), Some(other)) = (from.slice.as_deref(), spec.slice()) {
                if own != other {
                    return Some(format!(
                        "Slice \"{}\" must not import from sibling slice \"{}\" in \"{}\" layer.",
                        own, other, to
                    ));
                }
            }
        }

        None
    }
}
