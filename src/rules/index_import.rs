use crate::rules::{FileContext, ImportRule};
use crate::specifier::{Import, ParsedSpecifier};

pub const ID: &str = "no-index-import";

const MESSAGE: &str = "Importing from index files is forbidden. Import specific modules directly.";

/// Flags specifiers ending in `/index`, `/index.ts` or `/index.tsx`.
#[derive(Debug, Default)]
pub struct IndexImportRule;

impl ImportRule for IndexImportRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, _file: &FileContext, _import: &Import, spec: &ParsedSpecifier) -> Option<String> {
        spec.has_index_suffix().then(|| MESSAGE.to_string())
    }
}
