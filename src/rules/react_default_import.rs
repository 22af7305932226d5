use crate::rules::{FileContext, ImportRule};
use crate::specifier::{Import, ParsedSpecifier};

pub const ID: &str = "no-react-default-import";

const MESSAGE: &str = "Starting with version 17.0 React, TSX transformer allows you not to import React into JSX/TSX files explicitly. Please import exactly what you need.";

/// Flags `import React from 'react'` and `{ default as React }`.
///
/// The automatic JSX runtime makes the default binding unnecessary; named
/// imports such as `useState` are fine.
#[derive(Debug, Default)]
pub struct ReactDefaultImportRule;

impl ImportRule for ReactDefaultImportRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, _file: &FileContext, import: &Import, _spec: &ParsedSpecifier) -> Option<String> {
        if import.specifier == "react" && import.bindings.binds_default() {
            Some(MESSAGE.to_string())
        } else {
            None
        }
    }
}
