use std::fmt;
use std::path::{Component, Path};

/// A Feature-Sliced Design layer, ordered from widest to narrowest scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    App,
    Widgets,
    Features,
    Entities,
    Shared,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::App,
        Layer::Widgets,
        Layer::Features,
        Layer::Entities,
        Layer::Shared,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::App => "app",
            Layer::Widgets => "widgets",
            Layer::Features => "features",
            Layer::Entities => "entities",
            Layer::Shared => "shared",
        }
    }

    pub fn from_name(name: &str) -> Option<Layer> {
        Layer::ALL.into_iter().find(|l| l.as_str() == name)
    }

    /// 0 for `app` through 4 for `shared`. A layer may only depend on layers
    /// with a strictly greater rank.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// `app` and `shared` are split into segments directly, the rest into slices.
    pub fn has_slices(self) -> bool {
        !matches!(self, Layer::App | Layer::Shared)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a source file sits in the layer tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub layer: Layer,
    pub slice: Option<String>,
}

/// Locate a file inside `<source_root>/<layer>/<slice>/...`.
///
/// With an empty `source_root` the layer directory may appear at any depth.
/// The slice is only reported for sliced layers and only when it is a
/// directory, not the file itself.
pub fn locate_file(path: &Path, source_root: &str) -> Option<FileLocation> {
    let parts: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    for i in 0..parts.len() {
        let layer_idx = if source_root.is_empty() {
            i
        } else if parts[i] == source_root {
            i + 1
        } else {
            continue;
        };

        // The layer must be a directory.
        if layer_idx + 1 >= parts.len() {
            continue;
        }

        if let Some(layer) = Layer::from_name(parts[layer_idx]) {
            let slice = if layer.has_slices() && layer_idx + 2 < parts.len() {
                Some(parts[layer_idx + 1].to_string())
            } else {
                None
            };
            return Some(FileLocation { layer, slice });
        }
    }

    None
}
