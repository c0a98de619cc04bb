//! Resource identity
//!
//! Scenes and bundles are addressed by a stable identifier that the project's
//! asset index resolves to a path. The registry only stores identifiers, so
//! renaming or moving an asset never breaks group membership.

mod asset_index;

pub use asset_index::InMemoryAssetIndex;

use serde::{Serialize, Deserialize};
use std::fmt;
use std::path::Path;

/// Stable identifier of an addressable asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Create an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    
    /// Borrow the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of registry an asset belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// A loadable scene
    Scene,
    /// An ordered collection of scenes, itself an asset
    Bundle,
}

/// Maps identifiers to paths and back, and scans the project by kind.
pub trait IdentityResolver {
    /// Current path of an asset, if the identifier still resolves
    fn path_of(&self, id: &AssetId) -> Option<String>;
    
    /// Identifier of the asset at `path`
    fn id_of(&self, path: &str) -> Option<AssetId>;
    
    /// Full scan for every asset of the given kind
    fn discover(&self, kind: AssetKind) -> Vec<AssetId>;
    
    /// Ordered member scenes of a bundle; empty for unknown bundles
    fn bundle_members(&self, bundle: &AssetId) -> Vec<AssetId>;
    
    /// Path of an asset, treating an empty path as unresolved
    fn resolved_path(&self, id: &AssetId) -> Option<String> {
        self.path_of(id).filter(|path| !path.is_empty())
    }
}

/// Display name for an asset path: the file name without its extension.
pub fn display_name_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map_or_else(|| path.to_string(), |stem| stem.to_string_lossy().into_owned())
}
