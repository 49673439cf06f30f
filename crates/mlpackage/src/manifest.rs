// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The package manifest: the authoritative index of a package's contents.
//!
//! The manifest lives at the package root as `Manifest.json` and maps
//! opaque identifiers to item metadata, plus an optional reference to
//! the root model entry.
//!
//! # Format
//! ```json
//! {
//!   "fileFormatVersion": "1.0.0",
//!   "itemInfoEntries": {
//!     "<opaque-id>": {
//!       "author": "com.apple.CoreML",
//!       "description": "CoreML Model Specification",
//!       "name": "model.mlmodel",
//!       "path": "com.apple.CoreML/model.mlmodel"
//!     }
//!   },
//!   "rootModelIdentifier": "<opaque-id>"
//! }
//! ```
//!
//! The serialized form is deterministic: entries are kept in a
//! [`BTreeMap`] so map keys sort lexicographically, and struct fields
//! are declared in sorted order. Persisting the same in-memory state
//! twice produces byte-identical documents.

use crate::PackageError;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Manifest filename at the package root.
pub const MANIFEST_FILE: &str = "Manifest.json";

/// Manifest format version written into freshly created packages.
pub const FILE_FORMAT_VERSION: &str = "1.0.0";

/// Metadata for one stored payload. Immutable once created: an item is
/// never updated in place, and a colliding (name, author) registration
/// fails rather than replacing it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemInfo {
    /// Authoring identifier, typically reverse-DNS (e.g. `"com.apple.CoreML"`).
    pub author: String,
    /// Human-readable description of the payload.
    pub description: String,
    /// Item name, also the payload filename (e.g. `"model.mlmodel"`).
    pub name: String,
    /// Storage-relative location under `Data/`, always `author/name`.
    pub path: String,
}

/// The in-memory manifest. Exclusively owned by the
/// [`PackageWriter`](crate::PackageWriter) that loaded or created it;
/// the on-disk document is ground truth and is only updated by an
/// explicit [`persist`](Manifest::persist).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Fixed format version tag, set at creation and never mutated.
    pub file_format_version: String,
    /// Opaque identifier → item metadata.
    pub item_info_entries: BTreeMap<String, ItemInfo>,
    /// Identifier of the package's primary model item, if one has been set.
    pub root_model_identifier: Option<String>,
}

impl Manifest {
    /// Creates an empty manifest with the given format version.
    pub fn empty(version: &str) -> Self {
        Self {
            file_format_version: version.to_string(),
            item_info_entries: BTreeMap::new(),
            root_model_identifier: None,
        }
    }

    /// Loads the manifest from an existing package directory.
    ///
    /// Fails with [`PackageError::ManifestMissing`] if the directory has
    /// no manifest document. A malformed document propagates as
    /// [`PackageError::ManifestParse`] — there is no partial recovery.
    pub fn load(package_dir: &Path) -> Result<Self, PackageError> {
        let manifest_path = package_dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(PackageError::ManifestMissing {
                path: package_dir.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(&manifest_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Serializes the manifest and writes it to `Manifest.json` at the
    /// package root, replacing any prior content.
    ///
    /// The document is written to a temporary file inside the package
    /// directory and published with a rename, so a concurrent reader
    /// never observes a partially written manifest.
    pub fn persist(&self, package_dir: &Path) -> Result<(), PackageError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = tempfile::NamedTempFile::new_in(package_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(package_dir.join(MANIFEST_FILE))
            .map_err(|e| PackageError::Io(e.error))?;
        Ok(())
    }

    /// Returns true if an entry with the given (name, author) pair exists.
    ///
    /// The (name, author) pair is the item identity key within a
    /// package, independent of the generated opaque identifiers.
    pub fn contains_item(&self, name: &str, author: &str) -> bool {
        self.item_info_entries
            .values()
            .any(|info| info.name == name && info.author == author)
    }
}
