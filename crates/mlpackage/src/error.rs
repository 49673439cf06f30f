// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for package creation and manifest handling.

use std::path::PathBuf;

/// Errors that can occur when writing or reopening a model package.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// Open was requested on a non-existent directory without creation
    /// permission.
    #[error("invalid package path '{}': directory does not exist", path.display())]
    InvalidPackagePath { path: PathBuf },

    /// The package directory exists but contains no manifest document.
    /// Surfaced rather than treated as an empty package, since this
    /// usually indicates corruption or a non-package directory.
    #[error("no manifest found in package '{}'", path.display())]
    ManifestMissing { path: PathBuf },

    /// An item with the same (name, author) pair is already registered.
    #[error("item '{name}' by '{author}' already exists in the package")]
    ItemAlreadyExists { name: String, author: String },

    /// The package already has a root model; it cannot be replaced.
    #[error("package already has a root model")]
    RootModelAlreadyExists,

    /// A filesystem operation failed.
    #[error("package I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest document is malformed, or could not be serialized.
    #[error("failed to parse manifest: {0}")]
    ManifestParse(#[from] serde_json::Error),
}
