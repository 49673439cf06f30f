// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Package assembly facade: one call from a serialized model to a
//! finished package on disk.
//!
//! The facade encodes a protobuf model message to a scoped temporary
//! file, registers it as the package's root model under fixed
//! conventional names, optionally registers an empty weights
//! placeholder, and persists the manifest. Temporary artifacts are
//! removed on every exit path.

use crate::writer::{remove_path, PackageWriter};
use crate::PackageError;
use std::io::Write;
use std::path::Path;

/// Conventional author recorded for facade-created items.
pub const DEFAULT_AUTHOR: &str = "com.apple.CoreML";

/// Conventional root model filename. Together with [`DEFAULT_AUTHOR`]
/// this puts the root payload at a predictable relative path
/// (`Data/com.apple.CoreML/model.mlmodel`), so downstream readers can
/// locate it without parsing the manifest — though the manifest remains
/// the canonical index.
pub const ROOT_MODEL_FILE_NAME: &str = "model.mlmodel";

const ROOT_MODEL_DESCRIPTION: &str = "CoreML Model Specification";
const WEIGHTS_ITEM_NAME: &str = "weights";
const WEIGHTS_DESCRIPTION: &str = "CoreML Model Weights";
const TEMP_PREFIX: &str = "mlpackage-";

/// Writes a complete model package at `package_dir`.
///
/// Any existing package at the destination is deleted first: this is a
/// destructive, non-mergeable overwrite. The model is stored as the
/// root item under [`DEFAULT_AUTHOR`]/[`ROOT_MODEL_FILE_NAME`]; if
/// `include_empty_weights` is set, an empty `weights` directory item is
/// registered under the same author.
///
/// On failure, steps already completed (such as the directory created
/// for the new package) are **not** rolled back — only the temporary
/// encoding artifacts are guaranteed to be cleaned up. Callers who need
/// all-or-nothing creation must delete the destination themselves on
/// error.
pub fn write_model_package<M: prost::Message>(
    model: &M,
    package_dir: &Path,
    include_empty_weights: bool,
) -> Result<(), PackageError> {
    if package_dir.exists() {
        tracing::debug!(path = %package_dir.display(), "removing existing package");
        remove_path(package_dir)?;
    }
    let mut writer = PackageWriter::open(package_dir, true)?;

    // NamedTempFile is deleted on drop, covering every exit path below.
    let mut model_file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".mlmodel")
        .tempfile()?;
    model_file.write_all(&model.encode_to_vec())?;
    model_file.flush()?;

    writer.set_root_model(
        model_file.path(),
        ROOT_MODEL_FILE_NAME,
        DEFAULT_AUTHOR,
        ROOT_MODEL_DESCRIPTION,
    )?;

    if include_empty_weights {
        let weights_dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
        writer.add_item(
            weights_dir.path(),
            WEIGHTS_ITEM_NAME,
            DEFAULT_AUTHOR,
            WEIGHTS_DESCRIPTION,
        )?;
    }

    writer.save()
}
