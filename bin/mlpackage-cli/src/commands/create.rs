// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `mlpkg create` command: assemble a package from a serialized model.
//!
//! The model file is treated as an opaque, already-serialized blob and
//! registered as the package's root model under the conventional
//! author/name, matching what the assembly facade produces. An optional
//! weights directory can be registered alongside it.

use anyhow::Context;
use mlpackage::{PackageWriter, DEFAULT_AUTHOR, ROOT_MODEL_FILE_NAME};
use std::path::PathBuf;

pub fn execute(
    model: PathBuf,
    output: PathBuf,
    weights: Option<PathBuf>,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        model.is_file(),
        "model file '{}' does not exist",
        model.display(),
    );

    // Full overwrite semantics: an existing package is replaced, never merged.
    if output.exists() {
        std::fs::remove_dir_all(&output).with_context(|| {
            format!("failed to remove existing package '{}'", output.display())
        })?;
    }

    let mut writer = PackageWriter::open(&output, true)?;
    writer.set_root_model(
        &model,
        ROOT_MODEL_FILE_NAME,
        DEFAULT_AUTHOR,
        "CoreML Model Specification",
    )?;

    if let Some(weights_dir) = weights {
        anyhow::ensure!(
            weights_dir.is_dir(),
            "weights directory '{}' does not exist",
            weights_dir.display(),
        );
        writer.add_item(
            &weights_dir,
            "weights",
            DEFAULT_AUTHOR,
            "CoreML Model Weights",
        )?;
    }

    writer.save()?;
    tracing::info!(package = %output.display(), "package assembly complete");

    println!(
        "Created package '{}' ({} item{})",
        output.display(),
        writer.manifest().item_info_entries.len(),
        if writer.manifest().item_info_entries.len() == 1 { "" } else { "s" },
    );
    Ok(())
}
