// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `mlpkg inspect` command: display a package's manifest and payloads.
//!
//! Reopens the package read-only and prints the index: format version,
//! root model, and a table of registered items with payload sizes.

use mlpackage::PackageWriter;
use std::path::{Path, PathBuf};

pub fn execute(package: PathBuf) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              mlpkg · Package Inspector              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let writer = PackageWriter::open(&package, false).map_err(|e| {
        anyhow::anyhow!("failed to open package '{}': {e}", package.display())
    })?;
    let manifest = writer.manifest();

    // ── Summary ────────────────────────────────────────────────
    println!("  Package: {}", package.display());
    println!("  Format version: {}", manifest.file_format_version);
    println!("  Items: {}", manifest.item_info_entries.len());
    match writer.root_model_info() {
        Some(root) => println!("  Root model: {} (by {})", root.name, root.author),
        None => println!("  Root model: <none>"),
    }
    println!();

    // ── Per-Item Detail ────────────────────────────────────────
    println!(
        "  {:<38} {:<22} {:<24} {:>10}",
        "Identifier", "Name", "Author", "Size",
    );
    println!("  {}", "-".repeat(98));

    for (identifier, info) in writer.items() {
        let payload = writer.item_payload_path(info);
        let kb = payload_bytes(&payload) as f64 / 1024.0;
        println!(
            "  {:<38} {:<22} {:<24} {:>7.1} KB",
            truncate(identifier, 38),
            truncate(&info.name, 22),
            truncate(&info.author, 24),
            kb,
        );
    }
    println!();
    Ok(())
}

/// Returns the total size of a payload: file length, or the recursive
/// sum for a directory tree.
fn payload_bytes(path: &Path) -> u64 {
    let Ok(meta) = std::fs::metadata(path) else {
        return 0;
    };
    if meta.is_file() {
        return meta.len();
    }
    let Ok(entries) = std::fs::read_dir(path) else {
        return 0;
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| payload_bytes(&entry.path()))
        .sum()
}

/// Truncates a string to `max_len` with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
