// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Package writer: owns a package directory and its in-memory manifest.
//!
//! A package is a directory containing `Manifest.json` at its root and
//! a `Data/` subdirectory holding one payload per registered item at
//! `Data/<author>/<name>`. A payload may be a single file or a whole
//! directory tree.
//!
//! The writer mutates the manifest in memory only; nothing is flushed
//! to disk until [`save`](PackageWriter::save) is called. A writer is
//! not designed for concurrent use against the same directory: two
//! writers racing on one package will silently lose the additions of
//! whichever one saves first. Callers must serialize access externally.

use crate::manifest::{ItemInfo, Manifest, FILE_FORMAT_VERSION};
use crate::PackageError;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Payload subdirectory name at the package root.
pub const DATA_DIR: &str = "Data";

/// Writes (and reopens) a model package directory.
///
/// # Example
/// ```no_run
/// use mlpackage::PackageWriter;
/// use std::path::Path;
///
/// let mut writer = PackageWriter::open("model.mlpackage", true).unwrap();
/// let id = writer
///     .set_root_model(Path::new("model.bin"), "model.bin", "org.example", "a model")
///     .unwrap();
/// writer.save().unwrap();
/// println!("root model registered as {id}");
/// ```
#[derive(Debug)]
pub struct PackageWriter {
    package_dir: PathBuf,
    data_dir: PathBuf,
    manifest: Manifest,
}

impl PackageWriter {
    /// Opens a package directory, optionally creating it.
    ///
    /// Three branches:
    /// - The directory exists → it must contain a manifest document,
    ///   which is loaded ([`PackageError::ManifestMissing`] otherwise).
    /// - The directory is absent and `create_if_necessary` is true →
    ///   the directory and its `Data/` subdirectory are created and an
    ///   empty manifest (version `"1.0.0"`) is initialized in memory.
    /// - The directory is absent and `create_if_necessary` is false →
    ///   [`PackageError::InvalidPackagePath`].
    pub fn open(
        package_dir: impl Into<PathBuf>,
        create_if_necessary: bool,
    ) -> Result<Self, PackageError> {
        let package_dir = package_dir.into();
        let data_dir = package_dir.join(DATA_DIR);

        let manifest = if package_dir.exists() {
            Manifest::load(&package_dir)?
        } else if create_if_necessary {
            std::fs::create_dir_all(&package_dir)?;
            std::fs::create_dir_all(&data_dir)?;
            tracing::debug!(path = %package_dir.display(), "created new package directory");
            Manifest::empty(FILE_FORMAT_VERSION)
        } else {
            return Err(PackageError::InvalidPackagePath { path: package_dir });
        };

        Ok(Self {
            package_dir,
            data_dir,
            manifest,
        })
    }

    /// Copies `source` (a file or directory tree) into the package and
    /// registers it under the given name and author.
    ///
    /// The payload is stored at `Data/<author>/<name>`. The uniqueness
    /// check on the (name, author) pair runs before any filesystem side
    /// effect, so a failed call mutates nothing. The source is copied,
    /// not moved; cleaning it up remains the caller's responsibility.
    ///
    /// Returns the freshly generated opaque identifier for the entry.
    /// The manifest is only mutated in memory — call
    /// [`save`](PackageWriter::save) to persist.
    pub fn add_item(
        &mut self,
        source: &Path,
        name: &str,
        author: &str,
        description: &str,
    ) -> Result<String, PackageError> {
        if self.manifest.contains_item(name, author) {
            return Err(PackageError::ItemAlreadyExists {
                name: name.to_string(),
                author: author.to_string(),
            });
        }

        let relative_path = format!("{author}/{name}");
        let destination = self.data_dir.join(author).join(name);

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // A prior failed run may have left a stale payload at this path.
        if destination.exists() {
            remove_path(&destination)?;
        }
        copy_path(source, &destination)?;

        let identifier = Uuid::new_v4().to_string();
        self.manifest.item_info_entries.insert(
            identifier.clone(),
            ItemInfo {
                author: author.to_string(),
                description: description.to_string(),
                name: name.to_string(),
                path: relative_path,
            },
        );
        tracing::debug!(name, author, identifier = %identifier, "registered package item");
        Ok(identifier)
    }

    /// Adds an item and records it as the package's root model.
    ///
    /// Fails with [`PackageError::RootModelAlreadyExists`] if a root
    /// model is already set. The check runs before the item is added,
    /// so a duplicate call makes no filesystem changes either.
    pub fn set_root_model(
        &mut self,
        source: &Path,
        name: &str,
        author: &str,
        description: &str,
    ) -> Result<String, PackageError> {
        if self.manifest.root_model_identifier.is_some() {
            return Err(PackageError::RootModelAlreadyExists);
        }
        let identifier = self.add_item(source, name, author, description)?;
        self.manifest.root_model_identifier = Some(identifier.clone());
        Ok(identifier)
    }

    /// Persists the manifest to disk.
    ///
    /// Idempotent: with no intervening mutation, repeated calls produce
    /// byte-identical documents (entry order is deterministic and
    /// independent of insertion order).
    pub fn save(&self) -> Result<(), PackageError> {
        self.manifest.persist(&self.package_dir)?;
        tracing::info!(
            path = %self.package_dir.display(),
            items = self.manifest.item_info_entries.len(),
            "saved package manifest",
        );
        Ok(())
    }

    /// Returns the in-memory manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Iterates over `(identifier, info)` pairs in identifier order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &ItemInfo)> {
        self.manifest
            .item_info_entries
            .iter()
            .map(|(id, info)| (id.as_str(), info))
    }

    /// Returns the root model's metadata, if one has been set.
    pub fn root_model_info(&self) -> Option<&ItemInfo> {
        let id = self.manifest.root_model_identifier.as_ref()?;
        self.manifest.item_info_entries.get(id)
    }

    /// Returns the absolute payload location for an item.
    pub fn item_payload_path(&self, info: &ItemInfo) -> PathBuf {
        self.data_dir.join(&info.path)
    }

    /// Returns the package root directory.
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }
}

/// Removes a file or a whole directory tree.
pub(crate) fn remove_path(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Copies a file or directory tree to `destination`.
fn copy_path(source: &Path, destination: &Path) -> io::Result<()> {
    if source.is_dir() {
        copy_dir_all(source, destination)
    } else {
        std::fs::copy(source, destination).map(|_| ())
    }
}

/// Recursively copies a directory tree.
fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        if ty.is_dir() {
            copy_dir_all(&entry.path(), &dst.join(entry.file_name()))?;
        } else {
            std::fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE;

    /// Creates a scratch file with the given contents, returning its path.
    fn scratch_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_open_creates_package() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("fresh.mlpackage");

        let writer = PackageWriter::open(&pkg, true).unwrap();
        assert!(pkg.is_dir());
        assert!(pkg.join(DATA_DIR).is_dir());
        assert_eq!(writer.manifest().file_format_version, FILE_FORMAT_VERSION);
        // Manifest not written until save().
        assert!(!pkg.join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_open_missing_without_create() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("absent.mlpackage");
        let result = PackageWriter::open(&pkg, false);
        assert!(matches!(
            result,
            Err(PackageError::InvalidPackagePath { .. })
        ));
    }

    #[test]
    fn test_open_existing_without_manifest() {
        let scratch = tempfile::tempdir().unwrap();
        // Directory exists, but was never saved: likely corruption or a
        // non-package directory, even with creation enabled.
        let result = PackageWriter::open(scratch.path(), true);
        assert!(matches!(result, Err(PackageError::ManifestMissing { .. })));
    }

    #[test]
    fn test_open_reloads_saved_manifest() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let source = scratch_file(scratch.path(), "payload.bin", b"abc");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        let id = writer
            .add_item(&source, "payload.bin", "org.example", "a payload")
            .unwrap();
        writer.save().unwrap();

        let reopened = PackageWriter::open(&pkg, false).unwrap();
        let info = reopened.manifest().item_info_entries.get(&id).unwrap();
        assert_eq!(info.name, "payload.bin");
        assert_eq!(info.author, "org.example");
        assert_eq!(info.path, "org.example/payload.bin");
    }

    #[test]
    fn test_add_item_copies_file() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let source = scratch_file(scratch.path(), "payload.bin", b"payload bytes");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        writer
            .add_item(&source, "payload.bin", "org.example", "a payload")
            .unwrap();

        let stored = pkg.join(DATA_DIR).join("org.example").join("payload.bin");
        assert_eq!(std::fs::read(stored).unwrap(), b"payload bytes");
        // The source is copied, not moved.
        assert!(source.exists());
    }

    #[test]
    fn test_add_item_copies_directory_tree() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");

        let tree = scratch.path().join("weights");
        std::fs::create_dir_all(tree.join("nested")).unwrap();
        std::fs::write(tree.join("a.bin"), b"aa").unwrap();
        std::fs::write(tree.join("nested").join("b.bin"), b"bb").unwrap();

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        writer
            .add_item(&tree, "weights", "org.example", "weight blobs")
            .unwrap();

        let stored = pkg.join(DATA_DIR).join("org.example").join("weights");
        assert_eq!(std::fs::read(stored.join("a.bin")).unwrap(), b"aa");
        assert_eq!(
            std::fs::read(stored.join("nested").join("b.bin")).unwrap(),
            b"bb"
        );
    }

    #[test]
    fn test_add_item_rejects_duplicate_identity() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let first = scratch_file(scratch.path(), "first.bin", b"first");
        let second = scratch_file(scratch.path(), "second.bin", b"second");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        writer
            .add_item(&first, "m", "a", "original")
            .unwrap();

        let result = writer.add_item(&second, "m", "a", "intruder");
        assert!(matches!(
            result,
            Err(PackageError::ItemAlreadyExists { ref name, ref author })
                if name == "m" && author == "a"
        ));

        // No mutation: one entry, payload untouched.
        assert_eq!(writer.manifest().item_info_entries.len(), 1);
        let stored = pkg.join(DATA_DIR).join("a").join("m");
        assert_eq!(std::fs::read(stored).unwrap(), b"first");
    }

    #[test]
    fn test_add_item_replaces_stale_payload() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let source = scratch_file(scratch.path(), "payload.bin", b"fresh");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        // Simulate a stale payload from a prior failed run: on disk, but
        // never registered in the manifest.
        let stale = pkg.join(DATA_DIR).join("a").join("m");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, b"stale").unwrap();

        writer.add_item(&source, "m", "a", "payload").unwrap();
        assert_eq!(std::fs::read(stale).unwrap(), b"fresh");
    }

    #[test]
    fn test_set_root_model() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let source = scratch_file(scratch.path(), "model.bin", b"model");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        let id = writer
            .set_root_model(&source, "model.bin", "org.example", "the model")
            .unwrap();

        assert_eq!(writer.manifest().root_model_identifier.as_deref(), Some(id.as_str()));
        assert_eq!(writer.root_model_info().unwrap().name, "model.bin");
    }

    #[test]
    fn test_second_root_model_rejected() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let source = scratch_file(scratch.path(), "model.bin", b"model");
        let other = scratch_file(scratch.path(), "other.bin", b"other");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        let id = writer
            .set_root_model(&source, "model.bin", "org.example", "the model")
            .unwrap();

        let result = writer.set_root_model(&other, "other.bin", "org.example", "another");
        assert!(matches!(result, Err(PackageError::RootModelAlreadyExists)));

        // Identifier unchanged, and the rejected item was never added.
        assert_eq!(writer.manifest().root_model_identifier.as_deref(), Some(id.as_str()));
        assert_eq!(writer.manifest().item_info_entries.len(), 1);
        assert!(!pkg.join(DATA_DIR).join("org.example").join("other.bin").exists());
    }

    #[test]
    fn test_save_is_idempotent() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let source = scratch_file(scratch.path(), "model.bin", b"model");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        writer
            .set_root_model(&source, "model.bin", "org.example", "the model")
            .unwrap();

        writer.save().unwrap();
        let first = std::fs::read(pkg.join(MANIFEST_FILE)).unwrap();
        writer.save().unwrap();
        let second = std::fs::read(pkg.join(MANIFEST_FILE)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_identifiers_are_unique() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let source = scratch_file(scratch.path(), "payload.bin", b"x");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        let a = writer.add_item(&source, "one", "org.example", "").unwrap();
        let b = writer.add_item(&source, "two", "org.example", "").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_item_payload_path() {
        let scratch = tempfile::tempdir().unwrap();
        let pkg = scratch.path().join("pkg");
        let source = scratch_file(scratch.path(), "payload.bin", b"x");

        let mut writer = PackageWriter::open(&pkg, true).unwrap();
        writer.add_item(&source, "m", "a", "").unwrap();

        let (_, info) = writer.items().next().unwrap();
        let payload = writer.item_payload_path(info);
        assert_eq!(payload, pkg.join(DATA_DIR).join("a/m"));
        assert!(payload.is_file());
    }
}
