// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # mlpackage
//!
//! A writer/reader for directory-based model package containers: a
//! versioned, manifest-indexed directory holding one or more named,
//! authored payloads (a root model plus optional weight blobs).
//!
//! - [`Manifest`] — the structured index document (`Manifest.json`)
//!   describing a package's contents.
//! - [`PackageWriter`] — opens or creates a package directory, adds
//!   items under an (author, name) identity, designates the root model,
//!   and persists the manifest deterministically.
//! - [`write_model_package`] — the assembly facade: encodes a protobuf
//!   model message, registers it as the root model, optionally adds an
//!   empty weights placeholder, and saves.
//!
//! # On-disk layout
//! ```text
//! <package>/
//!   Manifest.json        — pretty-printed, keys sorted
//!   Data/
//!     <author>/<name>    — one payload per registered item
//! ```
//!
//! All I/O is synchronous and blocking; errors surface immediately to
//! the caller with no internal retries. The model's wire schema is
//! opaque to this crate — any [`prost::Message`] can be packaged.
//!
//! # Example
//! ```no_run
//! use std::path::Path;
//!
//! #[derive(Clone, PartialEq, prost::Message)]
//! struct TinyModel {
//!     #[prost(int32, tag = "1")]
//!     specification_version: i32,
//! }
//!
//! let model = TinyModel { specification_version: 9 };
//! mlpackage::write_model_package(&model, Path::new("tiny.mlpackage"), true).unwrap();
//! ```

mod builder;
mod error;
mod manifest;
mod writer;

pub use builder::{write_model_package, DEFAULT_AUTHOR, ROOT_MODEL_FILE_NAME};
pub use error::PackageError;
pub use manifest::{ItemInfo, Manifest, FILE_FORMAT_VERSION, MANIFEST_FILE};
pub use writer::{PackageWriter, DATA_DIR};
