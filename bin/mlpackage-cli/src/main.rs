// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # mlpkg
//!
//! Command-line interface for model package containers.
//!
//! ## Usage
//! ```bash
//! # Package an already-serialized model, with a weights directory
//! mlpkg create --model ./model.mlmodel --output ./MyModel.mlpackage --weights ./weights
//!
//! # Inspect a package's manifest and payloads
//! mlpkg inspect --package ./MyModel.mlpackage
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mlpkg",
    about = "Writer and inspector for model package containers",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a package from an already-serialized model blob.
    Create {
        /// Path to the serialized model file.
        #[arg(short, long)]
        model: std::path::PathBuf,

        /// Destination package directory (replaced if it exists).
        #[arg(short, long)]
        output: std::path::PathBuf,

        /// Optional weights directory to register alongside the model.
        #[arg(short, long)]
        weights: Option<std::path::PathBuf>,
    },

    /// Inspect a package: print the manifest index and payload sizes.
    Inspect {
        /// Path to the package directory.
        #[arg(short, long)]
        package: std::path::PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Create {
            model,
            output,
            weights,
        } => commands::create::execute(model, output, weights),
        Commands::Inspect { package } => commands::inspect::execute(package),
    }
}
