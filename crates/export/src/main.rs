// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;

use clap::Parser;
use curate_export::{
    cli::{init_tracing, Cli},
    exit_status, run,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Before tracing, so RUST_LOG can come from .env
    let dotenv = dotenvy::dotenv();

    if let Err(e) = init_tracing(cli.log_format) {
        eprintln!("Could not set up global default subscriber for logger: {e}");
    }

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Could not load .env file: {e}"),
    }

    let result = run(&cli).await;
    if let Err(e) = &result {
        tracing::error!("Curate export error: {e:#}");
    }

    ExitCode::from(exit_status(&cli, &result))
}
