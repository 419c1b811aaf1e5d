// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Could not create output directory `{}`: {source}", path.display())]
    CreateDirectory { path: PathBuf, source: io::Error },
    #[error("Could not write `{}`: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to init HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Failed to write target `{target}`: {source}")]
    Sink { target: String, source: SinkError },
}
