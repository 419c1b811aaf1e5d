// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use curate_config::{Config, OutputConfig};
use curate_subgraph::{build_http_client, create_subgraph_client, Paginator};

use crate::{
    cli::Cli,
    error::ExportError,
    export::{export_targets, log_summary, TargetReport},
    sink::CsvSink,
};

/// Process exit status of a successful run
pub const EXIT_SUCCESS: u8 = 0;
/// Configuration, HTTP client or sink failure
pub const EXIT_FAILURE: u8 = 1;
/// Some target was not fetched completely and `--fail-on-incomplete` is set
pub const EXIT_INCOMPLETE: u8 = 2;

/// Runs one export with the options given on the command line.
///
/// Returns a report per selected target. Incomplete fetches are reported,
/// not returned as errors.
pub async fn run(cli: &Cli) -> anyhow::Result<Vec<TargetReport>> {
    let mut config = Config::parse(cli.config.as_ref())
        .map_err(ExportError::Config)
        .with_context(|| {
            format!(
                "Invalid configuration file `{}`, if a value is missing you can also set it \
                with CURATE_EXPORT_ environment variables",
                cli.config
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            )
        })?;

    if let Some(directory) = cli.output_dir.clone() {
        config.output = OutputConfig::Csv { directory };
    }

    let targets = config
        .select_targets(&cli.targets)
        .map_err(ExportError::Config)?;

    let http_client = build_http_client(&config.subgraph).map_err(ExportError::HttpClient)?;
    let subgraph_client = create_subgraph_client(http_client, &config.subgraph);
    tracing::info!(
        query_url = %subgraph_client.query_url(),
        targets = targets.len(),
        "Starting export"
    );

    let paginator = Paginator::new(
        &subgraph_client,
        &config.pagination,
        config.query.statuses.clone(),
    );
    let mut sink = CsvSink::from_config(&config.output);

    let reports = export_targets(&paginator, &targets, &mut sink)
        .await
        .context("Export aborted")?;
    log_summary(&reports);

    Ok(reports)
}

/// Maps the outcome of [`run`] to the process exit status.
pub fn exit_status(cli: &Cli, result: &anyhow::Result<Vec<TargetReport>>) -> u8 {
    match result {
        Err(_) => EXIT_FAILURE,
        Ok(reports)
            if cli.fail_on_incomplete && reports.iter().any(|report| !report.is_complete()) =>
        {
            EXIT_INCOMPLETE
        }
        Ok(_) => EXIT_SUCCESS,
    }
}
