// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{
    level_filters::LevelFilter,
    subscriber::{set_global_default, SetGlobalDefaultError},
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(version, about = "Export curated registry lists from a subgraph to CSV")]
pub struct Cli {
    /// Path to the configuration file.
    /// Every value can also be set with `CURATE_EXPORT_` prefixed environment
    /// variables, using `__` between nested keys.
    #[arg(long, value_name = "FILE", verbatim_doc_comment)]
    pub config: Option<PathBuf>,

    /// Only export the named target. Can be repeated.
    #[arg(long = "target", value_name = "NAME")]
    pub targets: Vec<String>,

    /// Write the CSV files to this directory instead of the configured one
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Exit with status 2 when a target could not be fetched completely
    #[arg(long)]
    pub fail_on_incomplete: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
    Full,
}

/// Sets up tracing, allows log level to be set from the environment variables
pub fn init_tracing(format: LogFormat) -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let subscriber_builder: tracing_subscriber::fmt::SubscriberBuilder<
        tracing_subscriber::fmt::format::DefaultFields,
        tracing_subscriber::fmt::format::Format,
        EnvFilter,
    > = FmtSubscriber::builder().with_env_filter(filter);
    match format {
        LogFormat::Json => set_global_default(subscriber_builder.json().finish()),
        LogFormat::Full => set_global_default(subscriber_builder.finish()),
        LogFormat::Compact => set_global_default(subscriber_builder.compact().finish()),
        LogFormat::Pretty => set_global_default(subscriber_builder.with_ansi(true).pretty().finish()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from([
            "curate-export",
            "--config",
            "config.toml",
            "--target",
            "atr",
            "--target",
            "cdn",
            "--output-dir",
            "/tmp/out",
            "--log-format",
            "json",
            "--fail-on-incomplete",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("config.toml")));
        assert_eq!(cli.targets, vec!["atr".to_string(), "cdn".to_string()]);
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.fail_on_incomplete);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["curate-export"]);

        assert!(cli.config.is_none());
        assert!(cli.targets.is_empty());
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(!cli.fail_on_incomplete);
    }
}
