// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

pub mod cli;
pub mod error;
pub mod export;
pub mod run;
pub mod sink;

pub use error::{ExportError, SinkError};
pub use export::{export_target, export_targets, log_summary, TargetReport};
pub use run::{exit_status, run};
pub use sink::{CsvSink, MemorySink, RecordSink};
