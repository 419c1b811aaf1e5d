// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs,
    path::{Path, PathBuf},
};

use curate_config::OutputConfig;
use curate_record::{NormalizedRecord, COLUMNS};

use crate::error::SinkError;

/// Destination for the normalized rows of one target.
///
/// Every write replaces whatever was previously stored under `name`.
pub trait RecordSink {
    fn write(&mut self, name: &str, records: &[NormalizedRecord]) -> Result<(), SinkError>;
}

/// Writes `<directory>/<name>.csv` with a header row followed by one row per
/// record. Null fields become empty cells.
#[derive(Debug, Clone)]
pub struct CsvSink {
    directory: PathBuf,
}

impl CsvSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        match output {
            OutputConfig::Csv { directory } => Self::new(directory.clone()),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.csv"))
    }

    fn write_csv(path: &Path, records: &[NormalizedRecord]) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        writer.write_record(COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl RecordSink for CsvSink {
    fn write(&mut self, name: &str, records: &[NormalizedRecord]) -> Result<(), SinkError> {
        fs::create_dir_all(&self.directory).map_err(|source| SinkError::CreateDirectory {
            path: self.directory.clone(),
            source,
        })?;

        let path = self.path_for(name);
        Self::write_csv(&path, records).map_err(|source| SinkError::Csv {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), records = records.len(), "Records saved");
        Ok(())
    }
}

/// Keeps every write in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Vec<(String, Vec<NormalizedRecord>)>,
}

impl MemorySink {
    /// Rows last written under `name`
    pub fn get(&self, name: &str) -> Option<&[NormalizedRecord]> {
        self.batches
            .iter()
            .find(|(batch, _)| batch == name)
            .map(|(_, records)| records.as_slice())
    }

    /// Names in the order they were first written
    pub fn names(&self) -> Vec<&str> {
        self.batches.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl RecordSink for MemorySink {
    fn write(&mut self, name: &str, records: &[NormalizedRecord]) -> Result<(), SinkError> {
        match self.batches.iter_mut().find(|(batch, _)| batch == name) {
            Some((_, existing)) => *existing = records.to_vec(),
            None => self.batches.push((name.to_string(), records.to_vec())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use curate_record::normalize;

    use super::*;

    #[test]
    fn test_csv_layout() {
        let directory = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(directory.path());

        let records: Vec<_> = test_assets::mixed_records()
            .into_iter()
            .map(normalize)
            .collect();
        sink.write("atr", &records).unwrap();

        let content = fs::read_to_string(directory.path().join("atr.csv")).unwrap();
        assert_eq!(
            content,
            "chain_id,address,key1,key2,key3\n\
             solana,7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU,Jupiter,Jupiter Aggregator,\n\
             ,,Orphan,,\n\
             ,eip155:bad,Broken,\"Broken, with comma\",\n"
        );
    }

    #[test]
    fn test_empty_export_writes_header_only() {
        let directory = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(directory.path());

        sink.write("cdn", &[]).unwrap();

        let content = fs::read_to_string(sink.path_for("cdn")).unwrap();
        assert_eq!(content, "chain_id,address,key1,key2,key3\n");
    }

    #[test]
    fn test_rewrites_previous_file() {
        let directory = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(directory.path());
        let records: Vec<_> = test_assets::raw_records(0, 5)
            .into_iter()
            .map(normalize)
            .collect();

        sink.write("token", &records).unwrap();
        sink.write("token", &records[..1]).unwrap();

        let content = fs::read_to_string(sink.path_for("token")).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with(&format!(
            "100,0x{:040x},Contract 0,Project 0,https://example.org/0\n",
            0
        )));
    }

    #[test]
    fn test_creates_missing_directory() {
        let directory = tempfile::tempdir().unwrap();
        let nested = directory.path().join("data").join("curate");
        let mut sink = CsvSink::from_config(&OutputConfig::Csv {
            directory: nested.clone(),
        });

        sink.write("atr", &[]).unwrap();

        assert!(nested.join("atr.csv").is_file());
    }

    #[test]
    fn test_directory_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut sink = CsvSink::new(file.path());

        let err = sink.write("atr", &[]).unwrap_err();

        assert!(matches!(err, SinkError::CreateDirectory { .. }));
    }

    #[test]
    fn test_memory_sink_replaces_batches() {
        let mut sink = MemorySink::default();
        let records: Vec<_> = test_assets::raw_records(0, 2)
            .into_iter()
            .map(normalize)
            .collect();

        sink.write("atr", &records).unwrap();
        sink.write("token", &[]).unwrap();
        sink.write("atr", &records[1..]).unwrap();

        assert_eq!(sink.names(), vec!["atr", "token"]);
        assert_eq!(sink.get("atr"), Some(&records[1..]));
        assert_eq!(sink.get("cdn"), None);
    }
}
