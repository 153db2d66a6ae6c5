// ============================================================
// Layer 6 — Split Store
// ============================================================
// Persists a (history, future) pair produced by the splitter.
//
// File naming convention:
//   output/
//     tafeng_small_history.csv   ← every basket but the last
//     tafeng_small_future.csv    ← the last basket per user
//
// Both files get the full header even when a side is empty.

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, SerWriter};
use std::{fs::{self, File}, path::{Path, PathBuf}};

use crate::domain::dataset::Dataset;
use crate::domain::traits::DatasetSink;

pub struct SplitStore {
    dir:       PathBuf,
    delimiter: u8,
    extension: String,
}

impl SplitStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir:       dir.into(),
            delimiter: b',',
            extension: "csv".to_string(),
        }
    }

    /// Use another delimiter. Tab switches the extension to `tsv`.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        if delimiter == b'\t' {
            self.extension = "tsv".to_string();
        }
        self
    }

    pub fn history_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}_history.{}", self.extension))
    }

    pub fn future_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}_future.{}", self.extension))
    }

    fn write_table(&self, path: &Path, dataset: &Dataset) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;

        let mut frame = dataset.frame().clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(self.delimiter)
            .finish(&mut frame)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        tracing::debug!("Wrote {} records to '{}'", dataset.len(), path.display());
        Ok(())
    }
}

impl DatasetSink for SplitStore {
    fn write_split(&self, name: &str, history: &Dataset, future: &Dataset) -> Result<(String, String)> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create output directory '{}'", self.dir.display()))?;

        let history_path = self.history_path(name);
        let future_path  = self.future_path(name);
        self.write_table(&history_path, history)?;
        self.write_table(&future_path, future)?;

        tracing::info!(
            "Saved split '{}': {} history / {} future records",
            name,
            history.len(),
            future.len()
        );
        Ok((
            history_path.display().to_string(),
            future_path.display().to_string(),
        ))
    }
}
