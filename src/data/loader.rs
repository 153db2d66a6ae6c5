// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads one delimited text file into a Dataset with polars'
// CSV reader. The first line is the header; every later line is
// one transaction record. Schema inference is switched off, so
// every cell is kept as a string, and empty cells stay "" rather
// than becoming nulls.
//
// An input can be marked optional: a missing optional file
// loads as a blank table (no columns, no rows), which merge
// treats as "nothing to add". A missing required file is an
// error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::domain::dataset::Dataset;
use crate::domain::traits::DatasetSource;

pub struct CsvLoader {
    path:      PathBuf,
    delimiter: u8,
    optional:  bool,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:      path.into(),
            delimiter: b',',
            optional:  false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a blank table instead of failing when the file is absent.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for CsvLoader {
    fn load(&self) -> Result<Dataset> {
        if !self.path.exists() {
            if self.optional {
                tracing::warn!(
                    "Optional input '{}' does not exist, using an empty table",
                    self.path.display()
                );
                return Ok(Dataset::default());
            }
            anyhow::bail!("Input file '{}' does not exist", self.path.display());
        }

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| {
                opts.with_separator(self.delimiter)
                    .with_missing_is_null(false)
            })
            .try_into_reader_with_file_path(Some(self.path.clone()))
            .with_context(|| format!("Cannot open '{}'", self.path.display()))?
            .finish()
            .with_context(|| format!("Cannot read '{}'", self.path.display()))?;

        let dataset = Dataset::from_frame(frame)
            .with_context(|| format!("Invalid table in '{}'", self.path.display()))?;

        tracing::debug!(
            "Loaded '{}': {} records, {} columns",
            self.path.display(),
            dataset.len(),
            dataset.columns().len()
        );
        Ok(dataset)
    }
}
