// src/report/mod.rs
use anyhow::{Context, Result};
use glob::{glob, Pattern};
use serde::de::DeserializeOwned;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};

use crate::{
    cache::{CsvCache, Source},
    config::Settings,
    table::Table,
};

pub mod nas;

pub use nas::NasVmcInfo;

/// A typed attribute bag backed by one collected CSV file.
pub trait DataSet: DeserializeOwned {
    /// File name after the server prefix, without `.csv` (e.g. `_NasVmcInfo`).
    const SUFFIX: &'static str;
}

/// One server's collected CSV files under a report directory.
#[derive(Debug, Clone)]
pub struct Collection {
    dir: PathBuf,
    server: String,
}

impl Collection {
    pub fn new(dir: impl Into<PathBuf>, server: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            server: server.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.report_dir.clone(), settings.server.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<server><suffix>.csv`
    pub fn path_for(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}.csv", self.server, suffix))
    }

    /// Cached table for `suffix`, or `None` if that file was never collected.
    pub fn table<S: Source>(&self, cache: &CsvCache<S>, suffix: &str) -> Option<Arc<Table>> {
        cache.get(&self.path_for(suffix).to_string_lossy())
    }

    /// Typed rows of data set `T`. `Ok(None)` means the file is absent; an
    /// error means it exists but a row does not fit `T`.
    pub fn records<T: DataSet, S: Source>(&self, cache: &CsvCache<S>) -> Result<Option<Vec<T>>> {
        let Some(table) = self.table(cache, T::SUFFIX) else {
            return Ok(None);
        };
        table
            .records()
            .with_context(|| format!("reading {} records", T::SUFFIX))
            .map(Some)
    }

    /// Load `files` into `cache` one after another and return how many loaded.
    /// Files that cannot be loaded are logged and skipped.
    pub fn load_all<S: Source>(&self, cache: &CsvCache<S>, files: &[PathBuf]) -> usize {
        let mut loaded = 0;
        for path in files {
            let key = path.to_string_lossy();
            match cache.get(&key) {
                Some(table) => {
                    info!(
                        file = %key,
                        rows = table.len(),
                        columns = table.columns().len(),
                        "ready"
                    );
                    loaded += 1;
                }
                None => warn!(file = %key, "skipped"),
            }
        }
        loaded
    }

    /// Every `*.csv` directly under the report directory, sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let pattern = format!("{}/*.csv", Pattern::escape(&self.dir.to_string_lossy()));
        let mut files = Vec::new();
        for entry in glob(&pattern).context("invalid glob pattern for report dir")? {
            match entry {
                Ok(p) if p.is_file() => files.push(p),
                Ok(_) => {}
                Err(e) => warn!("cannot read glob entry: {}", e),
            }
        }
        files.sort();
        Ok(files)
    }
}
