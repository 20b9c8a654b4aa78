// src/cache/mod.rs
use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{error, info, warn};

use crate::table::{decode, Table};

pub mod source;

pub use source::{FsSource, Source};

/// Load-once, serve-many cache of CSV files keyed by the caller's path string.
///
/// Paths are not canonicalised: `a.csv` and `./a.csv` are two entries. The
/// first `get`/`load` of a key reads and decodes the file; every later call
/// returns the same `Arc<Table>` until [`CsvCache::clear`].
///
/// One mutex guards the whole map, and file reads happen while it is held.
/// Loads of different files therefore run one after another, and a key is
/// never read twice or observed half-built.
pub struct CsvCache<S: Source = FsSource> {
    source: S,
    tables: Mutex<HashMap<String, Arc<Table>>>,
}

impl CsvCache<FsSource> {
    /// Empty cache reading from the file system.
    pub fn new() -> Self {
        Self::with_source(FsSource)
    }
}

impl Default for CsvCache<FsSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Source> CsvCache<S> {
    /// Empty cache reading through `source`.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Make sure `path` is cached. Returns `false` if the file is missing or
    /// could not be decoded; nothing is cached in that case, so a later call
    /// tries the disk again.
    pub fn load(&self, path: &str) -> bool {
        let mut tables = self.lock();
        self.load_locked(&mut tables, path).is_some()
    }

    /// The table for `path`, loading it on first use. `None` when it cannot be loaded.
    pub fn get(&self, path: &str) -> Option<Arc<Table>> {
        let mut tables = self.lock();
        if let Some(table) = tables.get(path) {
            return Some(Arc::clone(table));
        }
        self.load_locked(&mut tables, path)
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic elsewhere cannot leave a half-inserted entry, so a poisoned map is still valid.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Table>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_locked(
        &self,
        tables: &mut HashMap<String, Arc<Table>>,
        path: &str,
    ) -> Option<Arc<Table>> {
        if let Some(table) = tables.get(path) {
            return Some(Arc::clone(table));
        }

        match self.read_table(path) {
            Ok(table) => {
                let table = Arc::new(table);
                info!(
                    path,
                    rows = table.len(),
                    columns = table.columns().len(),
                    "loaded csv"
                );
                tables.insert(path.to_string(), Arc::clone(&table));
                Some(table)
            }
            Err(e) if is_not_found(&e) => {
                warn!(path, "csv file not found");
                None
            }
            Err(e) => {
                error!(path, "error loading csv: {:#}", e);
                None
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn read_table(&self, path: &str) -> Result<Table> {
        let bytes = self
            .source
            .read(path)
            .with_context(|| format!("reading {}", path))?;
        decode(&bytes).with_context(|| format!("decoding {}", path))
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    })
}
