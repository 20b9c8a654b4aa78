//! In-memory cache of collected health-check CSV files.
//!
//! Collection scripts leave one CSV file per data set in a report directory.
//! Report code asks [`CsvCache`] for a path; the first request reads and
//! decodes the file and later requests are served from memory.

pub mod cache;
pub mod config;
pub mod logging;
pub mod report;
pub mod table;

pub use cache::{CsvCache, FsSource, Source};
pub use config::Settings;
pub use report::{Collection, DataSet, NasVmcInfo};
pub use table::{Record, Table};
