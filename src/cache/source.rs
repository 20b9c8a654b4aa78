use std::{fs, io};

/// Where the cache gets file bytes from.
///
/// `CsvCache` calls this at most once per key between clears, always while
/// holding its lock.
pub trait Source: Send + Sync {
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Reads straight from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl Source for FsSource {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}
