use anyhow::{bail, Context, Result};
use hcsv::{logging, CsvCache};
use std::env;

/// Print one collected CSV file as JSON: an array of `{column: value}` objects.
fn main() -> Result<()> {
    logging::init("warn");

    let path = env::args()
        .nth(1)
        .context("Usage: csv_dump <FILE.csv>")?;

    let cache = CsvCache::new();
    let Some(table) = cache.get(&path) else {
        bail!("could not load {}", path);
    };

    println!("{}", serde_json::to_string_pretty(&*table)?);
    eprintln!(
        "→ {} rows, {} columns",
        table.len(),
        table.columns().len()
    );
    Ok(())
}
