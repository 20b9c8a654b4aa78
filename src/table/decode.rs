use anyhow::{bail, Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::{collections::HashMap, io::Cursor, sync::Arc};
use tracing::{debug, trace};

use super::{utils::cell, Columns, Record, Table};

/// Decode a whole CSV file held in memory into a [`Table`].
///
/// The first record is the header. Ragged rows are accepted: missing
/// trailing cells become `""`, cells past the header are dropped. When a
/// header name repeats, the column keeps its first position and takes the
/// value of its last occurrence.
pub fn decode(bytes: &[u8]) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // rows may be shorter or longer than the header
        .from_reader(Cursor::new(bytes));

    let raw_headers = rdr.byte_headers().context("reading header row")?.clone();
    if raw_headers.is_empty() {
        bail!("missing header row");
    }

    let (columns, sources) = resolve_columns(&raw_headers);
    let columns = Arc::new(Columns::new(columns));
    debug!(columns = columns.len(), "decoded header");

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    while rdr
        .read_byte_record(&mut record)
        .with_context(|| format!("reading record {}", rows.len() + 1))?
    {
        if record.len() != raw_headers.len() {
            trace!(
                row = rows.len(),
                fields = record.len(),
                expected = raw_headers.len(),
                "ragged row"
            );
        }
        let values = sources
            .iter()
            .map(|&i| record.get(i).map(cell).unwrap_or_default())
            .collect();
        rows.push(Record::new(Arc::clone(&columns), values));
    }

    Ok(Table::new(columns, rows))
}

/// Unique column names in header order, plus the field index each one reads from.
fn resolve_columns(raw: &ByteRecord) -> (Vec<String>, Vec<usize>) {
    let mut columns: Vec<String> = Vec::with_capacity(raw.len());
    let mut sources: Vec<usize> = Vec::with_capacity(raw.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (idx, field) in raw.iter().enumerate() {
        let mut name = cell(field);
        if idx == 0 {
            name = name.trim_start_matches('\u{feff}').to_string();
        }
        match seen.get(&name) {
            Some(&pos) => sources[pos] = idx,
            None => {
                seen.insert(name.clone(), columns.len());
                columns.push(name);
                sources.push(idx);
            }
        }
    }

    (columns, sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(table: &Table, i: usize) -> Vec<(&str, &str)> {
        table.rows()[i].iter().collect()
    }

    #[test]
    fn short_rows_are_backfilled() -> Result<()> {
        let table = decode(b"a,b,c\n1,2,3\n4,5\n")?;
        assert_eq!(table.columns(), ["a", "b", "c"]);
        assert_eq!(table.len(), 2);
        assert_eq!(row(&table, 0), vec![("a", "1"), ("b", "2"), ("c", "3")]);
        assert_eq!(row(&table, 1), vec![("a", "4"), ("b", "5"), ("c", "")]);
        Ok(())
    }

    #[test]
    fn long_rows_are_truncated_to_header() -> Result<()> {
        let table = decode(b"a,b\n1,2,3,4\n")?;
        assert_eq!(row(&table, 0), vec![("a", "1"), ("b", "2")]);
        Ok(())
    }

    #[test]
    fn quoted_headers_and_cells() -> Result<()> {
        let table = decode(b"\"x\",\"y\"\n\"1\",\"2\"\n")?;
        assert_eq!(table.columns(), ["x", "y"]);
        assert_eq!(row(&table, 0), vec![("x", "1"), ("y", "2")]);
        Ok(())
    }

    #[test]
    fn doubled_quotes_lose_one_layer() -> Result<()> {
        // PowerShell exports sometimes double-wrap values
        let table = decode(b"\"\"\"Name\"\"\"\n\"\"\"srv01\"\"\"\n")?;
        assert_eq!(table.columns(), ["Name"]);
        assert_eq!(row(&table, 0), vec![("Name", "srv01")]);
        Ok(())
    }

    #[test]
    fn embedded_commas_and_newlines_survive() -> Result<()> {
        let table = decode(b"path,note\n\"C:\\a,b\",\"line1\nline2\"\n")?;
        assert_eq!(
            row(&table, 0),
            vec![("path", "C:\\a,b"), ("note", "line1\nline2")]
        );
        Ok(())
    }

    #[test]
    fn crlf_bom_and_blank_lines() -> Result<()> {
        let table = decode(b"\xef\xbb\xbfid,name\r\n1,one\r\n\r\n2,two\r\n")?;
        assert_eq!(table.columns(), ["id", "name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].get("name"), Some("two"));
        Ok(())
    }

    #[test]
    fn unterminated_quote_is_best_effort() -> Result<()> {
        let table = decode(b"a,b\n1,\"never closed\n")?;
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get("a"), Some("1"));
        assert!(table.rows()[0].get("b").unwrap().starts_with("never closed"));
        Ok(())
    }

    #[test]
    fn values_are_never_coerced() -> Result<()> {
        let table = decode(b"size,when\n1.234,5\n007,2024/12/14\n")?;
        assert_eq!(table.rows()[0].get("size"), Some("1.234"));
        assert_eq!(table.rows()[1].get("size"), Some("007"));
        assert_eq!(table.rows()[1].get("when"), Some("2024/12/14"));
        Ok(())
    }

    #[test]
    fn duplicate_header_keeps_last_value() -> Result<()> {
        let table = decode(b"a,b,a\n1,2,3\n")?;
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(row(&table, 0), vec![("a", "3"), ("b", "2")]);
        Ok(())
    }

    #[test]
    fn header_only_file_has_no_rows() -> Result<()> {
        let table = decode(b"a,b\n")?;
        assert_eq!(table.columns(), ["a", "b"]);
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(decode(b"").is_err());
    }
}
