// src/table/mod.rs
use anyhow::{Context, Result};
use csv::StringRecord;
use serde::{de::DeserializeOwned, Serialize, Serializer};
use std::{collections::HashMap, sync::Arc};

pub mod decode;
pub mod utils;

pub use decode::decode;

/// Header names in file order plus a name → position index, shared by every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Columns {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Columns {
    /// `names` must already be unique.
    pub(crate) fn new(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self { names, index }
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn header(&self) -> StringRecord {
        self.names.iter().collect()
    }
}

/// One data row: column name → cell value, in header order.
///
/// Every record of a table shares the table's column list, so a lookup by
/// any header name always succeeds (possibly with `""`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    columns: Arc<Columns>,
    values: Vec<String>,
}

impl Record {
    pub(crate) fn new(columns: Arc<Columns>, values: Vec<String>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Cell value for `column`, or `None` if the file had no such header.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .position(column)
            .map(|i| self.values[i].as_str())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns.names
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.columns
            .names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Map this record onto a typed attribute bag by column name.
    ///
    /// Columns the type does not name are ignored. An empty cell reads as
    /// `None` for `Option` fields, and numeric fields are parsed from the text.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        self.deserialize_with(&self.columns.header())
    }

    fn deserialize_with<T: DeserializeOwned>(&self, header: &StringRecord) -> Result<T> {
        let fields: StringRecord = self.values.iter().collect();
        fields
            .deserialize(Some(header))
            .context("mapping record onto typed fields")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// All data rows of one CSV file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Arc<Columns>,
    rows: Vec<Record>,
}

impl Table {
    pub(crate) fn new(columns: Arc<Columns>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// Column names from the header row, with duplicates collapsed.
    pub fn columns(&self) -> &[String] {
        &self.columns.names
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    /// Every value of one column, top to bottom. Empty if the column is unknown.
    pub fn column(&self, name: &str) -> impl Iterator<Item = &str> + '_ {
        let idx = self.columns.position(name);
        self.rows
            .iter()
            .filter_map(move |r| idx.map(|i| r.values[i].as_str()))
    }

    /// Deserialize every row into `T`, failing on the first row that does not fit.
    pub fn records<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let header = self.columns.header();
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                r.deserialize_with(&header)
                    .with_context(|| format!("row {}", i))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.rows)
    }
}
