//! In-memory tabular data exchanged with the pipeline as CSV.
//!
//! Columns are typed by inference when a CSV is read: a column whose present values all
//! parse as integers is an integer column, as numbers a float column, as `True`/`False`
//! a boolean column, anything else text. Missing cells are kept as [`Cell::Missing`]
//! in every column type.

use crate::constants::CSV_NA_VALUE;
use crate::errors::{Result, StorageError};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Spellings treated as missing in addition to the configured tokens
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// CSV field for this cell; floats keep a decimal point so they re-read as floats
    fn to_field(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) if v.is_nan() => String::new(),
            Cell::Float(v) => format!("{v:?}"),
            Cell::Text(v) => v.clone(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, "NaN"),
            other => write!(f, "{}", other.to_field()),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

/// Options for reading CSV text into a [`Table`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Extra tokens read as missing values
    pub na_values: Vec<String>,
    /// Also treat [`DEFAULT_NA_VALUES`] as missing
    pub keep_default_na: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            na_values: vec![CSV_NA_VALUE.to_string()],
            keep_default_na: true,
        }
    }
}

impl CsvOptions {
    pub fn is_na(&self, field: &str) -> bool {
        self.na_values.iter().any(|na| na == field)
            || (self.keep_default_na && DEFAULT_NA_VALUES.contains(&field))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

fn parse_bool(field: &str) -> Option<bool> {
    match field {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

fn infer_kind<'a>(mut values: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
    if values.clone().all(|v| v.parse::<i64>().is_ok()) {
        ColumnKind::Int
    } else if values.clone().all(|v| v.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if values.all(|v| parse_bool(v).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

fn convert(field: &str, kind: ColumnKind) -> Cell {
    // `infer_kind` already checked every present value parses as `kind`
    match kind {
        ColumnKind::Int => field.parse().map_or(Cell::Missing, Cell::Int),
        ColumnKind::Float => field.parse().map_or(Cell::Missing, Cell::Float),
        ColumnKind::Bool => parse_bool(field).map_or(Cell::Missing, Cell::Bool),
        ColumnKind::Text => Cell::Text(field.to_string()),
    }
}

/// Named columns over rows of [`Cell`]s
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(StorageError::Parse(format!(
                "Row has {} cells but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let index = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Parse CSV text with a header row
    pub fn from_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
        if columns.is_empty() {
            return Err(StorageError::Parse("CSV has no header row".to_string()));
        }

        let mut raw: Vec<Vec<Option<String>>> = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            raw.push(
                record
                    .iter()
                    .map(|field| (!options.is_na(field)).then(|| field.to_string()))
                    .collect(),
            );
        }

        let kinds: Vec<ColumnKind> = (0..columns.len())
            .map(|i| infer_kind(raw.iter().filter_map(move |row| row[i].as_deref())))
            .collect();

        let rows = raw
            .into_iter()
            .map(|row| {
                row.iter()
                    .zip(&kinds)
                    .map(|(field, kind)| {
                        field
                            .as_deref()
                            .map_or(Cell::Missing, |value| convert(value, *kind))
                    })
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Write CSV with a header row and no index column
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(Cell::to_field))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}
