//! CSV dataset loading
//!
//! Loading is all-or-nothing: a malformed row fails the whole load instead of producing a
//! partially populated dataset.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{PulseError, Result};
use crate::record::{Dataset, Record, Value};

/// How raw cell text is turned into [`Value`]s
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Typing {
    /// Keep every cell as text (empty cells stay empty text)
    #[default]
    Raw,
    /// Infer numbers, booleans and missing cells
    Auto,
}

impl Typing {
    pub fn apply(self, raw: &str) -> Value {
        match self {
            Typing::Raw => Value::Text(raw.to_string()),
            Typing::Auto => Value::infer(raw),
        }
    }
}

/// Options for [`load_csv`] and [`read_csv`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    pub typing: Typing,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            typing: Typing::Raw,
            delimiter: b',',
        }
    }
}

impl LoadOptions {
    pub fn raw() -> Self {
        Self::default()
    }

    pub fn auto_typed() -> Self {
        Self {
            typing: Typing::Auto,
            ..Self::default()
        }
    }
}

/// Load a dataset from a CSV file with a header row.
pub fn load_csv(path: impl AsRef<Path>, options: LoadOptions) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PulseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_csv(file, options)?;
    tracing::info!(
        path = %path.display(),
        records = dataset.len(),
        columns = dataset.columns().len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Read a dataset from any CSV source with a header row.
pub fn read_csv<R: Read>(reader: R, options: LoadOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(PulseError::NoColumns);
    }

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let raw = result?;
        if raw.len() != columns.len() {
            return Err(PulseError::RowWidth {
                row,
                expected: columns.len(),
                found: raw.len(),
            });
        }
        records.push(Record::new(
            raw.iter().map(|cell| options.typing.apply(cell)).collect(),
        ));
    }

    tracing::debug!(records = records.len(), "csv parsed");
    Dataset::new(columns, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Choose your gender,Age,Do you have Depression?
Female, 18 ,Yes
Male,21,No
";

    #[test]
    fn raw_keeps_text_and_trims() {
        let ds = read_csv(SAMPLE.as_bytes(), LoadOptions::raw()).unwrap();
        assert_eq!(ds.len(), 2);
        let age = ds.field("Age");
        assert_eq!(ds.records()[0].get(age), &Value::Text("18".into()));
    }

    #[test]
    fn auto_typed_infers_numbers() {
        let ds = read_csv(SAMPLE.as_bytes(), LoadOptions::auto_typed()).unwrap();
        let age = ds.field("Age");
        assert_eq!(ds.records()[1].get(age).as_number(), Some(21.0));
    }

    #[test]
    fn ragged_row_fails_whole_load() {
        let input = "a,b\n1,2\n3\n";
        let err = read_csv(input.as_bytes(), LoadOptions::raw()).unwrap_err();
        assert!(matches!(err, PulseError::RowWidth { row: 1, .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_csv("does/not/exist.csv", LoadOptions::raw()).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
