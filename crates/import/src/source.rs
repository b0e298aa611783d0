//! Reads the four-column transaction file: `title, type, value, category`.

use csv::{StringRecord, StringRecordsIntoIter, Trim};
use std::io::Read;

use crate::error::ImportError;

const FIELD_COUNT: usize = 4;

/// One data row with every field trimmed. `title`, `kind` and `value` are
/// non-empty; `category` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub title: String,
    pub kind: String,
    pub value: String,
    pub category: String,
}

impl RawRow {
    /// `Ok(None)` when a required field is blank; the row is dropped.
    fn from_record(record: &StringRecord) -> Result<Option<RawRow>, ImportError> {
        if record.len() != FIELD_COUNT {
            return Err(ImportError::MalformedRecord {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                fields: record.len(),
            });
        }

        let field = |i: usize| record.get(i).unwrap_or_default();
        let (title, kind, value, category) = (field(0), field(1), field(2), field(3));

        if title.is_empty() || kind.is_empty() || value.is_empty() {
            return Ok(None);
        }

        Ok(Some(RawRow {
            title: title.to_string(),
            kind: kind.to_string(),
            value: value.to_string(),
            category: category.to_string(),
        }))
    }
}

/// Everything read from one source: the rows plus the category column,
/// index-aligned with `rows`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedBatch {
    pub rows: Vec<RawRow>,
    pub category_titles: Vec<String>,
}

impl ParsedBatch {
    fn push(mut self, row: RawRow) -> Self {
        self.category_titles.push(row.category.clone());
        self.rows.push(row);
        self
    }
}

/// Lazy, single-pass sequence of rows. The first record is always treated
/// as a header.
pub struct RowSource<R> {
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> RowSource<R> {
    pub fn new(data: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(data);

        Self {
            records: reader.into_records(),
        }
    }

    /// Consumes the whole source. Stops at the first structural error.
    pub fn drain(mut self) -> Result<ParsedBatch, ImportError> {
        self.try_fold(ParsedBatch::default(), |batch, row| -> Result<_, ImportError> {
            Ok(batch.push(row?))
        })
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = Result<RawRow, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };

            match RawRow::from_record(&record) {
                Ok(Some(row)) => return Some(Ok(row)),
                Ok(None) => {
                    tracing::trace!(
                        line = record.position().map(|p| p.line()),
                        "row missing a required field, skipped"
                    );
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
