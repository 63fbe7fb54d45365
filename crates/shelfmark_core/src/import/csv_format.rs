//! CSV codec for title import/export files.
//!
//! Headers are matched after trimming and ASCII case folding, so `title`,
//! ` TITLE ` and `Title` are the same column. Cell values are trimmed.

use crate::import::{ImportError, ImportResult, ImportRow};
use crate::model::title::Title;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::io::{Read, Write};

pub const TITLE_COLUMN: &str = "Title";
pub const AUTHOR_COLUMN: &str = "Author";
pub const GENRE_COLUMN: &str = "Genre";
pub const DEFAULT_LOCATION_COLUMN: &str = "Default_Location";

const EXPORT_HEADERS: [&str; 4] = [
    TITLE_COLUMN,
    AUTHOR_COLUMN,
    GENRE_COLUMN,
    DEFAULT_LOCATION_COLUMN,
];

#[derive(Debug, Clone, Copy)]
struct ColumnIndexes {
    title: usize,
    author: usize,
    genre: usize,
    default_location: usize,
}

/// Reads every data row of a title CSV.
///
/// # Errors
/// - `MissingColumn` when any of the four required headers is absent.
/// - `Csv` on malformed input.
pub fn read_import_rows<R: Read>(reader: R) -> ImportResult<Vec<ImportRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let columns = resolve_columns(csv_reader.headers()?)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(ImportRow {
            name: cell(&record, columns.title),
            creator: cell(&record, columns.author),
            category: cell(&record, columns.genre),
            default_location: cell(&record, columns.default_location),
        });
    }
    Ok(rows)
}

/// Writes titles in import shape, preserving the given order.
pub fn write_titles<W: Write>(writer: W, titles: &[Title]) -> ImportResult<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;
    for title in titles {
        csv_writer.write_record([
            title.name.as_str(),
            title.creator.as_str(),
            title.category.as_str(),
            title.default_location.as_deref().unwrap_or(""),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn resolve_columns(headers: &StringRecord) -> ImportResult<ColumnIndexes> {
    let find = |column: &'static str| -> ImportResult<usize> {
        headers
            .iter()
            .position(|header| normalize_header(header) == normalize_header(column))
            .ok_or(ImportError::MissingColumn(column))
    };

    Ok(ColumnIndexes {
        title: find(TITLE_COLUMN)?,
        author: find(AUTHOR_COLUMN)?,
        genre: find(GENRE_COLUMN)?,
        default_location: find(DEFAULT_LOCATION_COLUMN)?,
    })
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_ascii_lowercase()
}

fn cell(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").trim().to_string()
}
