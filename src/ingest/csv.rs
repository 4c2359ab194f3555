use super::Ingestor;
use crate::error::{QuoteError, Result};
use crate::quote::Quote;
use std::path::Path;
use tracing::debug;

pub const BODY_COLUMN: &str = "body";
pub const AUTHOR_COLUMN: &str = "author";

/// CSV with a header row naming `body` and `author` columns.
///
/// Columns are looked up by name, so their position and any extra columns
/// don't matter.
#[derive(Default)]
pub struct CsvIngestor;

impl CsvIngestor {
    pub const EXTENSIONS: &'static [&'static str] = &["csv"];
}

impl Ingestor for CsvIngestor {
    fn name(&self) -> &str {
        "csv"
    }

    fn extensions(&self) -> &[&'static str] {
        Self::EXTENSIONS
    }

    fn parse(&self, path: &Path) -> Result<Vec<Quote>> {
        if !self.can_ingest(path) {
            return Err(QuoteError::unsupported(path));
        }

        let file = std::fs::File::open(path).map_err(|e| QuoteError::io(path, e))?;
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
        let column = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                QuoteError::parse(path, Some(1), format!("header is missing required column '{name}'"))
            })
        };
        let body_idx = column(BODY_COLUMN)?;
        let author_idx = column(AUTHOR_COLUMN)?;

        let mut quotes = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            let line = record.position().map(|p| p.line() as usize);
            let body = record.get(body_idx).unwrap_or("").trim();
            let author = record.get(author_idx).unwrap_or("").trim();

            match (body.is_empty(), author.is_empty()) {
                (true, true) => continue,
                (true, false) => return Err(QuoteError::parse(path, line, "empty quote body")),
                (false, true) => return Err(QuoteError::parse(path, line, "empty quote author")),
                (false, false) => quotes.push(Quote::new(body, author)),
            }
        }

        debug!("csv {}: {} quotes", path.display(), quotes.len());
        Ok(quotes)
    }
}

fn csv_error(path: &Path, err: ::csv::Error) -> QuoteError {
    let line = err.position().map(|p| p.line() as usize);
    match err.into_kind() {
        ::csv::ErrorKind::Io(e) => QuoteError::io(path, e),
        kind => QuoteError::parse(path, line, describe(&kind)),
    }
}

fn describe(kind: &::csv::ErrorKind) -> String {
    match kind {
        ::csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8: {err}"),
        ::csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("row has {len} fields, header has {expected_len}"),
        other => format!("{other:?}"),
    }
}
