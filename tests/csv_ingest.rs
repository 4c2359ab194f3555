use quote_engine::{ErrorKind, Ingestor, Quote, QuoteError, ingest::CsvIngestor};
use std::path::{Path, PathBuf};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn reads_rows_by_column_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "quotes.csv",
        "body,author\nWar is peace.,Orwell\n\"Treat yo self, always\",Fluffles\n",
    );

    let quotes = CsvIngestor.parse(&path).unwrap();
    assert_eq!(
        quotes,
        vec![
            Quote::new("War is peace.", "Orwell"),
            Quote::new("Treat yo self, always", "Fluffles"),
        ]
    );
}

#[test]
fn column_order_and_extra_columns_do_not_matter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "reordered.csv",
        "id,author,body\n1, Orwell ,War is peace. \n",
    );

    let quotes = CsvIngestor.parse(&path).unwrap();
    assert_eq!(quotes, vec![Quote::new("War is peace.", "Orwell")]);
}

#[test]
fn missing_author_column_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "noauthor.csv", "body,writer\nWar is peace.,Orwell\n");

    let err = CsvIngestor.parse(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("author"));
}

#[test]
fn header_names_are_case_sensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "upper.csv", "Body,Author\nx,y\n");
    assert_eq!(CsvIngestor.parse(&path).unwrap_err().kind(), ErrorKind::Parse);
}

#[test]
fn ragged_row_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "ragged.csv", "body,author\na,b\nc\n");

    let err = CsvIngestor.parse(&path).unwrap_err();
    assert!(matches!(err, QuoteError::Parse { line: Some(3), .. }));
}

#[test]
fn half_empty_row_is_rejected_but_blank_row_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let blank = write(dir.path(), "blank.csv", "body,author\na,b\n , \nc,d\n");
    assert_eq!(CsvIngestor.parse(&blank).unwrap().len(), 2);

    let half = write(dir.path(), "half.csv", "body,author\na,\n");
    assert_eq!(CsvIngestor.parse(&half).unwrap_err().kind(), ErrorKind::Parse);
}

#[test]
fn missing_file_is_io() {
    let dir = tempfile::tempdir().unwrap();
    let err = CsvIngestor.parse(&dir.path().join("gone.csv")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
