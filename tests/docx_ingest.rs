use quote_engine::{ErrorKind, Ingestor, Quote, SplitPolicy, ingest::DocxIngestor};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored)
}

fn write_docx(dir: &Path, name: &str, body: &str) -> PathBuf {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("[Content_Types].xml", stored()).unwrap();
    zip.write_all(b"<?xml version=\"1.0\"?><Types/>").unwrap();
    zip.start_file("word/document.xml", stored()).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
    path
}

#[test]
fn reads_paragraphs_in_order_and_skips_empty_ones() {
    let dir = tempfile::tempdir().unwrap();
    let body = [
        para("War is peace. - Orwell"),
        "<w:p/>".to_string(),
        "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr></w:p>".to_string(),
        para("Bark at the moon - Luna"),
    ]
    .concat();
    let path = write_docx(dir.path(), "quotes.docx", &body);

    let quotes = DocxIngestor::default().parse(&path).unwrap();
    assert_eq!(
        quotes,
        vec![
            Quote::new("War is peace.", "Orwell"),
            Quote::new("Bark at the moon", "Luna"),
        ]
    );
}

#[test]
fn joins_runs_and_unescapes_entities() {
    let dir = tempfile::tempdir().unwrap();
    let body = concat!(
        "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>",
        "<w:r><w:rPr><w:b/></w:rPr><w:t>Fish &amp; chips </w:t></w:r>",
        "<w:r><w:t xml:space=\"preserve\">forever - </w:t></w:r>",
        "<w:r><w:t>Tom</w:t></w:r></w:p>",
    );
    let path = write_docx(dir.path(), "runs.docx", body);

    let quotes = DocxIngestor::default().parse(&path).unwrap();
    assert_eq!(quotes, vec![Quote::new("Fish & chips forever", "Tom")]);
}

#[test]
fn table_paragraphs_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>",
        para("Sit - Rex"),
        para("not a quote at all")
    );
    let path = write_docx(dir.path(), "table.docx", &body);

    let quotes = DocxIngestor::default().parse(&path).unwrap();
    assert_eq!(quotes, vec![Quote::new("Sit", "Rex")]);
}

#[test]
fn non_breaking_hyphen_counts_as_the_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let body = concat!(
        "<w:p><w:r><w:t xml:space=\"preserve\">Fetch the stick </w:t></w:r>",
        "<w:r><w:noBreakHyphen/></w:r>",
        "<w:r><w:t xml:space=\"preserve\"> Buddy</w:t></w:r></w:p>",
    );
    let path = write_docx(dir.path(), "nbh.docx", body);

    let quotes = DocxIngestor::default().parse(&path).unwrap();
    assert_eq!(quotes, vec![Quote::new("Fetch the stick", "Buddy")]);
}

#[test]
fn paragraph_with_several_delimiters_depends_on_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_docx(dir.path(), "hyphen.docx", &para("Stay - Jean-Luc"));

    let err = DocxIngestor::new(SplitPolicy::ExactlyOne).parse(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let quotes = DocxIngestor::new(SplitPolicy::First).parse(&path).unwrap();
    assert_eq!(quotes, vec![Quote::new("Stay", "Jean-Luc")]);
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_docx(dir.path(), "broken.docx", "<w:p><w:r><w:t>unclosed</w:r></w:p>");

    let err = DocxIngestor::default().parse(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn non_zip_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.docx");
    std::fs::write(&path, b"War is peace. - Orwell").unwrap();

    let err = DocxIngestor::default().parse(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn zip_without_document_part_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.docx");
    let mut zip = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
    zip.start_file("other.txt", stored()).unwrap();
    zip.write_all(b"hi").unwrap();
    zip.finish().unwrap();

    let err = DocxIngestor::default().parse(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn missing_file_is_io() {
    let dir = tempfile::tempdir().unwrap();
    let err = DocxIngestor::default()
        .parse(&dir.path().join("gone.docx"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
