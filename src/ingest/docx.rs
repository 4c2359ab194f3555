use super::Ingestor;
use crate::error::{QuoteError, Result};
use crate::quote::{split_quote, Quote, SplitPolicy};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Word (OOXML) documents, one quote per non-empty body paragraph.
pub struct DocxIngestor {
    split: SplitPolicy,
}

impl DocxIngestor {
    pub const EXTENSIONS: &'static [&'static str] = &["docx"];

    pub fn new(split: SplitPolicy) -> Self {
        Self { split }
    }
}

impl Default for DocxIngestor {
    fn default() -> Self {
        Self::new(SplitPolicy::default())
    }
}

impl Ingestor for DocxIngestor {
    fn name(&self) -> &str {
        "docx"
    }

    fn extensions(&self) -> &[&'static str] {
        Self::EXTENSIONS
    }

    fn parse(&self, path: &Path) -> Result<Vec<Quote>> {
        if !self.can_ingest(path) {
            return Err(QuoteError::unsupported(path));
        }

        let xml = read_document_part(path)?;
        let paragraphs = body_paragraphs(&xml).map_err(|msg| QuoteError::parse(path, None, msg))?;

        let mut quotes = Vec::new();
        for (idx, text) in paragraphs.iter().enumerate() {
            if text.trim().is_empty() {
                continue;
            }
            // paragraph numbers stand in for line numbers
            let quote = split_quote(text, self.split)
                .map_err(|msg| QuoteError::parse(path, Some(idx + 1), msg))?;
            quotes.push(quote);
        }

        debug!("docx {}: {} quotes", path.display(), quotes.len());
        Ok(quotes)
    }
}

fn read_document_part(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|e| QuoteError::io(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| zip_error(path, e))?;
    let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| zip_error(path, e))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            QuoteError::parse(path, None, format!("{DOCUMENT_PART}: {e}"))
        } else {
            QuoteError::io(path, e)
        }
    })?;
    Ok(xml)
}

fn zip_error(path: &Path, err: ZipError) -> QuoteError {
    match err {
        ZipError::Io(e) => QuoteError::io(path, e),
        ZipError::FileNotFound => {
            QuoteError::parse(path, None, format!("not a word document: missing {DOCUMENT_PART}"))
        }
        other => QuoteError::parse(path, None, format!("invalid docx container: {other}")),
    }
}

/// Plain text of every paragraph directly in the document body, in order.
///
/// Tables and text boxes are skipped. Tabs render as `\t`, line breaks as a
/// space, non-breaking hyphens as `-`.
fn body_paragraphs(xml: &str) -> std::result::Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut nested = 0usize;
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested += 1,
                b"p" if nested == 0 => current = Some(String::new()),
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested = nested.saturating_sub(1),
                b"p" if nested == 0 => {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if nested > 0 {
                    continue;
                }
                match e.local_name().as_ref() {
                    b"p" => paragraphs.push(String::new()),
                    // tab stops in paragraph properties are also named `tab`
                    b"tab" if in_run => push(&mut current, "\t"),
                    b"br" | b"cr" if in_run => push(&mut current, " "),
                    b"noBreakHyphen" if in_run => push(&mut current, "-"),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_text && nested == 0 {
                    let text = e.unescape().map_err(|err| err.to_string())?;
                    push(&mut current, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed {DOCUMENT_PART} at byte {}: {e}",
                    reader.error_position()
                ));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push(current: &mut Option<String>, text: &str) {
    if let Some(buf) = current.as_mut() {
        buf.push_str(text);
    }
}
