use super::Ingestor;
use crate::config::Pdf;
use crate::error::{QuoteError, Result};
use crate::extractor::{CommandExtractor, TextExtractor};
use crate::quote::{parse_lines, Quote, SplitPolicy};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("static pattern"));

/// PDF documents, converted to text by an external extractor and then read
/// line by line like plain text.
pub struct PdfIngestor {
    extractor: Box<dyn TextExtractor>,
    split: SplitPolicy,
    normalize_unicode: bool,
    collapse_whitespace: bool,
}

impl PdfIngestor {
    pub const EXTENSIONS: &'static [&'static str] = &["pdf"];

    pub fn new(cfg: &Pdf, split: SplitPolicy) -> Self {
        Self::with_extractor(Box::new(CommandExtractor::new(cfg)), split)
            .normalize_unicode(cfg.normalize_unicode)
            .collapse_whitespace(cfg.collapse_whitespace)
    }

    /// Use a custom extractor. Text cleanup defaults to off.
    pub fn with_extractor(extractor: Box<dyn TextExtractor>, split: SplitPolicy) -> Self {
        Self {
            extractor,
            split,
            normalize_unicode: false,
            collapse_whitespace: false,
        }
    }

    /// NFKC-normalize extracted text (folds ligatures such as `ﬁ`).
    pub fn normalize_unicode(mut self, on: bool) -> Self {
        self.normalize_unicode = on;
        self
    }

    /// Collapse runs of layout padding inside a line to a single space.
    pub fn collapse_whitespace(mut self, on: bool) -> Self {
        self.collapse_whitespace = on;
        self
    }

    fn clean(&self, mut text: String) -> String {
        if self.normalize_unicode {
            text = text.nfkc().collect::<String>();
        }
        if self.collapse_whitespace {
            text = text
                .lines()
                .map(|l| SPACE_RUNS.replace_all(l, " ").into_owned())
                .collect::<Vec<_>>()
                .join("\n");
        }
        text
    }
}

impl Ingestor for PdfIngestor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extensions(&self) -> &[&'static str] {
        Self::EXTENSIONS
    }

    fn parse(&self, path: &Path) -> Result<Vec<Quote>> {
        if !self.can_ingest(path) {
            return Err(QuoteError::unsupported(path));
        }
        if !path.is_file() {
            return Err(QuoteError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }

        let raw = self.extractor.extract_text(path)?;
        let text = self.clean(raw);

        let quotes = parse_lines(&text, self.split)
            .map_err(|(line, msg)| QuoteError::parse(path, Some(line), msg))?;
        debug!("pdf {}: {} quotes", path.display(), quotes.len());
        Ok(quotes)
    }
}
