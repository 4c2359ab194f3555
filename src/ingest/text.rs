use super::Ingestor;
use crate::error::{QuoteError, Result};
use crate::quote::{parse_lines, Quote, SplitPolicy};
use std::path::Path;
use tracing::debug;

/// Plain UTF-8 text, one `body - author` quote per non-blank line.
pub struct TextIngestor {
    split: SplitPolicy,
}

impl TextIngestor {
    pub const EXTENSIONS: &'static [&'static str] = &["txt"];

    pub fn new(split: SplitPolicy) -> Self {
        Self { split }
    }
}

impl Default for TextIngestor {
    fn default() -> Self {
        Self::new(SplitPolicy::default())
    }
}

impl Ingestor for TextIngestor {
    fn name(&self) -> &str {
        "text"
    }

    fn extensions(&self) -> &[&'static str] {
        Self::EXTENSIONS
    }

    fn parse(&self, path: &Path) -> Result<Vec<Quote>> {
        if !self.can_ingest(path) {
            return Err(QuoteError::unsupported(path));
        }

        let bytes = std::fs::read(path).map_err(|e| QuoteError::io(path, e))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| QuoteError::parse(path, None, format!("file is not valid UTF-8: {e}")))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        let quotes = parse_lines(text, self.split)
            .map_err(|(line, msg)| QuoteError::parse(path, Some(line), msg))?;
        debug!("text {}: {} quotes", path.display(), quotes.len());
        Ok(quotes)
    }
}
