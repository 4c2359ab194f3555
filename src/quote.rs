use serde::{Deserialize, Serialize};
use std::fmt;

/// Author used when a quote is built without attribution.
pub const DEFAULT_AUTHOR: &str = "unknown";

/// Separator between body and author in every line-oriented source.
/// There is no escape for a literal `-` inside either field.
pub const QUOTE_DELIMITER: char = '-';

/// A normalized (body, author) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    body: String,
    author: String,
}

impl Quote {
    pub fn new(body: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            author: author.into(),
        }
    }

    pub fn anonymous(body: impl Into<String>) -> Self {
        Self::new(body, DEFAULT_AUTHOR)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.body, self.author)
    }
}

/// How a line with other than exactly one delimiter is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Zero or several delimiters is an error.
    #[default]
    ExactlyOne,
    /// Split at the first delimiter; the rest of the line is the author.
    First,
}

/// Split `"<body> - <author>"` into a quote. Both halves are trimmed and must
/// be non-empty. The error string describes the defect; callers attach the
/// path and line.
pub fn split_quote(line: &str, policy: SplitPolicy) -> std::result::Result<Quote, String> {
    let (body, author) = match policy {
        SplitPolicy::ExactlyOne => {
            let count = line.matches(QUOTE_DELIMITER).count();
            if count != 1 {
                return Err(format!(
                    "expected exactly one '{QUOTE_DELIMITER}' separating body and author, found {count}"
                ));
            }
            line.split_once(QUOTE_DELIMITER)
        }
        SplitPolicy::First => line.split_once(QUOTE_DELIMITER),
    }
    .ok_or_else(|| format!("missing '{QUOTE_DELIMITER}' separating body and author"))?;

    let body = body.trim();
    let author = author.trim();
    if body.is_empty() {
        return Err("empty quote body".to_string());
    }
    if author.is_empty() {
        return Err("empty quote author".to_string());
    }
    Ok(Quote::new(body, author))
}

/// Apply the quote convention to every non-blank line of `text`.
/// Returns the 1-based line number with the error message on failure.
pub fn parse_lines(text: &str, policy: SplitPolicy) -> std::result::Result<Vec<Quote>, (usize, String)> {
    let mut quotes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let quote = split_quote(line, policy).map_err(|msg| (idx + 1, msg))?;
        quotes.push(quote);
    }
    Ok(quotes)
}
