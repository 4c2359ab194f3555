//! External text extraction for binary formats.

pub mod command;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use command::CommandExtractor;

/// Converts a document into layout-preserving plain text.
pub trait TextExtractor: Send + Sync {
    /// Report whether the extractor can run at all.
    fn doctor(&self) -> ExtractorDiag;

    /// Extract the full text of `input`. Lines follow the document layout.
    fn extract_text(&self, input: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorDiag {
    pub program: String,
    pub version: Option<String>,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}
