//! Error types for quote ingestion

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum QuoteError {
    /// No ingestor claims the path's extension
    #[error("unsupported format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// File content does not have the expected per-format shape
    #[error("parse error in {}{}: {message}", path.display(), line_suffix(*line))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    /// File missing or unreadable
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External text extraction failed (spawn, exit status, timeout)
    #[error("text extraction failed for {}: {message}", path.display())]
    Extract { path: PathBuf, message: String },
}

/// Coarse error classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    Parse,
    Io,
}

impl QuoteError {
    pub fn unsupported(path: impl AsRef<Path>) -> Self {
        Self::UnsupportedFormat {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(path: impl AsRef<Path>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn extract(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Extract {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Extraction failures are reported in the I/O class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Io { .. } | Self::Extract { .. } => ErrorKind::Io,
        }
    }

    /// Content defects never heal on their own; I/O may.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::UnsupportedFormat { path }
            | Self::Parse { path, .. }
            | Self::Io { path, .. }
            | Self::Extract { path, .. } => path,
        }
    }
}

fn line_suffix(line: Option<usize>) -> String {
    match line {
        Some(n) => format!(" (line {n})"),
        None => String::new(),
    }
}
