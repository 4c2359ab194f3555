//! Quote ingestion: turn txt, csv, docx and pdf files into `Quote` records.
//!
//! Each format has an [`ingest::Ingestor`]; the [`ingest::Dispatcher`] picks
//! the first one that claims a path and implements the same trait.

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod quote;
pub mod report;
pub mod util;

pub use error::{ErrorKind, QuoteError, Result};
pub use ingest::{Dispatched, Dispatcher, Ingestor};
pub use quote::{Quote, SplitPolicy};
