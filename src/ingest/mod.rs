//! Format ingestors and the dispatcher that chooses between them.
//!
//! Every ingestor, including [`Dispatcher`], implements [`Ingestor`], so a
//! caller holding a `&dyn Ingestor` never needs to know which one it has.

pub mod csv;
pub mod dispatcher;
pub mod docx;
pub mod pdf;
pub mod text;

use crate::error::Result;
use crate::quote::Quote;
use std::path::Path;

pub use self::csv::CsvIngestor;
pub use dispatcher::{Dispatched, Dispatcher};
pub use docx::DocxIngestor;
pub use pdf::PdfIngestor;
pub use text::TextIngestor;

/// Capability contract shared by format ingestors and the dispatcher.
pub trait Ingestor: Send + Sync {
    /// Short human-readable name, used in logs and reports.
    fn name(&self) -> &str;

    /// Lowercase extensions, without the leading dot, this ingestor accepts.
    fn extensions(&self) -> &[&'static str];

    /// Whether `path` has one of [`Self::extensions`]. No I/O.
    fn can_ingest(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions().contains(&ext))
    }

    /// Read every quote in `path`, in document order.
    ///
    /// Fails with `UnsupportedFormat` when [`Self::can_ingest`] is false. A
    /// defect anywhere in the file fails the whole call.
    fn parse(&self, path: &Path) -> Result<Vec<Quote>>;
}

/// The substring after the last `.` of `path`, matched case-sensitively.
/// `None` when the path contains no `.`.
pub fn extension_of(path: &Path) -> Option<&str> {
    let s = path.to_str()?;
    s.rsplit_once('.').map(|(_, ext)| ext)
}
