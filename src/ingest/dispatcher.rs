use super::{CsvIngestor, DocxIngestor, Ingestor, PdfIngestor, TextIngestor};
use crate::config::Config;
use crate::error::{QuoteError, Result};
use crate::quote::Quote;
use crate::report::{IngestReport, SourceReport, SourceStatus};
use crate::util::now_rfc3339;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of [`Dispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Parsed { ingestor: String, quotes: Vec<Quote> },
    /// No registered ingestor claims the path.
    Unsupported { path: PathBuf },
}

impl Dispatched {
    /// Empty for unsupported paths.
    pub fn quotes(&self) -> &[Quote] {
        match self {
            Self::Parsed { quotes, .. } => quotes,
            Self::Unsupported { .. } => &[],
        }
    }

    pub fn into_quotes(self) -> Vec<Quote> {
        match self {
            Self::Parsed { quotes, .. } => quotes,
            Self::Unsupported { .. } => Vec::new(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Probes registered ingestors in priority order and delegates to the first
/// that claims a path.
///
/// Registration order is the priority. If two ingestors accept the same
/// extension the later one is never reached for it.
pub struct Dispatcher {
    ingestors: Vec<Box<dyn Ingestor>>,
    extensions: Vec<&'static str>,
}

impl Dispatcher {
    /// The default registry: docx, csv, pdf, txt.
    pub fn new(cfg: &Config) -> Self {
        let split = cfg.ingest.split;
        Self::from_ingestors(vec![
            Box::new(DocxIngestor::new(split)),
            Box::new(CsvIngestor),
            Box::new(PdfIngestor::new(&cfg.pdf, split)),
            Box::new(TextIngestor::new(split)),
        ])
    }

    pub fn from_ingestors(ingestors: Vec<Box<dyn Ingestor>>) -> Self {
        let mut dispatcher = Self {
            ingestors: Vec::with_capacity(ingestors.len()),
            extensions: Vec::new(),
        };
        for ingestor in ingestors {
            dispatcher.register(ingestor);
        }
        dispatcher
    }

    /// Append an ingestor at the lowest priority.
    pub fn register(&mut self, ingestor: Box<dyn Ingestor>) {
        for &ext in ingestor.extensions() {
            if self.extensions.contains(&ext) {
                warn!(
                    "ingestor '{}' is shadowed for .{} by an earlier registration",
                    ingestor.name(),
                    ext
                );
            } else {
                self.extensions.push(ext);
            }
        }
        self.ingestors.push(ingestor);
    }

    pub fn ingestors(&self) -> impl Iterator<Item = &dyn Ingestor> {
        self.ingestors.iter().map(|i| i.as_ref())
    }

    /// First registered ingestor that claims `path`.
    pub fn resolve(&self, path: &Path) -> Option<&dyn Ingestor> {
        self.ingestors
            .iter()
            .find(|i| i.can_ingest(path))
            .map(|i| i.as_ref())
    }

    /// Like [`Ingestor::parse`], but an unclaimed path is an
    /// `Unsupported` outcome with no quotes instead of an error.
    pub fn dispatch(&self, path: &Path) -> Result<Dispatched> {
        let Some(ingestor) = self.resolve(path) else {
            warn!("unsupported file: {}", path.display());
            return Ok(Dispatched::Unsupported {
                path: path.to_path_buf(),
            });
        };
        debug!("{} -> {}", path.display(), ingestor.name());
        let quotes = ingestor.parse(path)?;
        Ok(Dispatched::Parsed {
            ingestor: ingestor.name().to_string(),
            quotes,
        })
    }

    /// Dispatch every source in order. Unsupported sources are reported and
    /// skipped; any other failure aborts.
    pub fn ingest_all<P: AsRef<Path>>(&self, sources: &[P]) -> Result<(Vec<Quote>, IngestReport)> {
        let started = now_rfc3339();
        let mut all = Vec::new();
        let mut reports = Vec::with_capacity(sources.len());

        for source in sources {
            let path = source.as_ref();
            let report = match self.dispatch(path)? {
                Dispatched::Parsed { ingestor, quotes } => {
                    let report = SourceReport {
                        path: path.display().to_string(),
                        ingestor: Some(ingestor),
                        status: SourceStatus::Parsed,
                        quotes: quotes.len(),
                    };
                    all.extend(quotes);
                    report
                }
                Dispatched::Unsupported { .. } => SourceReport {
                    path: path.display().to_string(),
                    ingestor: None,
                    status: SourceStatus::Unsupported,
                    quotes: 0,
                },
            };
            reports.push(report);
        }

        info!("ingested {} quotes from {} sources", all.len(), sources.len());
        let report = IngestReport {
            started,
            finished: now_rfc3339(),
            total_quotes: all.len(),
            sources: reports,
        };
        Ok((all, report))
    }
}

impl Ingestor for Dispatcher {
    fn name(&self) -> &str {
        "dispatcher"
    }

    fn extensions(&self) -> &[&'static str] {
        &self.extensions
    }

    fn can_ingest(&self, path: &Path) -> bool {
        self.ingestors.iter().any(|i| i.can_ingest(path))
    }

    fn parse(&self, path: &Path) -> Result<Vec<Quote>> {
        match self.dispatch(path)? {
            Dispatched::Parsed { quotes, .. } => Ok(quotes),
            Dispatched::Unsupported { path } => Err(QuoteError::UnsupportedFormat { path }),
        }
    }
}
