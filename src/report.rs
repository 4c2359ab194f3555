use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub started: String,
    pub finished: String,
    pub total_quotes: usize,
    pub sources: Vec<SourceReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    pub path: String,
    pub ingestor: Option<String>,
    pub status: SourceStatus,
    pub quotes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Parsed,
    Unsupported,
}
