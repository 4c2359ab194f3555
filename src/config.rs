use crate::quote::SplitPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: Ingest,
    #[serde(default)]
    pub pdf: Pdf,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingest {
    pub split: SplitPolicy,
    /// Files ingested by `quote-engine ingest` when no `--input` is given.
    pub sources: Vec<String>,
}
impl Default for Ingest {
    fn default() -> Self {
        Self {
            split: SplitPolicy::ExactlyOne,
            sources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capture {
    /// Read the extracted text from the child's stdout.
    Stdout,
    /// Hand the child a scoped temp file path via `{output}` and read it back.
    Tempfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pdf {
    pub program: String,
    /// Argument templates; `{input}` and `{output}` are substituted per call.
    pub args: Vec<String>,
    /// Arguments used by `doctor` to print the program version.
    pub version_args: Vec<String>,
    pub capture: Capture,
    /// 0 disables the bound.
    pub timeout_seconds: u64,
    /// Bound for the `doctor` version check; 0 disables it.
    pub doctor_timeout_seconds: u64,
    /// Directory for tempfile capture; empty means the system temp dir.
    pub temp_dir: String,
    pub normalize_unicode: bool,
    pub collapse_whitespace: bool,
}
impl Default for Pdf {
    fn default() -> Self {
        Self {
            program: "pdftotext".into(),
            args: vec!["-layout".into(), "{input}".into(), "-".into()],
            version_args: vec!["-v".into()],
            capture: Capture::Stdout,
            timeout_seconds: 30,
            doctor_timeout_seconds: 10,
            temp_dir: "".into(),
            normalize_unicode: true,
            collapse_whitespace: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "quote-engine.log".into(),
        }
    }
}
