use crate::{
    config::Config,
    extractor::{CommandExtractor, TextExtractor},
    ingest::{Dispatcher, Ingestor},
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "quote-engine")]
#[command(about = "Ingest attributed quotes from txt, csv, docx and pdf files")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./quote-engine.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the PDF text extractor can run.
    Doctor {},
    /// Show which ingestor claims each path, without reading it.
    Check {
        #[arg(long, required = true)]
        input: Vec<PathBuf>,
    },
    /// Ingest quotes and print them as JSON.
    Ingest {
        /// Files to ingest; defaults to `ingest.sources` from the config.
        #[arg(long)]
        input: Vec<PathBuf>,
        /// Print the ingestion report instead of the quotes.
        #[arg(long)]
        report: bool,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Doctor {} => doctor(&cfg),
        Command::Check { input } => check(&cfg, input),
        Command::Ingest { input, report } => ingest(&cfg, input, *report),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("quote-engine.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries JSON results, so console logs go to stderr
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = Path::new(&cfg.logging.file_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let extractor = CommandExtractor::new(&cfg.pdf);
    let diag = extractor.doctor();
    println!("{}", serde_json::to_string_pretty(&diag)?);
    if !diag.ok {
        return Err(anyhow!(
            "text extractor '{}' is not usable: {}",
            diag.program,
            diag.error.as_deref().unwrap_or("unknown failure")
        ));
    }
    Ok(())
}

fn check(cfg: &Config, inputs: &[PathBuf]) -> Result<()> {
    let dispatcher = Dispatcher::new(cfg);
    let rows: Vec<_> = inputs
        .iter()
        .map(|path| {
            serde_json::json!({
                "path": path,
                "supported": dispatcher.can_ingest(path),
                "ingestor": dispatcher.resolve(path).map(|i| i.name().to_string()),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn ingest(cfg: &Config, inputs: &[PathBuf], want_report: bool) -> Result<()> {
    let sources: Vec<PathBuf> = if inputs.is_empty() {
        cfg.ingest.sources.iter().map(PathBuf::from).collect()
    } else {
        inputs.to_vec()
    };
    if sources.is_empty() {
        return Err(anyhow!("no inputs: pass --input or set ingest.sources"));
    }

    let dispatcher = Dispatcher::new(cfg);
    let (quotes, report) = dispatcher
        .ingest_all(&sources)
        .with_context(|| "ingesting quotes")?;

    if want_report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&quotes)?);
    }
    Ok(())
}
