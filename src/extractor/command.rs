use super::{ExtractorDiag, TextExtractor};
use crate::config::{Capture, Pdf};
use crate::error::{QuoteError, Result};
use anyhow::{anyhow, Context};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
// how long to wait for pipe readers once the child has exited or been killed
const PIPE_GRACE: Duration = Duration::from_millis(250);

/// Runs an external program (by default `pdftotext -layout`) per document.
pub struct CommandExtractor {
    cfg: Pdf,
}

impl CommandExtractor {
    pub fn new(cfg: &Pdf) -> Self {
        Self { cfg: cfg.clone() }
    }

    fn temp_dir(&self) -> PathBuf {
        if self.cfg.temp_dir.is_empty() {
            std::env::temp_dir()
        } else {
            PathBuf::from(&self.cfg.temp_dir)
        }
    }

    fn render_args(&self, input: &Path, output: Option<&Path>) -> Result<Vec<String>> {
        let wants_output = self.cfg.args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER));
        match (output, wants_output) {
            (Some(_), false) => {
                return Err(QuoteError::extract(
                    input,
                    format!("capture=tempfile requires an argument containing {OUTPUT_PLACEHOLDER}"),
                ));
            }
            (None, true) => {
                return Err(QuoteError::extract(
                    input,
                    format!("{OUTPUT_PLACEHOLDER} is only available with capture=tempfile"),
                ));
            }
            _ => {}
        }

        let input_str = input.display().to_string();
        let output_str = output.map(|p| p.display().to_string()).unwrap_or_default();
        Ok(self
            .cfg
            .args
            .iter()
            .map(|a| {
                a.replace(INPUT_PLACEHOLDER, &input_str)
                    .replace(OUTPUT_PLACEHOLDER, &output_str)
            })
            .collect())
    }

    /// Spawns the program with `args` and waits for it, bounded by `limit`.
    fn exec(&self, args: &[String], limit: Option<Duration>) -> anyhow::Result<Output> {
        debug!(program = %self.cfg.program, ?args, "running text extractor");
        let mut child = Command::new(&self.cfg.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning {}", self.cfg.program))?;

        match limit {
            Some(limit) => wait_bounded(&mut child, limit),
            None => child
                .wait_with_output()
                .with_context(|| format!("waiting for {}", self.cfg.program)),
        }
    }

    fn run(&self, input: &Path, args: &[String]) -> Result<Output> {
        let output = self
            .exec(args, seconds(self.cfg.timeout_seconds))
            .map_err(|e| QuoteError::extract(input, format!("{e:#}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(QuoteError::extract(
                input,
                format!("{} exited with {}: {}", self.cfg.program, output.status, stderr.trim()),
            ));
        }
        if !output.stderr.is_empty() {
            debug!(
                "extractor stderr {}: {}",
                input.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output)
    }
}

impl TextExtractor for CommandExtractor {
    fn doctor(&self) -> ExtractorDiag {
        let run = self.exec(&self.cfg.version_args, seconds(self.cfg.doctor_timeout_seconds));
        match run {
            Ok(out) => {
                // poppler prints its version banner on stderr
                let banner = if out.stdout.is_empty() { &out.stderr } else { &out.stdout };
                let version = String::from_utf8_lossy(banner)
                    .lines()
                    .next()
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty());
                ExtractorDiag {
                    program: self.cfg.program.clone(),
                    version,
                    ok: out.status.success(),
                    error: (!out.status.success())
                        .then(|| format!("{} exited with {}", self.cfg.program, out.status)),
                }
            }
            Err(e) => ExtractorDiag {
                program: self.cfg.program.clone(),
                version: None,
                ok: false,
                error: Some(format!("{e:#}")),
            },
        }
    }

    fn extract_text(&self, input: &Path) -> Result<String> {
        let bytes = match self.cfg.capture {
            Capture::Stdout => {
                let args = self.render_args(input, None)?;
                self.run(input, &args)?.stdout
            }
            Capture::Tempfile => {
                let dir = self.temp_dir();
                // Unique per call and removed when dropped, on every return path.
                let scratch = tempfile::Builder::new()
                    .prefix("quote-engine-")
                    .suffix(".txt")
                    .tempfile_in(&dir)
                    .map_err(|e| QuoteError::io(&dir, e))?
                    .into_temp_path();
                let args = self.render_args(input, Some(&*scratch))?;
                self.run(input, &args)?;
                std::fs::read(&scratch).map_err(|e| QuoteError::io(&scratch, e))?
            }
        };

        String::from_utf8(bytes)
            .map_err(|e| QuoteError::extract(input, format!("extractor output is not UTF-8: {e}")))
    }
}

fn seconds(n: u64) -> Option<Duration> {
    (n > 0).then(|| Duration::from_secs(n))
}

type Drained = Receiver<std::io::Result<Vec<u8>>>;

/// Reads a child pipe to EOF on a detached thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drained {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let read = match pipe {
            Some(mut p) => p.read_to_end(&mut buf).map(|_| buf),
            None => Ok(buf),
        };
        let _ = tx.send(read);
    });
    rx
}

fn collect(rx: &Drained, until: Instant) -> Option<std::io::Result<Vec<u8>>> {
    rx.recv_timeout(until.saturating_duration_since(Instant::now())).ok()
}

/// Waits for `child` at most `limit`, killing it once the limit passes.
///
/// The pipe readers are never joined. Anything the child spawned inherits
/// its stdout and stderr and may hold them open long after the child is
/// gone, so output is only collected up to the deadline.
fn wait_bounded(child: &mut Child, limit: Duration) -> anyhow::Result<Output> {
    let deadline = Instant::now() + limit;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = loop {
        if let Some(status) = child.try_wait().context("polling extractor")? {
            break status;
        }
        if Instant::now() >= deadline {
            warn!("text extractor still running after {limit:?}, killing it");
            let _ = child.kill();
            child.wait().context("reaping killed extractor")?;
            let stderr = collect(&stderr, Instant::now() + PIPE_GRACE)
                .and_then(|r| r.ok())
                .unwrap_or_default();
            return Err(anyhow!(
                "extractor timed out after {limit:?}; stderr: {}",
                String::from_utf8_lossy(&stderr).trim()
            ));
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    let until = deadline.max(Instant::now() + PIPE_GRACE);
    match (collect(&stdout, until), collect(&stderr, until)) {
        (Some(out), Some(err)) => Ok(Output {
            status,
            stdout: out.context("reading extractor stdout")?,
            stderr: err.context("reading extractor stderr")?,
        }),
        _ => {
            warn!("text extractor exited with {status} but its output stayed open");
            Err(anyhow!(
                "extractor timed out after {limit:?}: exited with {status} but a leftover process kept its output open"
            ))
        }
    }
}
