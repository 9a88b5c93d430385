//! Line source and dispatcher.
//!
//! [`Splitter`] reads the aggregated stream line by line. A boundary marker
//! closes the open [`ContainerSession`] and opens the next one; every other
//! non-empty line is handed to the open session.

use std::fs::{DirBuilder, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::classify::Classifier;
use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::marker::MarkerParser;
use crate::session::{ContainerSession, SessionSummary};

/// Summary of a finished run, one entry per container in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Closed sessions.
    pub sessions: Vec<SessionSummary>,
    /// Malformed payload lines skipped (only in skip mode).
    pub skipped: u64,
}

impl SplitReport {
    /// Total payload lines written across all sessions.
    #[must_use]
    pub fn total_lines(&self) -> u64 {
        self.sessions.iter().map(|s| s.lines).sum()
    }

    /// Number of sessions that received a label.
    #[must_use]
    pub fn classified(&self) -> usize {
        self.sessions.iter().filter(|s| s.label.is_some()).count()
    }
}

/// Splits an aggregated log stream into per-container files.
#[derive(Debug, Clone)]
pub struct Splitter {
    marker: MarkerParser,
    classifier: Classifier,
    output_dir: PathBuf,
    skip_malformed: bool,
}

impl Splitter {
    /// Creates a splitter from a validated configuration.
    #[must_use]
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            marker: config.marker_parser(),
            classifier: config.classifier(),
            output_dir: config.output_dir.clone(),
            skip_malformed: config.skip_malformed,
        }
    }

    /// Returns the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Opens `input`, creates the output directory and splits the file.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; see [`Splitter::split`].
    pub fn run<W: Write>(&self, input: &Path, progress: &mut W) -> Result<SplitReport> {
        let file = File::open(input).map_err(|e| SplitError::io("failed to open", input, e))?;
        create_output_dir(&self.output_dir)?;

        debug!(input = %input.display(), output_dir = %self.output_dir.display(), "splitting");
        self.split(BufReader::new(file), progress)
    }

    /// Splits a stream into per-container files under the output directory.
    ///
    /// The output directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns the first read, marker, payload or file error. Sessions closed
    /// before the error keep their files; the open session's file holds what
    /// was written so far.
    pub fn split<R: BufRead, W: Write>(&self, mut input: R, progress: &mut W) -> Result<SplitReport> {
        let mut report = SplitReport::default();
        let mut current: Option<ContainerSession> = None;
        let mut buf = Vec::new();
        let mut line_no = 0u64;

        loop {
            buf.clear();
            line_no += 1;
            let read = input
                .read_until(b'\n', &mut buf)
                .map_err(|source| SplitError::Read { line: line_no, source })?;
            if read == 0 {
                break;
            }
            let line = trim_line_ending(&buf);

            if self.marker.is_marker(line) {
                if let Some(session) = current.take() {
                    report.sessions.push(session.close(progress)?);
                }
                let name = self.marker.container_name(line, line_no)?;
                current = Some(ContainerSession::open(&self.output_dir, &name, progress)?);
                continue;
            }

            if line.is_empty() {
                continue;
            }

            let Some(session) = current.as_mut() else {
                return Err(SplitError::PayloadBeforeMarker { line: line_no });
            };

            match session.write_line(line, line_no, &self.classifier) {
                Ok(()) => {}
                Err(SplitError::MalformedPayload { line: at, source }) if self.skip_malformed => {
                    warn!(line = at, container = session.container(), error = %source, "skipping malformed payload line");
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(session) = current.take() {
            report.sessions.push(session.close(progress)?);
        }

        info!(
            containers = report.sessions.len(),
            classified = report.classified(),
            lines = report.total_lines(),
            skipped = report.skipped,
            "split complete"
        );
        Ok(report)
    }
}

/// Creates the output directory and any missing parents.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn create_output_dir(dir: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|e| SplitError::io("failed to create directory", dir, e))
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
