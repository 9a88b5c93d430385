//! Per-container output session.
//!
//! A [`ContainerSession`] owns the output file of the container currently
//! being written. It decodes each payload line, tags the container with the
//! first matching [`Classifier`] label and appends the decoded text to the
//! file. Closing the session reports the line count and renames the file to
//! embed the label.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::classify::Classifier;
use crate::error::{Result, SplitError};
use crate::payload::LogLine;

/// Outcome of a closed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Container name taken from the boundary marker.
    pub container: String,
    /// Number of payload lines written.
    pub lines: u64,
    /// Detected classification label, if any.
    pub label: Option<String>,
    /// Final location of the output file.
    pub path: PathBuf,
}

/// An open output file for one container.
pub struct ContainerSession {
    container: String,
    dir: PathBuf,
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
    label: Option<String>,
}

impl ContainerSession {
    /// Announces and creates `<dir>/<container>.log`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the progress stream or the file cannot be
    /// written.
    pub fn open<W: Write>(dir: &Path, container: &str, progress: &mut W) -> Result<Self> {
        let path = dir.join(format!("{container}.log"));

        write!(progress, "Writing {} ... ", path.display())
            .and_then(|()| progress.flush())
            .map_err(|e| SplitError::io("failed to write progress for", &path, e))?;

        let file = File::create(&path).map_err(|e| SplitError::io("failed to create", &path, e))?;
        debug!(container, path = %path.display(), "opened container session");

        Ok(Self {
            container: container.to_string(),
            dir: dir.to_path_buf(),
            path,
            writer: BufWriter::new(file),
            lines: 0,
            label: None,
        })
    }

    /// Returns the container name.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Returns the number of payload lines written so far.
    #[must_use]
    pub const fn lines(&self) -> u64 {
        self.lines
    }

    /// Returns the detected label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Decodes one payload line and appends its text to the output file.
    ///
    /// Once a label has been detected, later lines are not classified again.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::MalformedPayload`] if the line does not decode,
    /// or an I/O error if the write fails.
    pub fn write_line(&mut self, raw: &[u8], line_no: u64, classifier: &Classifier) -> Result<()> {
        let LogLine { log } = LogLine::decode(raw, line_no)?;
        self.lines += 1;

        if self.label.is_none() {
            if let Some(label) = classifier.classify(&log) {
                debug!(container = %self.container, label, line = line_no, "detected container role");
                self.label = Some(label.to_string());
            }
        }

        self.writer
            .write_all(log.as_bytes())
            .map_err(|e| SplitError::io("failed to write", &self.path, e))
    }

    /// Reports the line count, closes the file and applies the label rename.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if flushing, reporting or renaming fails.
    pub fn close<W: Write>(self, progress: &mut W) -> Result<SessionSummary> {
        let Self {
            container,
            dir,
            path,
            writer,
            lines,
            label,
        } = self;

        let reported = match &label {
            Some(label) => writeln!(progress, "{lines} lines, detected: {label}"),
            None => writeln!(progress, "{lines} lines"),
        };
        reported.map_err(|e| SplitError::io("failed to write progress for", &path, e))?;

        let file = writer
            .into_inner()
            .map_err(|e| SplitError::io("failed to flush", &path, e.into_error()))?;
        drop(file);

        let path = match &label {
            Some(label) => {
                let renamed = dir.join(format!("{container}-{label}.log"));
                fs::rename(&path, &renamed)
                    .map_err(|e| SplitError::io("failed to rename", &path, e))?;
                debug!(container = %container, from = %path.display(), to = %renamed.display(), "renamed classified output");
                renamed
            }
            None => path,
        };

        Ok(SessionSummary {
            container,
            lines,
            label,
            path,
        })
    }
}
