//! # claw-split
//!
//! Splits an aggregated multi-container log stream into one file per
//! container and tags each container with its role.
//!
//! The input is the concatenation of container runtime log files, each
//! preceded by a `tail`-style header:
//!
//! ```text
//! ==> /var/log/pods/<namespace>_<pod>_<uid>/<container>/0.log <==
//! {"log":"I0301 10:00:00.000000 1 template.go:246] Starting template router\n","stream":"stderr"}
//! ```
//!
//! Each header opens a [`ContainerSession`] writing `containers/<container>.log`.
//! The decoded `log` text of every following line is appended to it, and the
//! first [`Classifier`] rule that matches gives the container a label. When the
//! session closes, a labelled file is renamed to `<container>-<label>.log`.
//!
//! ```rust
//! use claw_split::Classifier;
//!
//! let classifier = Classifier::builtin();
//! assert_eq!(classifier.classify("Starting template router (v3.9)"), Some("router"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod marker;
pub mod payload;
pub mod session;
pub mod splitter;

pub use classify::{Classifier, Rule, BUILTIN_RULES};
pub use cli::Cli;
pub use config::SplitConfig;
pub use error::{Result, SplitError};
pub use marker::MarkerParser;
pub use payload::LogLine;
pub use session::{ContainerSession, SessionSummary};
pub use splitter::{create_output_dir, SplitReport, Splitter};
