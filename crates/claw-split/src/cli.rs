//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

use crate::config::SplitConfig;
use crate::error::Result;

/// Split an aggregated container log into one file per container.
#[derive(Parser, Debug, Clone)]
#[command(name = "claw-split")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Aggregated log file, e.g. the output of `tail -n +1 /var/log/pods/*/*/*.log`.
    #[arg(value_name = "containers.log")]
    pub input: PathBuf,

    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory receiving the per-container files [default: containers].
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Warn about and skip malformed payload lines instead of aborting.
    #[arg(long)]
    pub skip_malformed: bool,
}

impl Cli {
    /// Resolves the effective configuration: file (or defaults), then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn resolve_config(&self) -> Result<SplitConfig> {
        let mut config = match &self.config {
            Some(path) => SplitConfig::from_file(path)?,
            None => SplitConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if self.skip_malformed {
            config.skip_malformed = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// One-line usage summary reported for argument errors.
#[must_use]
pub fn usage(bin: &str) -> String {
    format!("{bin} [OPTIONS] <containers.log>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_input() {
        let cli = Cli::parse_from(["claw-split", "containers.log"]);
        assert_eq!(cli.input, PathBuf::from("containers.log"));
        assert!(cli.config.is_none());
        assert!(cli.output_dir.is_none());
        assert!(!cli.skip_malformed);
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "claw-split",
            "--output-dir",
            "out",
            "--skip-malformed",
            "-c",
            "split.toml",
            "all.log",
        ]);
        assert_eq!(cli.input, PathBuf::from("all.log"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.config, Some(PathBuf::from("split.toml")));
        assert!(cli.skip_malformed);
    }

    #[test]
    fn rejects_missing_input() {
        assert!(Cli::try_parse_from(["claw-split"]).is_err());
    }

    #[test]
    fn rejects_two_inputs() {
        assert!(Cli::try_parse_from(["claw-split", "a.log", "b.log"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["claw-split", "-o", "split", "--skip-malformed", "in.log"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("split"));
        assert!(config.skip_malformed);
        assert_eq!(config.marker_token, "==>");
    }

    #[test]
    fn flags_override_config_file() {
        use std::ffi::OsStr;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split.toml");
        std::fs::write(&path, "output_dir = \"from-file\"\nname_segment = 3\n").unwrap();

        let cli = Cli::parse_from([
            OsStr::new("claw-split"),
            OsStr::new("-c"),
            path.as_os_str(),
            OsStr::new("-o"),
            OsStr::new("from-flag"),
            OsStr::new("in.log"),
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("from-flag"));
        assert_eq!(config.name_segment, 3);
    }

    #[test]
    fn usage_line() {
        assert_eq!(usage("claw-split"), "claw-split [OPTIONS] <containers.log>");
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
