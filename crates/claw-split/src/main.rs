//! claw-split binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use claw_split::cli::{usage, Cli};
use claw_split::{SplitError, Splitter};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            tracing::debug!(error = %e.render(), "argument parsing failed");
            return fail(&SplitError::Usage(usage(&bin_name())));
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn run(cli: &Cli) -> Result<(), SplitError> {
    let config = cli.resolve_config()?;
    let splitter = Splitter::new(&config);

    let mut stdout = io::stdout().lock();
    splitter.run(&cli.input, &mut stdout)?;
    Ok(())
}

fn fail(err: &SplitError) -> ExitCode {
    eprintln!("ERROR: {err}");
    ExitCode::FAILURE
}

fn bin_name() -> String {
    std::env::args()
        .next()
        .unwrap_or_else(|| "claw-split".to_string())
}
