//! WrapMirror CLI - Command-line interface
//!
//! Creates a static mirror of the WrapDB v1 API contents under
//! `<output_directory>/v1-static/`.

mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use wrapmirror::mirror::{Mirror, MirrorConfig};

use crate::error::CliError;

/// Meson WrapDB v1 API contents mirror.
#[derive(Parser, Debug)]
#[command(name = "wrapmirror", version, about, long_about = None)]
struct Cli {
    /// Directory receiving the mirror tree.
    output_directory: PathBuf,
}

/// Run one mirror. Any error maps to a non-zero exit status.
fn run(config: &MirrorConfig) -> Result<(), CliError> {
    info!(path = %config.output_dir.display(), "Output directory");

    let mirror = Mirror::from_config(config)?;
    let report = mirror.run()?;

    info!(root = %mirror.layout().root().display(), "{}", report);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = wrapmirror::logging::init()
        .map_err(|e| CliError::Logging(e.to_string()))
        .and_then(|()| run(&MirrorConfig::new(cli.output_directory)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Logging(msg)) => {
            eprintln!("Error: failed to initialize logging: {}", msg);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_single_positional() {
        let cli = Cli::try_parse_from(["wrapmirror", "/srv/mirror"]).unwrap();
        assert_eq!(cli.output_directory, PathBuf::from("/srv/mirror"));
    }

    #[test]
    fn test_requires_output_directory() {
        assert!(Cli::try_parse_from(["wrapmirror"]).is_err());
    }

    #[test]
    fn test_unreachable_upstream_fails_run() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = MirrorConfig::new(temp.path().to_path_buf())
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(std::time::Duration::from_secs(5));

        let result = run(&config);

        assert!(matches!(result, Err(CliError::Mirror(_))));
        assert!(temp.path().join("v1-static").is_dir());
    }

    #[test]
    fn test_rejects_flags() {
        assert!(Cli::try_parse_from(["wrapmirror", "--base-url", "x", "/srv"]).is_err());
    }
}
