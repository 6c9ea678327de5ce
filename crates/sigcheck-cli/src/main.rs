//! sigcheck - verify a signing bundle against an artifact digest
//!
//! Prints nothing and exits 0 when the bundle verifies. Any failure is
//! printed to stderr and exits 1.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use sigcheck_verify::config::Settings;
use sigcheck_verify::VerifierContext;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sigcheck", about = "Verify Sigstore signing bundles", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log more detail to stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify BUNDLE for the artifact with the hex digest DIGEST
    Verify {
        digest: String,
        bundle: PathBuf,

        /// Settings file
        #[arg(long, env = "SIGCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Trusted root JSON, over the settings file's
        #[arg(long, env = "SIGCHECK_TRUSTED_ROOT")]
        trusted_root: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Verify {
            digest,
            bundle,
            config,
            trusted_root,
        } => {
            let settings = Settings::resolve(config.as_deref(), trusted_root)
                .context("failed to load settings")?;
            let context = VerifierContext::from_settings(&settings)?;
            let result = context.verify(&digest, &bundle)?;
            tracing::info!(
                san = result.san().unwrap_or_default(),
                issuer = result.issuer().unwrap_or_default(),
                verification_time = result.verification_time,
                "bundle verified"
            );
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
