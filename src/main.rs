//! OLM bundle generator
//!
//! Entry point: parses the command line, sets up tracing and runs a single
//! bundle generation.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use olm_bundle_generator::{
    cli::{Cli, LogFormat},
    BundleGenerator, Outcome,
};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout
            let usage_error = err.use_stderr();
            let _ = err.print();
            return if usage_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.log_format);

    match run(&cli) {
        Ok(Outcome::Published { csv_file, .. }) => {
            info!("Bundle complete: {}", csv_file.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::AlreadyPublished { .. }) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    let generator = BundleGenerator::new(cli.bundle_config());
    let csv_name = generator.config().operator.csv_name();
    generator
        .run()
        .with_context(|| format!("failed to generate bundle {}", csv_name))
}

/// Initialize tracing subscriber
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
