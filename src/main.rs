use anyhow::Context;
use clap::Parser;
use romsync::commands::sync::{error_hint, run_with_progress};
use romsync::config::Cli;
use romsync::ui::{render_report, ProgressReporter};
use romsync::Config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let json = cli.json;
    let quiet = cli.quiet;

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli).context("invalid configuration")?;
    tracing::debug!("romsync v{} with {:?}", romsync::VERSION, config);

    let mut progress = if quiet || json {
        ProgressReporter::hidden()
    } else {
        ProgressReporter::new()
    };

    let report = run_with_progress(&config, &mut progress).map_err(|err| {
        if let Some(hint) = error_hint(&err) {
            eprintln!("hint: {}", hint);
        }
        anyhow::Error::new(err)
    })?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        );
    } else {
        println!("{}", render_report(&report, &config));
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise -q, -v and -vv pick the level
fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("romsync={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
