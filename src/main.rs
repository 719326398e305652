use clap::Parser;
use mmaictl::{dispatch, Cli, Config, Session};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Log filter for the given flags. Dependencies stay at warn so `-vv` shows
/// our own request tracing rather than connection-pool chatter.
fn log_filter(verbose: u8, quiet: bool) -> String {
    if quiet {
        return "off".to_string();
    }
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("warn,mmaictl={}", level)
}

fn setup_logging(session: &Session) {
    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(session.verbosity, session.quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(session.verbosity > 0)
        .without_time()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let session = cli.session(&config);

    setup_logging(&session);
    tracing::debug!("mmaictl {} started", mmaictl::VERSION);
    if let Some(e) = config_error {
        tracing::warn!("Ignoring config file: {:#}", e);
    }
    tracing::debug!("Using API at {}", session.base_url);

    let invocation = cli.command.into_invocation();
    let mut stdout = io::stdout().lock();

    match dispatch::run(&session, &invocation, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.status() != 0 {
                tracing::debug!("API returned HTTP {}", err.status());
            }
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
