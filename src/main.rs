use anyhow::Context;
use clap::Parser;
use portcheck::cli::Args;
use portcheck::config::AppSettings;
use portcheck::output;
use portcheck::scanner::PortScanner;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => AppSettings::load_from(path)?,
        None => AppSettings::load()?,
    };
    let mut config = settings.scan_config()?;
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }

    let ports = args.port_range()?;
    if !args.udp && !args.tcp {
        output::print_warning("neither -t nor -u given, no ports will be probed");
    }

    let mut scanner = PortScanner::new(&args.host, args.udp, args.tcp, ports, config)
        .await
        .with_context(|| format!("cannot scan {}", args.host))?;
    scanner.scan().await;

    Ok(())
}

/// Logs go to stderr; stdout is reserved for result lines.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
