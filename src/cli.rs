//! Command-line interface definitions for portcheck.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use crate::error::CliResult;
use crate::types::PortRange;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// A tool for checking open ports.
#[derive(Parser, Debug)]
#[command(name = "portcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A tool for checking open ports", long_about = None)]
pub struct Args {
    /// The host to scan for open ports
    #[arg(value_name = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Use UDP protocol
    #[arg(short = 'u')]
    pub udp: bool,

    /// Use TCP protocol
    #[arg(short = 't')]
    pub tcp: bool,

    /// Ports to scan: START END, a single PORT, or START-END
    #[arg(short, long, num_args = 1.., required = true, value_name = "PORT")]
    pub ports: Vec<String>,

    /// Maximum number of concurrent probes (overrides the settings file)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// The inclusive port range named by `--ports`.
    pub fn port_range(&self) -> CliResult<PortRange> {
        Ok(PortRange::from_tokens(self.ports.as_slice())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::types::PortError;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).unwrap()
    }

    #[test]
    fn test_start_end_pair() {
        let args = parse(&["portcheck", "example.ru", "-t", "-u", "-p", "20", "25"]);
        assert_eq!(args.host, "example.ru");
        assert!(args.tcp && args.udp);
        assert_eq!(args.port_range().unwrap().to_string(), "20-25");
    }

    #[test]
    fn test_default_host() {
        let args = parse(&["portcheck", "-t", "--ports", "80"]);
        assert_eq!(args.host, "127.0.0.1");
        assert!(!args.udp);
        assert_eq!(args.port_range().unwrap().len(), 1);
    }

    #[test]
    fn test_ports_required() {
        assert!(Args::try_parse_from(["portcheck", "-t"]).is_err());
    }

    #[test]
    fn test_too_many_port_tokens() {
        let args = parse(&["portcheck", "-t", "-p", "1", "2", "3"]);
        assert!(matches!(
            args.port_range(),
            Err(CliError::Ports(PortError::WrongTokenCount(3)))
        ));
    }

    #[test]
    fn test_inverted_range() {
        let args = parse(&["portcheck", "-t", "-p", "100", "10"]);
        assert!(matches!(
            args.port_range(),
            Err(CliError::Ports(PortError::InvalidRange(100, 10)))
        ));
    }

    #[test]
    fn test_verbosity_and_overrides() {
        let args = parse(&["portcheck", "-vv", "-t", "-w", "50", "-p", "1", "1024"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.workers, Some(50));
    }
}
