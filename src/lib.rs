//! # portcheck - concurrent TCP/UDP port checker
//!
//! Probes a host over a range of ports and names the protocol each open
//! port speaks, using shallow signature matching on whatever the service
//! sends back.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portcheck::scanner::{PortScanner, ScanConfig};
//! use portcheck::types::PortRange;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ports: PortRange = "20-25".parse()?;
//!     let mut scanner =
//!         PortScanner::new("127.0.0.1", false, true, ports, ScanConfig::default()).await?;
//!     scanner.scan().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`probes`] - request payloads sent to coax a reply out of a service
//! - [`recognizer`] - classifies response bytes by signature
//! - [`scanner`] - target resolution, worker pool and per-transport probers
//! - [`config`] - settings file handling
//! - [`output`] - result sinks and console messages
//! - [`error`] - error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod probes;
pub mod recognizer;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ScanError};
pub use recognizer::{recognize, Protocol};
pub use scanner::{PortScanner, ProbeResult, Prober, ScanConfig, Transport};
pub use types::{Port, PortRange, ScanTarget};
