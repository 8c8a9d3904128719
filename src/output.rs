//! Output of probe results and user-facing messages.
//!
//! Result lines go to stdout as plain text, one per open port, in the order
//! probes finish. Diagnostics go to stderr with styling.

use crate::scanner::ProbeResult;
use console::style;
use std::io::{self, Write};
use std::sync::Mutex;

/// Receives each probe result as soon as it is known.
///
/// Called concurrently from many probe tasks; implementations must keep
/// each result whole.
pub trait ResultSink: Send + Sync {
    fn emit(&self, result: &ProbeResult);
}

/// Writes `"{PROTO}: {port} {label}"` lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn emit(&self, result: &ProbeResult) {
        // One locked write per line keeps concurrent results from interleaving.
        let line = format!("{}\n", result);
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!("failed to write result line: {}", e);
        }
    }
}

/// Keeps results in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    results: Mutex<Vec<ProbeResult>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn results(&self) -> Vec<ProbeResult> {
        self.results
            .lock()
            .map(|results| results.clone())
            .unwrap_or_default()
    }
}

impl ResultSink for CollectingSink {
    fn emit(&self, result: &ProbeResult) {
        if let Ok(mut results) = self.results.lock() {
            results.push(*result);
        }
    }
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("[-]").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("[!]").yellow().bold(), msg);
}
