//! Prober trait abstraction.
//!
//! One implementation per transport. A prober owns everything needed to
//! check a single port and is shared read-only by every probe task.

use crate::recognizer::Protocol;
use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Transport protocol used for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Tcp,
    Udp,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

/// Outcome of a probe that found something listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub transport: Transport,
    pub port: Port,
    /// Recognized protocol; `None` for an open port that could not be named.
    pub protocol: Option<Protocol>,
}

impl ProbeResult {
    pub fn new(transport: Transport, port: Port, protocol: Option<Protocol>) -> Self {
        Self {
            transport,
            port,
            protocol,
        }
    }
}

/// Renders the console line, e.g. `TCP: 22 SSH` or `UDP: 5353`.
impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.transport, self.port)?;
        if let Some(protocol) = self.protocol {
            write!(f, " {}", protocol)?;
        }
        Ok(())
    }
}

/// Trait for per-transport probe implementations.
///
/// `probe` never fails: socket errors are contained and turn into `None`,
/// which reads the same as a closed port.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Transport this prober speaks.
    fn transport(&self) -> Transport;

    /// Address being probed.
    fn target(&self) -> Ipv4Addr;

    /// Check a single port.
    async fn probe(&self, port: Port) -> Option<ProbeResult>;
}
