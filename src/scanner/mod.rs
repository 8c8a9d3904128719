//! Scanner module - resolves the target and fans probes out over a bounded
//! worker pool.
//!
//! One probe task is submitted per (port, transport) pair. Tasks share no
//! mutable state; each owns its socket and reports its own result through
//! a [`ResultSink`] the moment it is known.

pub mod pool;
pub mod tcp;
pub mod traits;
pub mod udp;

use crate::error::{ScanError, ScanResult};
use crate::output::{ConsoleSink, ResultSink};
use crate::types::{Port, PortRange, ScanTarget};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub use pool::WorkerPool;
pub use tcp::TcpProber;
pub use traits::{ProbeResult, Prober, Transport};
pub use udp::UdpProber;

/// Default number of probes running at once.
pub const DEFAULT_WORKERS: usize = 10;

/// Tunables for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Worker pool capacity.
    pub workers: usize,
    /// TCP handshake deadline.
    pub tcp_connect_timeout: Duration,
    /// Deadline for the first read on a connected TCP port.
    pub tcp_read_timeout: Duration,
    /// Deadline for a reply to each UDP payload.
    pub udp_recv_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            tcp_connect_timeout: Duration::from_secs(1),
            tcp_read_timeout: Duration::from_secs(1),
            udp_recv_timeout: Duration::from_millis(500),
        }
    }
}

impl ScanConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_tcp_connect_timeout(mut self, timeout: Duration) -> Self {
        self.tcp_connect_timeout = timeout;
        self
    }

    pub fn with_tcp_read_timeout(mut self, timeout: Duration) -> Self {
        self.tcp_read_timeout = timeout;
        self
    }

    pub fn with_udp_recv_timeout(mut self, timeout: Duration) -> Self {
        self.udp_recv_timeout = timeout;
        self
    }

    fn validate(&self) -> ScanResult<()> {
        if self.workers == 0 {
            return Err(ScanError::InvalidConfig("worker count must be at least 1".into()));
        }
        if self.tcp_connect_timeout.is_zero()
            || self.tcp_read_timeout.is_zero()
            || self.udp_recv_timeout.is_zero()
        {
            return Err(ScanError::InvalidConfig("timeouts must be non-zero".into()));
        }
        Ok(())
    }
}

/// Port scanner for a single host.
pub struct PortScanner {
    target: ScanTarget,
    ports: PortRange,
    probers: Vec<Arc<dyn Prober>>,
    pool: WorkerPool,
}

impl PortScanner {
    /// Resolve `host` and set up probers for the selected transports.
    ///
    /// Resolution failure is fatal: nothing is probed.
    pub async fn new(
        host: &str,
        udp: bool,
        tcp: bool,
        ports: PortRange,
        config: ScanConfig,
    ) -> ScanResult<Self> {
        config.validate()?;
        let target = ScanTarget::resolve(host).await?;

        let mut probers: Vec<Arc<dyn Prober>> = Vec::with_capacity(2);
        if tcp {
            probers.push(Arc::new(TcpProber::new(
                target.ip,
                config.tcp_connect_timeout,
                config.tcp_read_timeout,
            )));
        }
        if udp {
            probers.push(Arc::new(UdpProber::new(target.ip, config.udp_recv_timeout)));
        }

        Ok(Self {
            target,
            ports,
            probers,
            pool: WorkerPool::new(config.workers),
        })
    }

    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    pub fn ports(&self) -> PortRange {
        self.ports
    }

    /// Selected transports, in dispatch order.
    pub fn transports(&self) -> Vec<Transport> {
        self.probers.iter().map(|p| p.transport()).collect()
    }

    /// Every (port, transport) pair a scan dispatches, in submission order.
    pub fn tasks(&self) -> impl Iterator<Item = (Port, Transport)> + '_ {
        self.ports
            .iter()
            .flat_map(move |port| self.probers.iter().map(move |p| (port, p.transport())))
    }

    /// Probe tasks currently held by the worker pool.
    pub fn active_workers(&self) -> usize {
        self.pool.active()
    }

    /// Scan and print one line per open port to stdout.
    pub async fn scan(&mut self) -> usize {
        self.scan_with(Arc::new(ConsoleSink)).await
    }

    /// Scan, reporting each result to `sink`. Returns the number of probe
    /// tasks dispatched.
    ///
    /// Blocks until every task has finished. The pool is drained on every
    /// exit path, including this future being dropped mid-scan.
    pub async fn scan_with(&mut self, sink: Arc<dyn ResultSink>) -> usize {
        let started = Instant::now();
        info!(
            "scanning {} ports {} over {:?} with {} workers",
            self.target,
            self.ports,
            self.transports(),
            self.pool.capacity()
        );

        for prober in &self.probers {
            debug!("{} prober aimed at {}", prober.transport(), prober.target());
        }

        let mut pool = PoolGuard(&mut self.pool);
        let mut submitted = 0;
        for port in self.ports.iter() {
            for prober in &self.probers {
                let prober = Arc::clone(prober);
                let sink = Arc::clone(&sink);
                pool.0.submit(async move {
                    if let Some(result) = prober.probe(port).await {
                        sink.emit(&result);
                    }
                });
                submitted += 1;
            }
        }

        let failed = pool.0.join_all().await;
        if failed > 0 {
            warn!("{} of {} probe tasks failed", failed, submitted);
        }
        info!(
            "scan of {} finished: {} probes in {:.2}s",
            self.target,
            submitted,
            started.elapsed().as_secs_f64()
        );
        submitted
    }
}

/// Aborts whatever is left in the pool when the scan ends, however it ends.
struct PoolGuard<'a>(&'a mut WorkerPool);

impl Drop for PoolGuard<'_> {
    fn drop(&mut self) {
        self.0.abort_all();
    }
}
