use std::{
    fmt::Display,
    io,
    net::{Ipv4Addr, SocketAddrV4},
    ops::RangeInclusive,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Sender},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use rayon::prelude::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::{error::ScanError, port};

pub use self::tcp::TcpProbe;

mod tcp;

/// Maximum number of probes in flight at once.
pub const MAX_CONCURRENCY: usize = 100;
/// How long a single connect attempt may take.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_PORTS: RangeInclusive<u16> = 1..=9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Open,
    /// Refused or timed out.
    Closed,
    /// Any other socket fault.
    Error(io::ErrorKind),
}

impl PortState {
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, PortState::Open)
    }
}

impl Display for PortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortState::Open => write!(f, "open"),
            PortState::Closed => write!(f, "closed"),
            PortState::Error(kind) => write!(f, "error ({})", kind),
        }
    }
}

/// Single connection attempt against one address.
///
/// Implementations must classify every fault as a [`PortState`] instead of
/// panicking, since hundreds of them run side by side on the same pool.
pub trait Probe: Sync {
    fn probe(&self, addr: SocketAddrV4) -> PortState;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self, ScanError> {
        if start == 0 || start > end {
            return Err(ScanError::InvalidPortRange(start, end));
        }

        Ok(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> u16 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u16 {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Never true, a range holds at least one port.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            start: *DEFAULT_PORTS.start(),
            end: *DEFAULT_PORTS.end(),
        }
    }
}

impl Display for PortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub ports: PortRange,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ports: PortRange::default(),
            concurrency: MAX_CONCURRENCY,
            timeout: PROBE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub port: u16,
    pub state: PortState,
    /// Set only for open ports.
    pub service: Option<&'static str>,
}

impl ProbeResult {
    pub fn new(port: u16, state: PortState) -> Self {
        let service = state.is_open().then(|| port::service(port));
        Self {
            port,
            state,
            service,
        }
    }
}

#[derive(Debug)]
pub struct ScanResult {
    pub ip: Ipv4Addr,
    /// Open ports, ascending.
    pub open: Vec<ProbeResult>,
    pub closed: usize,
    pub errors: usize,
    /// Ports never probed because the scan was cancelled.
    pub skipped: usize,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl ScanResult {
    #[inline]
    pub fn not_open(&self) -> usize {
        self.closed + self.errors
    }

    #[inline]
    pub fn probed(&self) -> usize {
        self.open.len() + self.not_open()
    }
}

#[derive(Default)]
struct Tally {
    open: Vec<ProbeResult>,
    closed: usize,
    errors: usize,
}

impl Tally {
    fn record(&mut self, result: ProbeResult) {
        match result.state {
            PortState::Open => self.open.push(result),
            PortState::Closed => self.closed += 1,
            PortState::Error(_) => self.errors += 1,
        }
    }

    #[inline]
    fn probed(&self) -> usize {
        self.open.len() + self.closed + self.errors
    }

    fn finish(
        mut self,
        ip: Ipv4Addr,
        elapsed: Duration,
        skipped: usize,
        cancelled: bool,
    ) -> ScanResult {
        self.open.sort_unstable_by_key(|r| r.port);

        ScanResult {
            ip,
            open: self.open,
            closed: self.closed,
            errors: self.errors,
            skipped,
            elapsed,
            cancelled,
        }
    }
}

/// Stops a running scan from starting new probes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct Scanner {
    ip: Ipv4Addr,
    config: ScanConfig,
    probe: Box<dyn Probe>,
    cancel: CancelToken,
}

impl Scanner {
    pub fn new(ip: Ipv4Addr, config: ScanConfig) -> Self {
        let probe = Box::new(TcpProbe::new(config.timeout));
        Self {
            ip,
            config,
            probe,
            cancel: CancelToken::default(),
        }
    }

    pub fn with_probe(mut self, probe: impl Probe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn dispatch(&self, tx: Sender<ProbeResult>) {
        self.config
            .ports
            .iter()
            .into_par_iter()
            .with_max_len(1)
            .for_each_with(tx, |tx, port| {
                if self.cancel.is_cancelled() {
                    return;
                }

                let state = self.probe.probe(SocketAddrV4::new(self.ip, port));
                // The receiver outlives every worker.
                let _ = tx.send(ProbeResult::new(port, state));
            });
    }

    /// Probes every port in the configured range and hands each result to
    /// `on_result` as it completes. Open ports in the returned result are
    /// sorted by port regardless of completion order.
    pub fn start<F>(&self, mut on_result: F) -> Result<ScanResult, ScanError>
    where
        F: FnMut(&ProbeResult),
    {
        if self.config.concurrency == 0 {
            return Err(ScanError::InvalidConcurrency);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.concurrency)
            .thread_name(|i| format!("probe-{}", i))
            .build()
            .map_err(ScanError::ThreadPoolFailed)?;

        log::debug!(
            "Scanning ports {} of `{}` with {} workers",
            self.config.ports,
            self.ip,
            self.config.concurrency
        );

        let (tx, rx) = mpsc::channel();
        let mut tally = Tally::default();

        let now = Instant::now();
        thread::scope(|s| {
            s.spawn(move || pool.install(|| self.dispatch(tx)));

            for result in rx {
                on_result(&result);
                tally.record(result);
            }
        });
        let elapsed = now.elapsed();

        let skipped = self.config.ports.len() - tally.probed();
        let result = tally.finish(self.ip, elapsed, skipped, self.cancel.is_cancelled());

        log::debug!(
            "Scan of `{}` finished in {:.4}s: {} open, {} closed, {} errors, {} skipped",
            self.ip,
            elapsed.as_secs_f32(),
            result.open.len(),
            result.closed,
            result.errors,
            result.skipped
        );

        Ok(result)
    }
}
