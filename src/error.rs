use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to check target kind (ensure it's a domain or IPv4)")]
    HostParseFailed(#[source] url::ParseError),
    #[error("failed to resolve the given target: {0}")]
    ResolverFailed(#[source] std::io::Error),
    #[error("resolver didn't find any IPv4 address mapped by `{0}`")]
    DomainLookupFailed(String),
    #[error("only supports IPv4 addresses or domains that map addresses with this IP version")]
    OnlyIpv4TargetSupported,
    #[error("port range `{0}-{1}` is invalid (ports start at 1 and the range can't be reversed)")]
    InvalidPortRange(u16, u16),
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,
    #[error("failed to build the probe worker pool: {0}")]
    ThreadPoolFailed(#[source] rayon::ThreadPoolBuildError),
    #[error("failed to write report to `{}`: {1}", .0.display())]
    ReportWriteFailed(PathBuf, #[source] std::io::Error),
}

impl ScanError {
    /// Whether the target couldn't be mapped to an address.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            ScanError::HostParseFailed(_)
                | ScanError::ResolverFailed(_)
                | ScanError::DomainLookupFailed(_)
                | ScanError::OnlyIpv4TargetSupported
        )
    }
}
