use std::path::Path;

use chrono::Local;

use error::ScanError;
use report::Report;
use scan::{ScanConfig, Scanner};

pub mod error;
pub mod logger;
pub mod port;
pub mod report;
pub mod resolver;
pub mod scan;

/// Resolves `target`, scans it while printing open ports as they show up and
/// persists the report at `output`.
///
/// Nothing is probed and no report is written when the target can't be
/// resolved.
pub fn run(target: &str, config: ScanConfig, output: &Path) -> Result<Report, ScanError> {
    let ip = resolver::lookup(target)?;
    println!("Target resolved: {} -> {}", target, ip);

    let started = Local::now();
    println!("\n[+] Scanning TCP ports...\n");
    let result = Scanner::new(ip, config).start(report::progress)?;

    let report = Report::new(target, started, Local::now(), result);
    report.write_to(output)?;

    Ok(report)
}
