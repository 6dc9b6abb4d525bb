//! Console progress and the persisted scan report.

use std::{
    fmt::Write as _,
    fs,
    net::Ipv4Addr,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use pad::PadStr;

use crate::{
    error::ScanError,
    port,
    scan::{ProbeResult, ScanResult},
};

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S%.6f";
const SEPARATOR_WIDTH: usize = 60;

/// Report file used when none is given.
pub fn default_path(target: &str) -> PathBuf {
    PathBuf::from(format!("port_scan_log_{}.txt", target))
}

/// Progress line for a completed probe, if it's worth showing.
pub fn progress_line(result: &ProbeResult) -> Option<String> {
    result.state.is_open().then(|| {
        format!(
            "TCP {} OPEN ({})",
            result.port,
            result.service.unwrap_or(port::UNKNOWN_SERVICE)
        )
    })
}

pub fn progress(result: &ProbeResult) {
    if let Some(line) = progress_line(result) {
        println!("{}", line);
    }
}

#[derive(Debug)]
pub struct Report {
    pub target: String,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
    pub result: ScanResult,
}

impl Report {
    pub fn new(
        target: &str,
        started: DateTime<Local>,
        finished: DateTime<Local>,
        result: ScanResult,
    ) -> Self {
        Self {
            target: target.to_owned(),
            started,
            finished,
            result,
        }
    }

    #[inline]
    pub fn ip(&self) -> Ipv4Addr {
        self.result.ip
    }

    pub fn render(&self) -> String {
        let heavy = "=".repeat(SEPARATOR_WIDTH);
        let light = "-".repeat(SEPARATOR_WIDTH);

        let mut out = String::from("Port Scan Results\n");
        // Writing into a String can't fail.
        let _ = writeln!(out, "Target: {}", self.target);
        let _ = writeln!(out, "Resolved IP: {}", self.ip());
        let _ = writeln!(out, "Scan started: {}", self.started.format(TIMESTAMP));
        let _ = writeln!(out, "{}", heavy);

        out.push_str("\nTCP OPEN PORTS\n");
        let _ = writeln!(out, "{}", light);
        self.result.open.iter().for_each(|pr| {
            let _ = writeln!(
                out,
                "TCP {} {}",
                pr.port.to_string().pad_to_width(6),
                pr.service.unwrap_or(port::UNKNOWN_SERVICE)
            );
        });

        let _ = writeln!(out, "{}", heavy);
        let _ = writeln!(out, "Scan completed: {}", self.finished.format(TIMESTAMP));
        let _ = writeln!(out, "TCP open ports: {}", self.result.open.len());
        // UDP isn't probed; the line is kept so the layout stays stable.
        let _ = writeln!(out, "UDP open/filtered ports: 0");

        out
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ScanError> {
        fs::write(path, self.render())
            .map_err(|e| ScanError::ReportWriteFailed(path.to_path_buf(), e))?;

        log::debug!("Report written to `{}`", path.display());

        Ok(())
    }

    pub fn summary(&self, path: &Path) -> String {
        let mut out = format!(
            "\nScan completed in {:.4}s\n",
            self.result.elapsed.as_secs_f32()
        );
        if self.result.cancelled {
            let _ = writeln!(
                out,
                "Scan cancelled, {} ports left unprobed",
                self.result.skipped
            );
        }
        let _ = writeln!(out, "TCP open ports: {}", self.result.open.len());
        let _ = writeln!(out, "Results saved to {}", path.display());

        out
    }
}
