use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{arg, crate_authors, crate_name, crate_version, ArgAction, ArgMatches, Command};
use tcpscan::{logger, report, scan::ScanConfig};

struct ParsedArgs {
    debug: bool,
    output: Option<PathBuf>,
    target: Option<String>,
}

fn parse_args(matches: ArgMatches) -> ParsedArgs {
    ParsedArgs {
        debug: matches.get_flag("debug"),
        output: matches.get_one::<PathBuf>("output").cloned(),
        target: matches.get_one::<String>("target").cloned(),
    }
}

fn prompt_target() -> Result<String> {
    print!("Enter domain or IP address: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read target")?;

    Ok(line.trim().to_owned())
}

fn main() -> Result<()> {
    let arg_matches = Command::new(crate_name!())
        .about(
            "TCP connect scanner for a single host.\n\
            Probes ports 1-9999 with up to 100 concurrent connections.",
        )
        .version(crate_version!())
        .author(crate_authors!())
        .args([
            arg!(-d --debug "Turns on debugging information").action(ArgAction::SetTrue),
            arg!(-o --output <FILE> "Where to save the report")
                .value_parser(clap::value_parser!(PathBuf)),
            arg!([target] "Address or hostname to scan (asked for if omitted)"),
        ])
        .get_matches();

    // Extract arguments.
    let parsed = parse_args(arg_matches);

    // Set debug if desired.
    if parsed.debug {
        logger::init();
    }

    let target = match parsed.target {
        Some(target) => target,
        None => prompt_target()?,
    };
    let output = parsed
        .output
        .unwrap_or_else(|| report::default_path(&target));

    // Resolve, scan and persist.
    let report = tcpscan::run(&target, ScanConfig::default(), &output).map_err(|e| {
        if e.is_resolution() {
            anyhow::Error::new(e).context("Unable to resolve target")
        } else {
            e.into()
        }
    })?;

    print!("{}", report.summary(&output));

    Ok(())
}
