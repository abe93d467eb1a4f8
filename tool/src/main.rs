// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `wyvern-tool` drives the secure core's diagnostics from the command
//! line.
//!
//! Returns 0 on success and non-0 if any failure is detected.

#![deny(missing_docs)]
#![deny(warnings)]
#![deny(unused)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::exit;

use structopt::StructOpt as _;

#[macro_use]
mod util;

mod proxy;

/// Command-line diagnostics for the secure core.
#[allow(missing_docs)]
#[derive(structopt::StructOpt)]
#[structopt(author)]
struct Cli {
    /// Path of the privileged daemon's control socket.
    #[structopt(
        long,
        default_value = "/var/run/wyvernd.sock",
        parse(from_os_str)
    )]
    socket: PathBuf,

    #[structopt(subcommand)]
    command: Command,
}

/// The diagnostic commands.
#[allow(missing_docs)]
#[derive(structopt::StructOpt)]
enum Command {
    /// Bounces random values off a scratch register to exercise the
    /// transport link.
    #[structopt(name = "stress-spi")]
    StressSpi {
        /// Total transaction count; must be even, since every round trip
        /// is a write plus a read-back.
        count: u32,
    },

    /// Checks the core's vital signs.
    #[structopt(name = "health-check")]
    HealthCheck {
        /// Emit the report as JSON instead of a table.
        #[structopt(long)]
        json: bool,
    },

    /// Pulls the core's reset line and times the bring-up.
    #[structopt(name = "reset")]
    Reset,
}

fn main() {
    env_logger::init();
    let cli = Cli::from_args();

    let mut daemon = check!(
        proxy::DaemonClient::connect(&cli.socket),
        "failed to connect to {}",
        cli.socket.display(),
    );

    match cli.command {
        Command::StressSpi { count } => {
            let mut csrng = wyvern::csrng::ring::Csrng::new();
            check!(
                wyvern::diag::stress(&mut daemon, &mut csrng, count),
                "stress test failed after connecting to the core",
            );
            println!("scratch register survived {} transactions", count);
        }
        Command::HealthCheck { json } => {
            let report = wyvern::diag::health_check(&mut daemon);
            if json {
                check!(
                    serde_json::to_writer_pretty(std::io::stdout(), &report),
                    "failed to serialize the report",
                );
                println!();
            } else {
                for check in &report.checks {
                    let verdict =
                        if check.healthy { "ok" } else { "NOT HEALTHY" };
                    match check.value {
                        Some(value) => println!(
                            "{:<28} {:#010x}  {}",
                            check.name, value, verdict
                        ),
                        None => println!(
                            "{:<28} unreadable  {}",
                            check.name, verdict
                        ),
                    }
                }
            }
            if !report.is_healthy() {
                exit(1);
            }
        }
        Command::Reset => {
            check!(wyvern::diag::reset(&mut daemon), "reset failed");
            println!("core reset and came back within budget");
        }
    }
}
