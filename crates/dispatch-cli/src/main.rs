// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! `dispatch`: a thin operator CLI that speaks the daemon's physical
//! transport wire protocol directly — no coordination session or routing
//! smarts of its own, just connect, send one envelope, print the result.

mod client;
mod exit_error;
mod output;

use std::collections::BTreeMap;
use std::io::Read;

use clap::{Parser, Subcommand};
use dispatch_wire::WireEnvelope;

use client::DaemonClient;
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "dispatch", about = "Operator CLI for the dispatch daemon")]
struct Cli {
    /// Daemon physical transport address, host:port.
    #[arg(long, default_value = "127.0.0.1:7420", global = true)]
    addr: String,

    #[arg(long, value_enum, default_value = "text", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a message envelope to the daemon and print the dispatch result.
    Send {
        /// The Rust type-path the daemon's handler registry is keyed on,
        /// e.g. `billing::Invoice`.
        message_type: String,

        /// JSON message body. Reads from stdin when omitted.
        payload: Option<String>,

        /// Dispatch as a publish (fan out to every matching handler)
        /// instead of routing to a single handler.
        #[arg(long)]
        publish: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(error.code);
        }
    }
}

async fn run(cli: Cli) -> Result<i32, ExitError> {
    match cli.command {
        Command::Send { message_type, payload, publish } => {
            let body = match payload {
                Some(body) => body,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .map_err(|e| ExitError::new(1, format!("failed to read stdin: {e}")))?;
                    buf
                }
            };
            let message = serde_json::from_str(&body)
                .map_err(|e| ExitError::new(1, format!("invalid JSON payload: {e}")))?;

            let envelope = WireEnvelope { message_type, message, data: BTreeMap::new(), publish };

            let mut client = DaemonClient::connect(&cli.addr).await?;
            let result = client.send(&envelope).await?;
            Ok(output::print_result(cli.output, &result))
        }
    }
}
