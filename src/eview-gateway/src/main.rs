// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod api;
mod cli;
mod config;
mod server;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::web;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use eview_app::{init_logging, ConfigFile};
use eview_core::{find_command, list_commands, DynResult, SubmissionRequest};
use eview_history::{HistoryLog, HistoryStore};
use eview_protocol::{draft_to_preview, receipt_to_response, submit_error_to_response};

use api::GatewayState;
use config::GatewayConfig;

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - Eview tracker SMS gateway");

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve {
        /// IP address for the HTTP listener
        #[arg(short = 'l', long = "listen")]
        listen: Option<IpAddr>,
        /// Port for the HTTP listener
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
    },
    /// List supported commands
    Commands,
    /// Show the encoded message without sending it
    Preview {
        /// Command id or display name
        command: String,
        /// Parameters as name=value
        #[arg(value_name = "NAME=VALUE")]
        params: Vec<String>,
    },
    /// Encode, send and log a command
    Send {
        /// Destination phone number of the tracker
        #[arg(long = "phone")]
        phone: String,
        /// Device label recorded in the history
        #[arg(long = "device", default_value = "")]
        device: String,
        /// Command id or display name
        command: String,
        /// Parameters as name=value
        #[arg(value_name = "NAME=VALUE")]
        params: Vec<String>,
    },
    /// Show the most recent submissions
    History {
        /// Number of records (defaults to [history].query_limit)
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,
    },
}

fn open_history(cfg: &GatewayConfig) -> DynResult<Arc<HistoryStore>> {
    let store = HistoryStore::from_config(&cfg.history)
        .map_err(|e| format!("Failed to open history: {}", e))?;
    match store.location() {
        Some(path) => info!("History file: {}", path.display()),
        None => warn!("History is in-memory only ([history].enabled = false)"),
    }
    Ok(Arc::new(store))
}

fn gateway_state(cfg: &GatewayConfig) -> DynResult<GatewayState> {
    Ok(GatewayState::new(
        open_history(cfg)?,
        cfg.policy.submission_policy(),
        cfg.history.query_limit,
    ))
}

async fn run_serve(
    cfg: &GatewayConfig,
    listen: Option<IpAddr>,
    port: Option<u16>,
) -> DynResult<()> {
    if !cfg.http.enabled {
        return Err("HTTP API is disabled ([http].enabled = false)".into());
    }
    let addr = SocketAddr::new(
        listen.unwrap_or(cfg.http.listen),
        port.unwrap_or(cfg.http.port),
    );
    let state = web::Data::new(gateway_state(cfg)?);
    info!(
        "Starting eview-gateway ({} commands, limit {} bytes)",
        list_commands().len(),
        cfg.policy.max_message_bytes
    );
    server::serve(addr, state).await?;
    Ok(())
}

fn run_preview(cfg: &GatewayConfig, command: &str, params: &[String]) -> DynResult<bool> {
    let spec = find_command(command)?;
    let params = cli::collect_params(params)?;
    let draft = eview_core::compose(spec, &params, &cfg.policy.submission_policy());
    print!("{}", cli::format_preview(&draft_to_preview(&draft)));
    Ok(draft.is_admissible())
}

fn run_send(
    cfg: &GatewayConfig,
    phone: String,
    device: String,
    command: String,
    params: &[String],
) -> DynResult<bool> {
    let request = SubmissionRequest {
        device_name: device,
        phone_number: phone,
        command,
        params: cli::collect_params(params)?,
    };
    let state = gateway_state(cfg)?;
    let response = match state.submitter.submit(&request) {
        Ok(receipt) => receipt_to_response(receipt),
        Err(err) => submit_error_to_response(err),
    };
    print!("{}", cli::format_submit(&response));
    Ok(response.accepted)
}

fn run_history(cfg: &GatewayConfig, limit: Option<usize>) -> DynResult<()> {
    let store = open_history(cfg)?;
    let records = store.recent(limit.unwrap_or(cfg.history.query_limit))?;
    print!("{}", cli::format_history(&records));
    Ok(())
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", GatewayConfig::example_combined_toml());
        return Ok(());
    }

    let (cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = GatewayConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        GatewayConfig::load_from_default_paths()?
    };
    cfg.validate()
        .map_err(|e| format!("Invalid gateway configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let accepted = match cli.command.unwrap_or(Command::Serve {
        listen: None,
        port: None,
    }) {
        Command::Serve { listen, port } => {
            run_serve(&cfg, listen, port).await?;
            true
        }
        Command::Commands => {
            print!("{}", cli::format_command_list(list_commands()));
            true
        }
        Command::Preview { command, params } => run_preview(&cfg, &command, &params)?,
        Command::Send {
            phone,
            device,
            command,
            params,
        } => run_send(&cfg, phone, device, command, &params)?,
        Command::History { limit } => {
            run_history(&cfg, limit)?;
            true
        }
    };

    if !accepted {
        std::process::exit(1);
    }
    Ok(())
}
