//! # Crema POS Library
//!
//! Core library for the Crema point of sale.
//! This is the main entry point that loads configuration, seeds the store
//! and serves the command channel.
//!
//! ## Module Organization
//! ```text
//! crema_pos/
//! ├── lib.rs          ◄─── You are here (startup & serve loop)
//! ├── protocol.rs     ◄─── Request/response envelopes, Command enum
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState and state type exports
//! │   ├── store.rs    ◄─── Store wrapper
//! │   ├── order.rs    ◄─── Current order management
//! │   └── config.rs   ◄─── Configuration (file, env, defaults)
//! ├── commands/
//! │   ├── mod.rs      ◄─── dispatch()
//! │   └── ...         ◄─── One module per area
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Command Channel
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    JSON Lines over stdio                                │
//! │                                                                         │
//! │  stdin  ──► {"id":1,"cmd":"add_to_order","args":{"productId":"p-latte"}}│
//! │                          │                                              │
//! │                          ▼                                              │
//! │             Request::from_json ──► dispatch ──► Response                │
//! │                                                    │                    │
//! │  stdout ◄── {"id":1,"ok":true,"data":{...}} ◄──────┘                    │
//! │                                                                         │
//! │  stderr ◄── tracing output (stdout stays pure JSON)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod protocol;
pub mod state;

use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crema_store::Store;

use error::ApiError;
use protocol::{Request, Response};
use state::{AppState, ConfigState, StoreState};

/// Runs the POS until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config <path>, else the per-user config.toml if present         │
/// │     • CREMA_* environment overrides                                     │
/// │                                                                         │
/// │  3. Seed Store ───────────────────────────────────────────────────────► │
/// │     • Fixture directory or embedded demo data                           │
/// │     • Drifted balances repaired from history                            │
/// │                                                                         │
/// │  4. Serve Commands ───────────────────────────────────────────────────► │
/// │     • One response line per request line                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Crema POS");

    let config_path = parse_args(std::env::args().skip(1))?;
    let config = ConfigState::load(config_path.as_deref()).await?;

    let store = Store::new(config.store_config()).await?;
    let report = store.seed_report();
    info!(
        products = report.products,
        customers = report.customers,
        transactions = report.transactions,
        repaired = report.repaired_balances.len(),
        "Store seeded"
    );

    let state = AppState::new(StoreState::new(store), config);
    info!("State initialized, serving commands on stdin");

    serve(&state, tokio::io::BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    info!("Input closed, shutting down");
    Ok(())
}

/// Reads requests line by line and writes one response line for each.
///
/// Blank lines are ignored. A malformed line gets a `BAD_REQUEST` response
/// and the loop carries on.
pub async fn serve<R, W>(state: &AppState, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(state, &line).await;
        let json = response.to_json().map_err(std::io::Error::other)?;

        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Parses and executes a single request line.
pub async fn handle_line(state: &AppState, line: &str) -> Response {
    let request = match Request::from_json(line) {
        Ok(request) => request,
        Err(bad) => {
            warn!(error = %bad.error, "Rejected request");
            return Response::failure(
                bad.id,
                ApiError::bad_request(format!("Invalid request: {}", bad.error)),
            );
        }
    };

    let name = request.command.name();
    debug!(id = %request.id, command = name, "Handling request");

    match commands::dispatch(state, request.command).await {
        Ok(data) => Response::success(request.id, data),
        Err(error) => {
            debug!(command = name, code = ?error.code, message = %error.message, "Command failed");
            Response::failure(request.id, error)
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=crema=trace` - Show trace for crema crates only
/// - Default: INFO level, DEBUG for crema crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crema=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Picks the config file path out of the command line.
fn parse_args<I>(args: I) -> Result<Option<PathBuf>, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--config requires a path".to_string())?;
                config = Some(PathBuf::from(path));
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(config)
}
