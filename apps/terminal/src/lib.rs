//! # Till Terminal Library
//!
//! Core library for the Till checkout terminal: a line-oriented checkout
//! screen for one cashier, backed by the store's REST backend.
//!
//! ## Module Organization
//! ```text
//! till_terminal_lib/
//! ├── lib.rs          ◄─── You are here (startup & REPL loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── TerminalConfig (file, env, flags)
//! │   ├── session.rs  ◄─── CheckoutSession (the checkout orchestrator)
//! │   ├── catalog.rs  ◄─── Products, categories, search, screen state
//! │   ├── customer.rs ◄─── Customer search and suggestions
//! │   ├── receipt.rs  ◄─── Receipt fetch and retry
//! │   └── notice.rs   ◄─── Toast-style notices
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command grammar (clap)
//! │   ├── dispatch.rs ◄─── Command execution
//! │   └── render.rs   ◄─── Tables and receipt text (tabled)
//! └── error.rs        ◄─── UiError type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize logging (stderr, RUST_LOG or default filter)             │
//! │  2. Load TerminalConfig: defaults → terminal.toml → TILL_* → flags      │
//! │  3. Build HttpClient from the config (base URL + bearer token)          │
//! │  4. CheckoutSession::load(): profile → store → products + categories    │
//! │  5. Read commands from stdin until `quit` or end of input               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

#[cfg(test)]
mod testing;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use till_api::{HttpClient, PosBackend};

use commands::{execute, parse_line, Outcome};
use error::UiError;
use state::{CheckoutSession, ConfigOverrides, ReceiptSettings, TerminalConfig};

/// Command line flags.
#[derive(Debug, Parser)]
#[command(name = "till-terminal", version, about = "Checkout terminal for the Till POS backend")]
pub struct Cli {
    /// Config file (default: platform config dir, terminal.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. https://pos.example.com
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token of the signed-in cashier
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,
}

/// Runs the terminal until `quit` or end of input.
pub async fn run(cli: Cli) -> Result<(), UiError> {
    init_tracing();
    info!("Starting Till checkout terminal");

    let config = TerminalConfig::load(
        cli.config,
        ConfigOverrides {
            base_url: cli.base_url,
            token: cli.token,
        },
    )?;
    info!(base_url = %config.api.server.base_url, "Configuration loaded");

    let client = HttpClient::from_config(&config.api)?;
    let mut session = CheckoutSession::new(client);

    let mut stdout = tokio::io::stdout();
    // A failed load leaves the session on its error screen; `reload` retries.
    let _ = session.load().await;
    write_block(&mut stdout, &commands::dispatch::status_line(&session)).await?;
    write_block(&mut stdout, "Type `help` for commands.").await?;

    let stdin = BufReader::new(tokio::io::stdin());
    repl(&mut session, &config.receipt, stdin, stdout).await
}

/// Reads commands line by line and prints their results and notices.
///
/// Leaving the loop, by `quit` or end of input, abandons any checkout in
/// progress.
pub async fn repl<B, R, W>(
    session: &mut CheckoutSession<B>,
    settings: &ReceiptSettings,
    input: R,
    mut output: W,
) -> Result<(), UiError>
where
    B: PosBackend,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        let prompt = format!("till[{}]> ", session.phase());
        output.write_all(prompt.as_bytes()).await.map_err(io_error)?;
        output.flush().await.map_err(io_error)?;

        let Some(line) = lines.next_line().await.map_err(io_error)? else {
            debug!("End of input");
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = match parse_line(line) {
            Ok(command) => execute(session, settings, command).await,
            Err(e) => {
                write_block(&mut output, e.render().to_string().trim_end()).await?;
                continue;
            }
        };

        match result {
            Ok(Outcome::Output(text)) => write_block(&mut output, &text).await?,
            Ok(Outcome::Quit) => break,
            Err(e) => write_block(&mut output, &format!("✗ {}", e)).await?,
        }

        write_notices(session, &mut output).await?;
    }

    session.abandon();
    write_notices(session, &mut output).await?;
    output.flush().await.map_err(io_error)?;

    info!("Terminal closed");
    Ok(())
}

async fn write_notices<B, W>(session: &mut CheckoutSession<B>, output: &mut W) -> Result<(), UiError>
where
    B: PosBackend,
    W: AsyncWrite + Unpin,
{
    for notice in session.notices_mut().drain() {
        write_block(output, &notice.to_string()).await?;
    }
    Ok(())
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), UiError> {
    output.write_all(text.as_bytes()).await.map_err(io_error)?;
    output.write_all(b"\n").await.map_err(io_error)?;
    Ok(())
}

fn io_error(err: std::io::Error) -> UiError {
    UiError::internal(format!("Terminal I/O failed: {}", err))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till=trace` - Show trace for till crates only
/// - Default: `info,till=debug,reqwest=warn`
///
/// Logs go to stderr so the prompt on stdout stays readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    async fn transcript(script: &str) -> (String, CheckoutSession<FakeBackend>) {
        let mut session = CheckoutSession::new(FakeBackend::default());
        session.load().await.unwrap();
        let mut out = Vec::new();
        repl(&mut session, &ReceiptSettings::default(), script.as_bytes(), &mut out)
            .await
            .unwrap();
        (String::from_utf8(out).unwrap(), session)
    }

    #[tokio::test]
    async fn test_repl_runs_a_sale() {
        let (out, session) = transcript("add 1\nadd 2\ncheckout\npay upi\nconfirm\nquit\nadd 1\n").await;

        assert!(out.contains("till[browsing]> "));
        assert!(out.contains("till[choosing payment]> "));
        assert!(out.contains("Order #501 placed."));
        assert!(out.contains("✓ Order #501 created"));
        // Nothing after `quit` runs, and the sold cart leaves nothing to discard.
        assert!(session.cart().is_empty());
        assert!(!out.contains("Discarded"));
    }

    #[tokio::test]
    async fn test_repl_survives_errors() {
        let (out, session) = transcript("checkout\nadd zero\nfly\n\nadd 3\n").await;

        assert!(out.contains("✗ [Validation] Cart is empty"));
        assert!(out.contains("error:"));
        assert!(out.contains("Items: 1 (1 units)"));
        // End of input discards the unsold cart.
        assert!(out.ends_with("· Discarded an unsold cart of 1 item(s)\n"));
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_quit_abandons_open_checkout() {
        let (out, session) = transcript("add 1
checkout
pay upi
quit
").await;

        assert!(out.ends_with("· Discarded an unsold cart of 1 item(s)
"));
        assert_eq!(session.phase(), till_core::PhaseKind::Browsing);
        assert!(session.cart().is_empty());
        assert_eq!(session.cart().payment_method(), till_core::PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_repl_stops_at_end_of_input() {
        let (out, _) = transcript("cart").await;
        assert!(out.contains("Cart is empty."));
    }
}
