//! CLI argument definitions for tinvest.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `accounts` | List brokerage accounts |
//! | `instruments` | List the instrument catalog |
//! | `instrument` | Look up one instrument by ticker or identifier |
//! | `candles` | Fetch candles with derived direction and shadows |
//! | `positions` | Show portfolio positions |
//! | `operations` | Show settled operation history |
//! | `orders` | List active orders |
//! | `limit-order` | Place a limit order |
//! | `market-order` | Place a market order |
//! | `cancel` | Cancel an active order |
//!
//! # Global Options
//!
//! | Option | Environment | Default |
//! |--------|-------------|---------|
//! | `--token` | `TINVEST_TOKEN` | required |
//! | `--account` | `TINVEST_ACCOUNT_ID` | broker default |
//! | `--base-url` | `TINVEST_BASE_URL` | production endpoint |
//! | `--timeout-ms` | `TINVEST_TIMEOUT_MS` | `3000` |
//! | `--dual-listings` | `TINVEST_DUAL_LISTINGS` | built-in table |
//! | `--pretty` | | `false` |
//!
//! # Examples
//!
//! ```bash
//! tinvest operations TCSG --from 2020-01-01T00:00:00Z --pretty
//! tinvest candles BBG00QPYJ5H0 --interval hour --from 2020-03-02T07:00:00Z --to 2020-03-03T07:00:00Z
//! tinvest limit-order TCSG --side buy --lots 1 --price 1500.5
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tinvest_core::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use tinvest_core::OrderSide;

/// Command-line client for the brokerage trading API.
#[derive(Debug, Parser)]
#[command(
    name = "tinvest",
    author,
    version,
    about = "Brokerage trading API client",
    long_about = "tinvest queries accounts, instruments, candles and operation history, \
and places or cancels orders.\n\
\n\
Output is a single JSON document on stdout. Diagnostics go to stderr; \
set RUST_LOG=debug to see requests.\n\
\n\
Use 'tinvest <command> --help' for command-specific help."
)]
pub struct Cli {
    /// API token.
    #[arg(long, global = true, env = "TINVEST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Brokerage account to scope requests to.
    #[arg(long, global = true, env = "TINVEST_ACCOUNT_ID")]
    pub account: Option<String>,

    /// API base URL.
    #[arg(long, global = true, env = "TINVEST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, env = "TINVEST_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// JSON file with `{ base, alternate, currency }` dual-listing entries.
    #[arg(long, global = true, env = "TINVEST_DUAL_LISTINGS")]
    pub dual_listings: Option<PathBuf>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List brokerage accounts.
    Accounts,

    /// List the instrument catalog.
    ///
    /// # Examples
    ///
    ///   tinvest instruments
    ///   tinvest instruments --kind etf
    Instruments(InstrumentsArgs),

    /// Look up one instrument by ticker or identifier.
    Instrument(InstrumentArgs),

    /// Fetch candles with derived direction, body and shadows.
    Candles(CandlesArgs),

    /// Show portfolio positions.
    Positions,

    /// Show settled operation history, oldest first.
    ///
    /// Operations of dual-listed instruments are attributed to the listing
    /// they were settled in.
    ///
    /// # Examples
    ///
    ///   tinvest operations --from 2020-01-01T00:00:00Z
    ///   tinvest operations TCSG --from 2020-01-01T00:00:00Z --to 2020-06-01T00:00:00Z
    Operations(OperationsArgs),

    /// List active orders.
    Orders,

    /// Place a limit order.
    LimitOrder(LimitOrderArgs),

    /// Place a market order.
    MarketOrder(MarketOrderArgs),

    /// Cancel an active order.
    Cancel(CancelArgs),
}

/// Catalog section selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InstrumentKind {
    Currency,
    Stock,
    Bond,
    Etf,
}

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Buy,
    Sell,
}

impl From<Side> for OrderSide {
    fn from(value: Side) -> Self {
        match value {
            Side::Buy => OrderSide::Buy,
            Side::Sell => OrderSide::Sell,
        }
    }
}

/// Arguments for the `instruments` command.
#[derive(Debug, Args)]
pub struct InstrumentsArgs {
    /// Only list one catalog section.
    #[arg(long, value_enum)]
    pub kind: Option<InstrumentKind>,
}

/// Arguments for the `instrument` command.
#[derive(Debug, Args)]
pub struct InstrumentArgs {
    /// Ticker (e.g. TCSG) or instrument identifier (e.g. BBG00QPYJ5H0).
    pub reference: String,
}

/// Arguments for the `candles` command.
#[derive(Debug, Args)]
pub struct CandlesArgs {
    /// Ticker or instrument identifier.
    pub reference: String,

    /// Candle interval: 1min, 2min, 3min, 5min, 10min, 15min, 30min, hour, day, week, month.
    #[arg(long, default_value = "day")]
    pub interval: String,

    /// Window start (RFC3339).
    #[arg(long)]
    pub from: String,

    /// Window end (RFC3339); defaults to now.
    #[arg(long)]
    pub to: Option<String>,
}

/// Arguments for the `operations` command.
#[derive(Debug, Args)]
pub struct OperationsArgs {
    /// Ticker or instrument identifier; omit for every instrument.
    pub reference: Option<String>,

    /// Window start (RFC3339).
    #[arg(long)]
    pub from: String,

    /// Window end (RFC3339); defaults to now.
    #[arg(long)]
    pub to: Option<String>,
}

/// Arguments for the `limit-order` command.
#[derive(Debug, Args)]
pub struct LimitOrderArgs {
    /// Ticker or instrument identifier.
    pub reference: String,

    #[arg(long, value_enum)]
    pub side: Side,

    /// Number of lots.
    #[arg(long)]
    pub lots: u32,

    /// Limit price per unit.
    #[arg(long)]
    pub price: f64,
}

/// Arguments for the `market-order` command.
#[derive(Debug, Args)]
pub struct MarketOrderArgs {
    /// Ticker or instrument identifier.
    pub reference: String,

    #[arg(long, value_enum)]
    pub side: Side,

    /// Number of lots.
    #[arg(long)]
    pub lots: u32,
}

/// Arguments for the `cancel` command.
#[derive(Debug, Args)]
pub struct CancelArgs {
    /// Identifier of the order to cancel.
    pub order_id: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_operations_with_optional_reference() {
        let cli = Cli::try_parse_from([
            "tinvest",
            "--token",
            "t.abc",
            "operations",
            "TCSG",
            "--from",
            "2020-01-01T00:00:00Z",
        ])
        .expect("arguments should parse");

        match cli.command {
            Command::Operations(args) => {
                assert_eq!(args.reference.as_deref(), Some("TCSG"));
                assert!(args.to.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_limit_order() {
        let cli = Cli::try_parse_from([
            "tinvest",
            "limit-order",
            "TCSG",
            "--side",
            "sell",
            "--lots",
            "2",
            "--price",
            "1600",
            "--pretty",
        ])
        .expect("arguments should parse");

        assert!(cli.pretty);
        match cli.command {
            Command::LimitOrder(args) => {
                assert_eq!(OrderSide::from(args.side), OrderSide::Sell);
                assert_eq!(args.lots, 2);
                assert_eq!(args.price, 1600.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
