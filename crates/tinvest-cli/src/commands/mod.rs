mod market;
mod portfolio;
mod trading;

use std::time::Instant;

use serde_json::Value;
use tinvest_core::{
    load_dual_listings, BrokerClient, ClientConfig, ConfigError, InstrumentRef, TimeRange,
    UtcDateTime,
};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::{Document, Meta};

pub async fn run(cli: &Cli) -> Result<Document, CliError> {
    let client = build_client(cli)?;
    let started = Instant::now();

    let (command, data) = match &cli.command {
        Command::Accounts => ("accounts", portfolio::accounts(&client).await?),
        Command::Instruments(args) => ("instruments", market::instruments(args, &client).await?),
        Command::Instrument(args) => ("instrument", market::instrument(args, &client).await?),
        Command::Candles(args) => ("candles", market::candles(args, &client).await?),
        Command::Positions => ("positions", portfolio::positions(&client).await?),
        Command::Operations(args) => ("operations", portfolio::operations(args, &client).await?),
        Command::Orders => ("orders", trading::orders(&client).await?),
        Command::LimitOrder(args) => ("limit-order", trading::limit_order(args, &client).await?),
        Command::MarketOrder(args) => {
            ("market-order", trading::market_order(args, &client).await?)
        }
        Command::Cancel(args) => ("cancel", trading::cancel(args, &client).await?),
    };

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(command, latency_ms, "command finished");

    Ok(Document {
        meta: Meta {
            command,
            account: client.account_id().map(str::to_owned),
            generated_at: UtcDateTime::now(),
            latency_ms,
        },
        data,
    })
}

fn build_client(cli: &Cli) -> Result<BrokerClient, CliError> {
    let token = cli
        .token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ConfigError::MissingVar {
            name: "TINVEST_TOKEN",
        })?;

    if cli.timeout_ms == 0 {
        return Err(ConfigError::InvalidVar {
            name: "TINVEST_TIMEOUT_MS",
            value: String::from("0"),
        }
        .into());
    }

    let mut config = ClientConfig::new(token)
        .with_base_url(cli.base_url.trim())
        .with_timeout_ms(cli.timeout_ms);
    if let Some(account) = cli.account.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        config = config.with_account(account);
    }
    if let Some(path) = &cli.dual_listings {
        config = config.with_resolver(load_dual_listings(path)?);
    }

    debug!(base_url = %config.base_url, account = ?config.account_id, "client configured");
    Ok(BrokerClient::from_config(config))
}

fn parse_reference(raw: &str) -> Result<InstrumentRef, CliError> {
    Ok(InstrumentRef::parse(raw)?)
}

/// `--from`/`--to` pair; a missing end means now.
fn parse_window(from: &str, to: Option<&str>) -> Result<TimeRange, CliError> {
    let from = UtcDateTime::parse(from)?;
    let to = match to {
        Some(to) => UtcDateTime::parse(to)?,
        None => UtcDateTime::now(),
    };
    Ok(TimeRange::new(from, to)?)
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, CliError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_rejects_reversed_bounds() {
        let error = parse_window("2020-02-01T00:00:00Z", Some("2020-01-01T00:00:00Z"))
            .expect_err("reversed window must fail");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn window_end_defaults_to_now() {
        let window = parse_window("2020-01-01T00:00:00Z", None).expect("window");
        assert!(window.to > window.from);
    }

    #[test]
    fn reference_accepts_tickers_and_identifiers() {
        assert!(matches!(
            parse_reference("tcsg").expect("ticker"),
            InstrumentRef::Ticker(_)
        ));
        assert!(matches!(
            parse_reference("BBG00QPYJ5H0").expect("figi"),
            InstrumentRef::Figi(_)
        ));
    }
}
