use serde::Serialize;
use serde_json::Value;
use tinvest_core::{BrokerClient, Candle, CandleInterval, Instrument, InstrumentRef};

use crate::cli::{CandlesArgs, InstrumentArgs, InstrumentKind, InstrumentsArgs};
use crate::error::CliError;

use super::{parse_reference, parse_window, to_value};

#[derive(Debug, Serialize)]
struct InstrumentsResponseData {
    instruments: Vec<Instrument>,
}

#[derive(Debug, Serialize)]
struct CandlesResponseData {
    reference: String,
    interval: CandleInterval,
    candles: Vec<Candle>,
}

pub async fn instruments(args: &InstrumentsArgs, client: &BrokerClient) -> Result<Value, CliError> {
    let instruments = match args.kind {
        None => client.instruments().await?,
        Some(InstrumentKind::Currency) => client.currencies().await?,
        Some(InstrumentKind::Stock) => client.shares().await?,
        Some(InstrumentKind::Bond) => client.bonds().await?,
        Some(InstrumentKind::Etf) => client.etfs().await?,
    };

    to_value(InstrumentsResponseData { instruments })
}

pub async fn instrument(args: &InstrumentArgs, client: &BrokerClient) -> Result<Value, CliError> {
    let instrument = match parse_reference(&args.reference)? {
        InstrumentRef::Figi(figi) => client.instrument_by_figi(&figi).await?,
        InstrumentRef::Ticker(ticker) => client.instrument_by_ticker(&ticker).await?,
    };

    to_value(instrument)
}

pub async fn candles(args: &CandlesArgs, client: &BrokerClient) -> Result<Value, CliError> {
    let reference = parse_reference(&args.reference)?;
    let interval: CandleInterval = args.interval.parse()?;
    let window = parse_window(&args.from, args.to.as_deref())?;

    let candles = client
        .list_candles(&reference, interval, window.from, window.to)
        .await?;

    to_value(CandlesResponseData {
        reference: reference.to_string(),
        interval,
        candles,
    })
}
