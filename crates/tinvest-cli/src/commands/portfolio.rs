use serde::Serialize;
use serde_json::Value;
use tinvest_core::{Account, BrokerClient, Operation, Position, UtcDateTime};

use crate::cli::OperationsArgs;
use crate::error::CliError;

use super::{parse_reference, parse_window, to_value};

#[derive(Debug, Serialize)]
struct AccountsResponseData {
    accounts: Vec<Account>,
}

#[derive(Debug, Serialize)]
struct PositionsResponseData {
    positions: Vec<Position>,
}

#[derive(Debug, Serialize)]
struct OperationsResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    from: UtcDateTime,
    to: UtcDateTime,
    operations: Vec<Operation>,
}

pub async fn accounts(client: &BrokerClient) -> Result<Value, CliError> {
    let accounts = client.accounts().await?;
    to_value(AccountsResponseData { accounts })
}

pub async fn positions(client: &BrokerClient) -> Result<Value, CliError> {
    let positions = client.positions().await?;
    to_value(PositionsResponseData { positions })
}

pub async fn operations(args: &OperationsArgs, client: &BrokerClient) -> Result<Value, CliError> {
    let reference = args
        .reference
        .as_deref()
        .map(parse_reference)
        .transpose()?;
    let window = parse_window(&args.from, args.to.as_deref())?;

    let operations = client
        .list_operations(reference.as_ref(), window.from, window.to)
        .await?;

    to_value(OperationsResponseData {
        reference: reference.map(|reference| reference.to_string()),
        from: window.from,
        to: window.to,
        operations,
    })
}
