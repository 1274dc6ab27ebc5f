use serde::Serialize;
use serde_json::Value;
use tinvest_core::{BrokerClient, Order, OrderSide, PlacedOrder, ValidationError};
use tracing::info;

use crate::cli::{CancelArgs, LimitOrderArgs, MarketOrderArgs};
use crate::error::CliError;

use super::{parse_reference, to_value};

#[derive(Debug, Serialize)]
struct OrdersResponseData {
    orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
struct PlacedOrderResponseData {
    figi: String,
    order: PlacedOrder,
}

#[derive(Debug, Serialize)]
struct CancelResponseData {
    order_id: String,
    cancelled: bool,
}

pub async fn orders(client: &BrokerClient) -> Result<Value, CliError> {
    let orders = client.orders().await?;
    to_value(OrdersResponseData { orders })
}

pub async fn limit_order(args: &LimitOrderArgs, client: &BrokerClient) -> Result<Value, CliError> {
    check_lots(args.lots)?;
    if !args.price.is_finite() {
        return Err(ValidationError::NonFiniteValue { field: "price" }.into());
    }
    if args.price <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field: "price" }.into());
    }
    let figi = client.resolve(&parse_reference(&args.reference)?).await?;
    let side = OrderSide::from(args.side);
    info!(%figi, %side, lots = args.lots, price = args.price, "placing limit order");

    let order = client
        .create_limit_order(&figi, side, args.lots, args.price)
        .await?;

    to_value(PlacedOrderResponseData {
        figi: figi.to_string(),
        order,
    })
}

pub async fn market_order(args: &MarketOrderArgs, client: &BrokerClient) -> Result<Value, CliError> {
    check_lots(args.lots)?;
    let figi = client.resolve(&parse_reference(&args.reference)?).await?;
    let side = OrderSide::from(args.side);
    info!(%figi, %side, lots = args.lots, "placing market order");

    let order = client.create_market_order(&figi, side, args.lots).await?;

    to_value(PlacedOrderResponseData {
        figi: figi.to_string(),
        order,
    })
}

pub async fn cancel(args: &CancelArgs, client: &BrokerClient) -> Result<Value, CliError> {
    client.cancel_order(&args.order_id).await?;
    to_value(CancelResponseData {
        order_id: args.order_id.trim().to_owned(),
        cancelled: true,
    })
}

// Checked before the ticker lookup so a bad order never costs a request.
fn check_lots(lots: u32) -> Result<(), CliError> {
    if lots == 0 {
        return Err(ValidationError::InvalidLots.into());
    }
    Ok(())
}
