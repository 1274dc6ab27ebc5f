//! Asynchronous client for the broker REST API.
//!
//! Every call is a single attempt: build the URL, attach the bearer token and
//! the optional `brokerAccountId`, execute through the configured
//! [`HttpClient`], then unwrap the `{ trackingId, status, payload }` envelope.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::http_client::{HttpAuth, HttpClient, HttpMethod, HttpRequest, ReqwestHttpClient};
use crate::wire::{
    AccountsPayload, CandlesPayload, Envelope, ErrorPayload, InstrumentsPayload, OperationsPayload,
    OrderBody, PortfolioPayload, WireInstrument, WireOrder, WirePlacedOrder, STATUS_ERROR,
};
use crate::{
    normalizer, sequencer, validate_positive, Account, ApiError, Candle, CandleInterval,
    ClientConfig, Figi, IdentityResolver, Instrument, InstrumentRef, Operation, Order, OrderSide,
    OrderType, PlacedOrder, Position, Ticker, TimeRange, UtcDateTime, ValidationError,
};

const ACCOUNT_PARAM: &str = "brokerAccountId";

/// Broker API client. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct BrokerClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    auth: HttpAuth,
    account_id: Option<String>,
    timeout_ms: u64,
    resolver: Arc<IdentityResolver>,
}

impl BrokerClient {
    pub fn new(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            base_url: config.base_url,
            auth: HttpAuth::BearerToken(config.token),
            account_id: config.account_id,
            timeout_ms: config.timeout_ms,
            resolver: Arc::new(config.resolver),
        }
    }

    /// Client backed by the reqwest transport.
    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(ReqwestHttpClient::new()))
    }

    /// Scope subsequent requests to one brokerage account.
    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, ApiError> {
        let payload: AccountsPayload = self.get("user/accounts", Vec::new()).await?;
        Ok(payload.accounts.into_iter().map(Account::from).collect())
    }

    pub async fn currencies(&self) -> Result<Vec<Instrument>, ApiError> {
        self.catalog("market/currencies").await
    }

    pub async fn shares(&self) -> Result<Vec<Instrument>, ApiError> {
        self.catalog("market/stocks").await
    }

    pub async fn bonds(&self) -> Result<Vec<Instrument>, ApiError> {
        self.catalog("market/bonds").await
    }

    pub async fn etfs(&self) -> Result<Vec<Instrument>, ApiError> {
        self.catalog("market/etfs").await
    }

    /// Currencies, shares, bonds and ETFs, in that order.
    pub async fn instruments(&self) -> Result<Vec<Instrument>, ApiError> {
        let mut all = self.currencies().await?;
        all.extend(self.shares().await?);
        all.extend(self.bonds().await?);
        all.extend(self.etfs().await?);
        Ok(all)
    }

    /// First catalog hit for `ticker`, or `NotFound`.
    pub async fn instrument_by_ticker(&self, ticker: &Ticker) -> Result<Instrument, ApiError> {
        let payload: InstrumentsPayload = self
            .get(
                "market/search/by-ticker",
                vec![("ticker", ticker.as_str().to_owned())],
            )
            .await?;

        payload
            .instruments
            .into_iter()
            .find_map(|instrument| instrument.into_instrument())
            .ok_or_else(|| ApiError::not_found(format!("no instrument with ticker '{ticker}'")))
    }

    pub async fn instrument_by_figi(&self, figi: &Figi) -> Result<Instrument, ApiError> {
        // by-figi returns the instrument itself rather than a list.
        let instrument: WireInstrument = self
            .get("market/search/by-figi", vec![("figi", figi.as_str().to_owned())])
            .await?;

        instrument
            .into_instrument()
            .ok_or_else(|| ApiError::not_found(format!("no usable instrument for '{figi}'")))
    }

    /// Turn a caller-supplied reference into an instrument identifier.
    pub async fn resolve(&self, reference: &InstrumentRef) -> Result<Figi, ApiError> {
        match reference {
            InstrumentRef::Figi(figi) => Ok(figi.clone()),
            InstrumentRef::Ticker(ticker) => {
                let instrument = self.instrument_by_ticker(ticker).await?;
                debug!(%ticker, figi = %instrument.figi, "resolved ticker");
                Ok(instrument.figi)
            }
        }
    }

    /// Candles for `figi` with derived direction and shadows, in feed order.
    pub async fn candles(
        &self,
        figi: &Figi,
        interval: CandleInterval,
        from: UtcDateTime,
        to: UtcDateTime,
    ) -> Result<Vec<Candle>, ApiError> {
        let range = TimeRange::new(from, to)?;
        let payload: CandlesPayload = self
            .get(
                "market/candles",
                vec![
                    ("figi", figi.as_str().to_owned()),
                    ("from", range.from.format_rfc3339()),
                    ("to", range.to.format_rfc3339()),
                    ("interval", interval.as_str().to_owned()),
                ],
            )
            .await?;

        Ok(payload.candles.iter().map(Candle::from_raw).collect())
    }

    pub async fn positions(&self) -> Result<Vec<Position>, ApiError> {
        let payload: PortfolioPayload = self.get("portfolio", Vec::new()).await?;
        Ok(payload.positions.into_iter().map(Position::from).collect())
    }

    /// Normalized, time-ordered operation history.
    ///
    /// With a filter, the upstream query uses the identifier the history
    /// endpoint indexes, and only records reclassified back to `filter` are
    /// returned.
    pub async fn operations(
        &self,
        filter: Option<&Figi>,
        from: UtcDateTime,
        to: UtcDateTime,
    ) -> Result<Vec<Operation>, ApiError> {
        let range = TimeRange::new(from, to)?;
        let mut query = vec![
            ("from", range.from.format_rfc3339()),
            ("to", range.to.format_rfc3339()),
        ];
        if let Some(filter) = filter {
            let outbound = self.resolver.outbound(filter);
            if &outbound != filter {
                debug!(%filter, %outbound, "querying history under base listing");
            }
            query.push(("figi", outbound.as_str().to_owned()));
        }

        let payload: OperationsPayload = self.get("operations", query).await?;
        let (operations, stats) =
            normalizer::normalize_with_stats(&payload.operations, filter, &self.resolver)?;
        debug!(
            received = stats.received,
            filtered_by_instrument = stats.filtered_by_instrument,
            unrecognized_kind = stats.unrecognized_kind,
            not_settled = stats.not_settled,
            kept = stats.kept,
            "normalized operations"
        );

        Ok(sequencer::sort(operations))
    }

    /// [`operations`](Self::operations) for a ticker or identifier, or for every instrument.
    pub async fn list_operations(
        &self,
        reference: Option<&InstrumentRef>,
        from: UtcDateTime,
        to: UtcDateTime,
    ) -> Result<Vec<Operation>, ApiError> {
        TimeRange::new(from, to)?;
        let filter = match reference {
            Some(reference) => Some(self.resolve(reference).await?),
            None => None,
        };
        self.operations(filter.as_ref(), from, to).await
    }

    /// [`candles`](Self::candles) for a ticker or identifier.
    pub async fn list_candles(
        &self,
        reference: &InstrumentRef,
        interval: CandleInterval,
        from: UtcDateTime,
        to: UtcDateTime,
    ) -> Result<Vec<Candle>, ApiError> {
        TimeRange::new(from, to)?;
        let figi = self.resolve(reference).await?;
        self.candles(&figi, interval, from, to).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        let orders: Vec<WireOrder> = self.get("orders", Vec::new()).await?;
        Ok(orders.into_iter().map(Order::from).collect())
    }

    pub async fn create_limit_order(
        &self,
        figi: &Figi,
        side: OrderSide,
        lots: u32,
        price: f64,
    ) -> Result<PlacedOrder, ApiError> {
        validate_positive("price", price)?;
        self.place_order(figi, OrderType::Limit, side, lots, Some(price))
            .await
    }

    pub async fn create_market_order(
        &self,
        figi: &Figi,
        side: OrderSide,
        lots: u32,
    ) -> Result<PlacedOrder, ApiError> {
        self.place_order(figi, OrderType::Market, side, lots, None)
            .await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<(), ApiError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(ValidationError::EmptyOrderId.into());
        }

        let _: serde_json::Value = self
            .call(
                HttpMethod::Post,
                "orders/cancel",
                vec![("orderId", order_id.to_owned())],
                None,
            )
            .await?;
        info!(order_id, "order cancelled");
        Ok(())
    }

    async fn place_order(
        &self,
        figi: &Figi,
        order_type: OrderType,
        side: OrderSide,
        lots: u32,
        price: Option<f64>,
    ) -> Result<PlacedOrder, ApiError> {
        if lots == 0 {
            return Err(ValidationError::InvalidLots.into());
        }

        let body = serde_json::to_string(&OrderBody {
            operation: side,
            lots,
            price,
        })?;
        let path = format!("orders/{}-order", order_type.as_str());
        let placed: WirePlacedOrder = self
            .call(
                HttpMethod::Post,
                &path,
                vec![("figi", figi.as_str().to_owned())],
                Some(body),
            )
            .await?;

        let placed = PlacedOrder::from(placed);
        info!(
            order_id = %placed.id,
            %figi,
            %side,
            lots,
            status = %placed.status,
            "order placed"
        );
        Ok(placed)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(&str, String)>,
    ) -> Result<T, ApiError> {
        self.call(HttpMethod::Get, path, query, None).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(&str, String)>,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let url = self.url(path, query);
        let mut request = HttpRequest::new(method, url)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);
        if let Some(body) = body {
            request = request.with_json_body(body);
        }

        let response = self.http.execute(request).await.map_err(|error| {
            warn!(path, retryable = error.retryable(), error = %error, "transport failure");
            ApiError::transport(format!("{path}: {}", error.message()), error.retryable())
        })?;

        if !response.is_success() {
            let message = upstream_failure_message(response.status, &response.body);
            warn!(path, status = response.status, %message, "upstream rejected request");
            return Err(ApiError::upstream(message));
        }

        let envelope: Envelope = serde_json::from_str(&response.body)?;
        if envelope.status == STATUS_ERROR {
            let payload: ErrorPayload =
                serde_json::from_value(envelope.payload).unwrap_or_default();
            warn!(
                path,
                tracking_id = envelope.tracking_id.as_deref().unwrap_or("-"),
                code = %payload.code,
                "upstream returned error envelope"
            );
            return Err(ApiError::upstream(payload.message));
        }

        Ok(serde_json::from_value(envelope.payload)?)
    }

    fn url(&self, path: &str, mut query: Vec<(&str, String)>) -> String {
        if let Some(account_id) = &self.account_id {
            query.push((ACCOUNT_PARAM, account_id.clone()));
        }

        let mut url = format!("{}{}", self.base_url, path);
        for (index, (name, value)) in query.iter().enumerate() {
            url.push(if index == 0 { '?' } else { '&' });
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn catalog(&self, path: &str) -> Result<Vec<Instrument>, ApiError> {
        let payload: InstrumentsPayload = self.get(path, Vec::new()).await?;
        Ok(payload
            .instruments
            .into_iter()
            .filter_map(|instrument| instrument.into_instrument())
            .collect())
    }
}

/// Message for a non-2xx response: the reason phrase when the body is empty,
/// the envelope error when it parses, otherwise the raw body.
fn upstream_failure_message(status: u16, body: &str) -> String {
    if body.trim().is_empty() {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status");
        return format!("{reason} ({status})");
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => match serde_json::from_value::<ErrorPayload>(envelope.payload) {
            Ok(payload) if !payload.message.is_empty() => {
                format!("{} ({})", payload.message, payload.code)
            }
            _ => body.to_owned(),
        },
        Err(_) => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_error_body_uses_reason_phrase() {
        assert_eq!(upstream_failure_message(404, ""), "Not Found (404)");
        assert_eq!(upstream_failure_message(599, " "), "Unknown Status (599)");
    }

    #[test]
    fn enveloped_error_body_uses_payload_message() {
        let body = r#"{"trackingId":"abc","status":"Error","payload":{"message":"Insufficient balance","code":"NOT_ENOUGH_BALANCE"}}"#;
        assert_eq!(
            upstream_failure_message(500, body),
            "Insufficient balance (NOT_ENOUGH_BALANCE)"
        );
    }

    #[test]
    fn plain_error_body_is_passed_through() {
        assert_eq!(upstream_failure_message(502, "bad gateway"), "bad gateway");
    }
}
