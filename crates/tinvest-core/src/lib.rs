//! # Tinvest Core
//!
//! Domain types and an async client for a brokerage trading REST API.
//!
//! ## Overview
//!
//! - **Canonical domain models** for instruments, candles, operations and orders
//! - **Identity resolver** reconciling dual-listed instruments in the operation feed
//! - **Operation normalizer and sequencer** turning raw history into settled,
//!   time-ordered records
//! - **Candle analyzer** deriving direction, body and shadows from OHLC data
//! - **Broker client** over a pluggable HTTP transport
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | `BrokerClient` and the upstream call loop |
//! | [`config`] | Client configuration and environment loading |
//! | [`domain`] | Domain models (Figi, Candle, Operation, Order, ...) |
//! | [`error`] | Validation, configuration and API errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalizer`] | Raw operation filtering and mapping |
//! | [`resolver`] | Dual-listing identity reconciliation |
//! | [`sequencer`] | Stable time ordering of operations |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tinvest_core::{BrokerClient, ClientConfig, InstrumentRef, UtcDateTime};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BrokerClient::from_config(ClientConfig::from_env()?);
//!
//!     let tcsg: InstrumentRef = "TCSG".parse()?;
//!     let operations = client
//!         .list_operations(
//!             Some(&tcsg),
//!             UtcDateTime::parse("2020-01-01T00:00:00Z")?,
//!             UtcDateTime::now(),
//!         )
//!         .await?;
//!
//!     for operation in operations {
//!         println!("{} {} {}", operation.time, operation.kind, operation.value);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every client call returns [`ApiError`]; match on its kind:
//!
//! ```rust
//! use tinvest_core::{ApiError, ApiErrorKind};
//!
//! fn handle_error(error: ApiError) {
//!     match error.kind() {
//!         ApiErrorKind::Transport if error.retryable() => {
//!             // Try again later
//!         }
//!         ApiErrorKind::InvalidRequest | ApiErrorKind::NotFound => {
//!             // Report to user
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The API token is read from the environment or passed explicitly (never logged)
//! - `Debug` output of configuration and auth types redacts the token

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod normalizer;
pub mod resolver;
pub mod sequencer;
mod wire;

// Client
pub use client::BrokerClient;

// Configuration
pub use config::{load_dual_listings, ClientConfig};

// Domain models
pub(crate) use domain::validate_positive;
pub use domain::{
    analyze, validate_currency_code, Account, Candle, CandleDirection, CandleInterval,
    CandleShape, Figi, Instrument, InstrumentRef, InstrumentType, MoneyAmount, Operation,
    OperationKind, OperationStatus, OperationType, Order, OrderSide, OrderType, PlacedOrder,
    Position, RawCandle, RawOperation, Ticker, TimeRange, UtcDateTime,
};

// Error types
pub use error::{ApiError, ApiErrorKind, ConfigError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Operation pipeline
pub use normalizer::{normalize, normalize_with_stats, NormalizeStats};
pub use resolver::{DualListing, IdentityResolver};
pub use sequencer::sort as sort_operations;
