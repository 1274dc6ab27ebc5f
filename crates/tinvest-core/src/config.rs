//! Client configuration.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `TINVEST_TOKEN` | yes | |
//! | `TINVEST_BASE_URL` | no | `https://api-invest.tinkoff.ru/openapi/` |
//! | `TINVEST_ACCOUNT_ID` | no | broker default account |
//! | `TINVEST_TIMEOUT_MS` | no | `3000` |
//! | `TINVEST_DUAL_LISTINGS` | no | built-in TCS/TCSG table |
//!
//! `TINVEST_DUAL_LISTINGS` points at a JSON file holding an array of
//! `{ "base", "alternate", "currency" }` entries.

use std::fmt::{Debug, Formatter};
use std::path::Path;

use crate::error::ConfigError;
use crate::resolver::IdentityResolver;

pub const DEFAULT_BASE_URL: &str = "https://api-invest.tinkoff.ru/openapi/";
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

const TOKEN_VAR: &str = "TINVEST_TOKEN";
const BASE_URL_VAR: &str = "TINVEST_BASE_URL";
const ACCOUNT_VAR: &str = "TINVEST_ACCOUNT_ID";
const TIMEOUT_VAR: &str = "TINVEST_TIMEOUT_MS";
const DUAL_LISTINGS_VAR: &str = "TINVEST_DUAL_LISTINGS";

/// Connection settings and the dual-listing table for a [`BrokerClient`](crate::BrokerClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub account_id: Option<String>,
    pub timeout_ms: u64,
    pub resolver: IdentityResolver,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            token: token.into(),
            account_id: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            resolver: IdentityResolver::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_resolver(mut self, resolver: IdentityResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let token = get(TOKEN_VAR).ok_or(ConfigError::MissingVar { name: TOKEN_VAR })?;
        let mut config = Self::new(token.trim());

        if let Some(base_url) = get(BASE_URL_VAR) {
            config = config.with_base_url(base_url.trim());
        }

        if let Some(account_id) = get(ACCOUNT_VAR) {
            config = config.with_account(account_id.trim());
        }

        if let Some(raw) = get(TIMEOUT_VAR) {
            let timeout_ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidVar {
                    name: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config = config.with_timeout_ms(timeout_ms);
        }

        if let Some(path) = get(DUAL_LISTINGS_VAR) {
            config = config.with_resolver(load_dual_listings(path.trim())?);
        }

        Ok(config)
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("timeout_ms", &self.timeout_ms)
            .field("resolver", &self.resolver)
            .finish()
    }
}

/// Read a dual-listing table from a JSON file.
pub fn load_dual_listings(path: impl AsRef<Path>) -> Result<IdentityResolver, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    IdentityResolver::from_json(&contents)
}
