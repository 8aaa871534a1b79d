//! Alpaca trading REST adapter.
//!
//! Maps Alpaca's responses onto the engine's vocabulary. In particular a 404
//! on the position endpoint is the distinguished "no position" answer and is
//! reported as `PositionResult::NotFound`, never as an error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use trading::{
    Broker, BrokerError, LimitOrderRequest, OpenOrder, OrderRecord, OrderSide, Position,
    PositionResult, TimeInForce,
};

pub const PAPER_BASE_URL: &str = "https://paper-api.alpaca.markets";

const KEY_ENV: &str = "ALPACA_PAPER_KEY";
const SECRET_ENV: &str = "ALPACA_PAPER_SECRET";
const BASE_URL_ENV: &str = "ALPACA_BASE_URL";

/// API credentials. The secret is never logged.
#[derive(Clone)]
pub struct AlpacaCredentials {
    key_id: String,
    secret_key: String,
    base_url: String,
}

impl AlpacaCredentials {
    pub fn new(
        key_id: impl Into<String>,
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            secret_key: secret_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Loads `.env` if present, then reads the paper credentials from the
    /// process environment. Missing values are left empty; the broker will
    /// reject them.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::new(
            std::env::var(KEY_ENV).unwrap_or_default(),
            std::env::var(SECRET_ENV).unwrap_or_default(),
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| PAPER_BASE_URL.to_string()),
        )
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for AlpacaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlpacaCredentials")
            .field("key_id", &self.key_id)
            .field("secret_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AlpacaBroker {
    http: reqwest::Client,
    credentials: AlpacaCredentials,
}

impl AlpacaBroker {
    pub fn new(credentials: AlpacaCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build alpaca http client")?;
        Ok(Self { http, credentials })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/v2/{}",
            self.credentials.base_url.trim_end_matches('/'),
            path
        )
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("APCA-API-KEY-ID", &self.credentials.key_id)
            .header("APCA-API-SECRET-KEY", &self.credentials.secret_key)
    }

    /// Sends the request and returns status and body text.
    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<(u16, String), BrokerError> {
        let resp = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait]
impl Broker for AlpacaBroker {
    async fn get_open_position(&self, symbol: &str) -> PositionResult {
        let request = self.http.get(self.url(&format!("positions/{}", symbol)));
        match self.execute(request).await {
            Ok((status, body)) => position_result(status, &body),
            Err(e) => PositionResult::Error(e),
        }
    }

    async fn get_open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>, BrokerError> {
        let request = self
            .http
            .get(self.url("orders"))
            .query(&[("status", "open"), ("symbols", symbol)]);
        let (status, body) = self.execute(request).await?;
        ensure_success(status, &body)?;

        let raw: Vec<AlpacaOrder> =
            serde_json::from_str(&body).map_err(|e| BrokerError::Decode(e.to_string()))?;
        raw.into_iter().map(AlpacaOrder::into_open_order).collect()
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        let request = self.http.delete(self.url(&format!("orders/{}", order_id)));
        let (status, body) = self.execute(request).await?;
        if status == 404 {
            return Err(BrokerError::OrderNotFound(order_id.to_string()));
        }
        ensure_success(status, &body)
    }

    async fn submit_order(&self, request: &LimitOrderRequest) -> Result<OrderRecord, BrokerError> {
        let payload = NewOrderPayload::from(request);
        let builder = self.http.post(self.url("orders")).json(&payload);
        let (status, body) = self.execute(builder).await?;
        ensure_success(status, &body)?;

        let raw: AlpacaOrder =
            serde_json::from_str(&body).map_err(|e| BrokerError::Decode(e.to_string()))?;
        raw.into_open_order()
    }
}

/// Classifies a position response. 404 means the account holds nothing.
fn position_result(status: u16, body: &str) -> PositionResult {
    if status == 404 {
        return PositionResult::NotFound;
    }
    if let Err(e) = ensure_success(status, body) {
        return PositionResult::Error(e);
    }
    match serde_json::from_str::<AlpacaPosition>(body) {
        Ok(raw) => match parse_decimal("qty", &raw.qty) {
            Ok(quantity) => PositionResult::Found(Position::new(raw.symbol, quantity)),
            Err(e) => PositionResult::Error(e),
        },
        Err(e) => PositionResult::Error(BrokerError::Decode(e.to_string())),
    }
}

fn ensure_success(status: u16, body: &str) -> Result<(), BrokerError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = serde_json::from_str::<AlpacaError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string());
    Err(BrokerError::Rejected { status, message })
}

fn parse_decimal(field: &str, value: &str) -> Result<f64, BrokerError> {
    value
        .parse::<f64>()
        .map_err(|_| BrokerError::Decode(format!("{} is not a number: {:?}", field, value)))
}

#[derive(Debug, Deserialize)]
struct AlpacaError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    qty: String,
}

// Alpaca encodes decimals as strings.
#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    symbol: String,
    side: OrderSide,
    qty: Option<String>,
    limit_price: Option<String>,
    time_in_force: TimeInForce,
}

impl AlpacaOrder {
    fn into_open_order(self) -> Result<OpenOrder, BrokerError> {
        let quantity = match &self.qty {
            Some(qty) => parse_decimal("qty", qty)?,
            None => 0.0,
        };
        let limit_price = match &self.limit_price {
            Some(price) => parse_decimal("limit_price", price)?,
            None => 0.0,
        };
        Ok(OpenOrder::new(
            self.id,
            self.symbol,
            self.side,
            limit_price,
            quantity,
            self.time_in_force,
        ))
    }
}

#[derive(Debug, Serialize)]
struct NewOrderPayload {
    symbol: String,
    qty: String,
    side: OrderSide,
    #[serde(rename = "type")]
    order_type: &'static str,
    time_in_force: TimeInForce,
    limit_price: String,
}

impl From<&LimitOrderRequest> for NewOrderPayload {
    fn from(request: &LimitOrderRequest) -> Self {
        Self {
            symbol: request.get_symbol().to_string(),
            qty: request.get_quantity().to_string(),
            side: request.get_side(),
            order_type: "limit",
            time_in_force: request.get_time_in_force(),
            limit_price: format!("{:.2}", request.get_limit_price()),
        }
    }
}
