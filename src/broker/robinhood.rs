//! Robinhood REST client
//!
//! Blocking HTTP session against the Robinhood API. One OAuth2 password
//! grant at connect time; the bearer token is then attached to every call
//! made under the API root.

use super::order::{OrderSpec, OrderTicket, Side};
use super::types::{Credentials, OptionType, TimeInForce};
use super::{BrokerResult, Brokerage, Connector};
use crate::config::RobinhoodConfig;
use crate::error::BrokerError;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// Public API host
pub const DEFAULT_BASE_URL: &str = "https://api.robinhood.com";
/// OAuth client id used by the Robinhood web app
pub const DEFAULT_CLIENT_ID: &str = "c82SH0WZOsabOXGP2sxqcj34FxkvfnWRZBKlBjFS";

/// Upper bound on `next` links followed for one listing
pub const MAX_PAGES: usize = 1000;

/// Order states that are still working
const OPEN_ORDER_STATES: [&str; 4] = ["queued", "unconfirmed", "confirmed", "partially_filled"];

/// Logs in and produces a [`RobinhoodClient`]
#[derive(Debug, Clone)]
pub struct RobinhoodConnector {
    base_url: String,
    client_id: String,
    timeout: Duration,
}

impl RobinhoodConnector {
    pub fn new(base_url: &str, client_id: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &RobinhoodConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.client_id,
            Duration::from_secs(config.timeout),
        )
    }
}

impl Default for RobinhoodConnector {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_CLIENT_ID, Duration::from_secs(30))
    }
}

impl Connector for RobinhoodConnector {
    type Session = RobinhoodClient;

    fn connect(&self, credentials: &Credentials) -> BrokerResult<RobinhoodClient> {
        let http = Client::builder().timeout(self.timeout).build()?;
        let device_token = uuid::Uuid::new_v4().to_string();

        let form = [
            ("grant_type", "password"),
            ("scope", "internal"),
            ("client_id", self.client_id.as_str()),
            ("expires_in", "86400"),
            ("device_token", device_token.as_str()),
            ("username", credentials.username()),
            ("password", credentials.password()),
        ];

        debug!("Requesting access token from {}", self.base_url);
        let response = http
            .post(format!("{}/oauth2/token/", self.base_url))
            .form(&form)
            .send()?;

        let status = response.status();
        if status.is_client_error() {
            let message = response.text().unwrap_or_default();
            return Err(BrokerError::Authentication(format!(
                "{} - {}",
                status.as_u16(),
                message
            )));
        }

        let body = read_json(response)?;
        if body.get("mfa_required").and_then(Value::as_bool) == Some(true) {
            return Err(BrokerError::Authentication(
                "multi-factor authentication required".to_string(),
            ));
        }

        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                let detail = body
                    .get("detail")
                    .and_then(Value::as_str)
                    .unwrap_or("no access token in response");
                BrokerError::Authentication(detail.to_string())
            })?;

        info!("Robinhood session established");
        Ok(RobinhoodClient {
            http,
            base_url: self.base_url.clone(),
            access_token: token.to_string(),
        })
    }
}

/// Authenticated Robinhood session
pub struct RobinhoodClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl RobinhoodClient {
    /// Resume a session from an access token obtained elsewhere
    pub fn with_access_token(
        base_url: &str,
        access_token: &str,
        timeout: Duration,
    ) -> BrokerResult<Self> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Endpoint under the API root, each segment percent-encoded.
    /// `{base}/quotes/{sym}/` is `endpoint(&["quotes", sym])`.
    fn endpoint(&self, segments: &[&str]) -> BrokerResult<String> {
        if let Some(bad) = segments
            .iter()
            .find(|s| matches!(s.trim(), "" | "." | ".."))
        {
            return Err(BrokerError::NotFound(format!("invalid path segment '{}'", bad)));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BrokerError::Parse(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| BrokerError::Parse(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url.to_string())
    }

    /// Only URLs under the API root get the access token
    fn is_own(&self, url: &str) -> bool {
        url.strip_prefix(&self.base_url)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
    }

    fn get_with(&self, url: &str, query: &[(&str, &str)]) -> BrokerResult<Value> {
        debug!("GET {}", url);
        let mut request = self.http.get(url).query(query);
        if self.is_own(url) {
            request = request.bearer_auth(&self.access_token);
        }
        read_json(request.send()?)
    }

    fn post_json<T: serde::Serialize>(&self, url: &str, body: &T) -> BrokerResult<Value> {
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()?;
        read_json(response)
    }

    /// Collect `results` across every `next` page.
    /// A `next` link seen before, or more than [`MAX_PAGES`] pages, is an error.
    fn get_paginated(&self, url: &str, query: &[(&str, &str)]) -> BrokerResult<Vec<Value>> {
        let mut results = Vec::new();
        let mut visited = HashSet::new();
        let mut page = self.get_with(url, query)?;

        loop {
            let next = page
                .get("next")
                .and_then(Value::as_str)
                .map(str::to_string);
            if let Some(Value::Array(items)) = page.get_mut("results").map(Value::take) {
                results.extend(items);
            }
            let Some(next) = next else { break };
            if visited.len() >= MAX_PAGES {
                return Err(BrokerError::Parse(format!(
                    "{} returned more than {} pages",
                    url, MAX_PAGES
                )));
            }
            if !visited.insert(next.clone()) {
                return Err(BrokerError::Parse(format!(
                    "pagination of {} loops back to {}",
                    url, next
                )));
            }
            page = self.get_with(&next, &[])?;
        }

        Ok(results)
    }

    fn first_result(&self, url: &str, query: &[(&str, &str)]) -> BrokerResult<Value> {
        let mut page = self.get_with(url, query)?;
        match page.get_mut("results").map(Value::take) {
            Some(Value::Array(items)) => items
                .into_iter()
                .next()
                .ok_or_else(|| BrokerError::NotFound(url.to_string())),
            _ => Err(BrokerError::NotFound(url.to_string())),
        }
    }

    fn instrument(&self, symbol: &str) -> BrokerResult<Value> {
        let symbol = symbol.to_uppercase();
        self.first_result(&self.url("instruments/"), &[("symbol", symbol.as_str())])
    }

    fn quote_field(&self, stock: &str, key: &str) -> BrokerResult<Value> {
        let mut quote = self.quote_data(stock)?;
        match quote.get_mut(key).map(Value::take) {
            Some(Value::Null) | None => Err(BrokerError::Parse(format!(
                "quote for {} has no {}",
                stock, key
            ))),
            Some(value) => Ok(value),
        }
    }

    fn submit_order(&self, symbol: &str, mut request: OrderSpec) -> BrokerResult<Value> {
        let symbol = symbol.to_uppercase();
        let account = self.get_account()?;
        let account_url = string_field(&account, "url")?;
        let instrument = self.instrument(&symbol)?;
        let instrument_url = string_field(&instrument, "url")?;

        if request.needs_quote_price() {
            request.price = Some(match request.side {
                Side::Buy => self.bid_price(&symbol)?,
                Side::Sell => self.ask_price(&symbol)?,
            });
        }

        let ticket = OrderTicket::new(&request, &account_url, &instrument_url, &symbol);
        info!(
            "Submitting {:?} {:?} order for {} x{}",
            request.side, request.kind, symbol, request.quantity
        );
        self.post_json(&self.url("orders/"), &ticket)
    }
}

/// Decode a response body, mapping HTTP failures onto [`BrokerError`].
/// An empty success body decodes to an empty object.
fn read_json(response: Response) -> BrokerResult<Value> {
    let status = response.status();
    let url = response.url().to_string();

    if status == StatusCode::NOT_FOUND {
        return Err(BrokerError::NotFound(url));
    }
    if !status.is_success() {
        let message = response.text().unwrap_or_default();
        return Err(BrokerError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text()?;
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(&body).map_err(|e| BrokerError::Parse(format!("{}: {}", url, e)))
}

fn string_field(value: &Value, key: &str) -> BrokerResult<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BrokerError::Parse(format!("missing string field '{}'", key)))
}

/// Quote numbers arrive as decimal strings
fn parse_f64(value: &Value) -> BrokerResult<f64> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|e| BrokerError::Parse(format!("'{}': {}", s, e))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| BrokerError::Parse(format!("'{}' is not a float", n))),
        other => Err(BrokerError::Parse(format!("'{}' is not numeric", other))),
    }
}

/// Sizes must be whole and non-negative; `"100.0000"` is accepted
fn parse_u64(value: &Value) -> BrokerResult<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| BrokerError::Parse(format!("'{}' is not a size", n))),
        Value::String(s) => match s.parse::<u64>() {
            Ok(n) => Ok(n),
            Err(_) => match s.parse::<f64>() {
                Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
                _ => Err(BrokerError::Parse(format!("'{}' is not a size", s))),
            },
        },
        other => Err(BrokerError::Parse(format!("'{}' is not numeric", other))),
    }
}

fn parse_string(value: Value) -> BrokerResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(BrokerError::Parse(format!("'{}' is not a string", other))),
    }
}

impl Brokerage for RobinhoodClient {
    fn quote_data(&self, stock: &str) -> BrokerResult<Value> {
        self.get_with(&self.endpoint(&["quotes", &stock.to_uppercase()])?, &[])
    }

    fn get_quote_list(&self, stock: &str, key: &str) -> BrokerResult<Vec<Value>> {
        let symbols = stock.to_uppercase();
        let mut page = self.get_with(&self.url("quotes/"), &[("symbols", symbols.as_str())])?;
        let keys: Vec<&str> = key.split(',').map(str::trim).collect();

        let quotes = match page.get_mut("results").map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        };

        Ok(quotes
            .into_iter()
            .filter(|quote| !quote.is_null())
            .map(|quote| {
                Value::Array(
                    keys.iter()
                        .map(|k| quote.get(*k).cloned().unwrap_or(Value::Null))
                        .collect(),
                )
            })
            .collect())
    }

    fn get_quote(&self, stock: &str) -> BrokerResult<Value> {
        self.quote_data(stock)
    }

    fn get_stock_marketdata(&self, instruments: &[String]) -> BrokerResult<Vec<Value>> {
        let joined = instruments.join(",");
        let mut page = self.get_with(
            &self.url("marketdata/quotes/"),
            &[("instruments", joined.as_str())],
        )?;
        match page.get_mut("results").map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    fn get_historical_quotes(
        &self,
        stock: &str,
        interval: &str,
        span: &str,
    ) -> BrokerResult<Value> {
        let symbol = stock.to_uppercase();
        self.get_with(
            &self.url("quotes/historicals/"),
            &[
                ("symbols", symbol.as_str()),
                ("interval", interval),
                ("span", span),
                ("bounds", "regular"),
            ],
        )
    }

    fn get_news(&self, stock: &str) -> BrokerResult<Value> {
        self.get_with(
            &self.endpoint(&["midlands", "news", &stock.to_uppercase()])?,
            &[],
        )
    }

    fn get_watchlists(&self) -> BrokerResult<Value> {
        let mut instruments = Vec::new();
        let lists = self.get_paginated(&self.url("watchlists/"), &[])?;

        if let Some(url) = lists.first().and_then(|l| l.get("url")).and_then(Value::as_str) {
            for entry in self.get_paginated(url, &[])? {
                if let Some(instrument) = entry.get("instrument").and_then(Value::as_str) {
                    instruments.push(self.get_url(instrument)?);
                }
            }
        }

        Ok(Value::Array(instruments))
    }

    fn ask_price(&self, stock: &str) -> BrokerResult<f64> {
        parse_f64(&self.quote_field(stock, "ask_price")?)
    }

    fn ask_size(&self, stock: &str) -> BrokerResult<u64> {
        parse_u64(&self.quote_field(stock, "ask_size")?)
    }

    fn bid_price(&self, stock: &str) -> BrokerResult<f64> {
        parse_f64(&self.quote_field(stock, "bid_price")?)
    }

    fn bid_size(&self, stock: &str) -> BrokerResult<u64> {
        parse_u64(&self.quote_field(stock, "bid_size")?)
    }

    fn last_trade_price(&self, stock: &str) -> BrokerResult<f64> {
        parse_f64(&self.quote_field(stock, "last_trade_price")?)
    }

    fn previous_close(&self, stock: &str) -> BrokerResult<f64> {
        parse_f64(&self.quote_field(stock, "previous_close")?)
    }

    fn previous_close_date(&self, stock: &str) -> BrokerResult<String> {
        parse_string(self.quote_field(stock, "previous_close_date")?)
    }

    fn symbol(&self, stock: &str) -> BrokerResult<String> {
        parse_string(self.quote_field(stock, "symbol")?)
    }

    fn last_updated_at(&self, stock: &str) -> BrokerResult<String> {
        parse_string(self.quote_field(stock, "updated_at")?)
    }

    fn get_account(&self) -> BrokerResult<Value> {
        self.first_result(&self.url("accounts/"), &[])
    }

    fn get_url(&self, url: &str) -> BrokerResult<Value> {
        self.get_with(url, &[])
    }

    fn get_tickers_by_tag(&self, tag: &str) -> BrokerResult<Vec<String>> {
        let listing = self.get_with(&self.endpoint(&["midlands", "tags", "tag", tag])?, &[])?;
        let urls = listing
            .get("instruments")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        urls.iter()
            .filter_map(Value::as_str)
            .map(|url| string_field(&self.get_url(url)?, "symbol"))
            .collect()
    }

    fn get_options(
        &self,
        stock: &str,
        expiration_dates: &[String],
        option_type: OptionType,
    ) -> BrokerResult<Vec<Value>> {
        let chain_id = self.get_option_chainid(stock)?;
        let dates = expiration_dates.join(",");
        self.get_paginated(
            &self.url("options/instruments/"),
            &[
                ("chain_id", chain_id.as_str()),
                ("expiration_dates", dates.as_str()),
                ("state", "active"),
                ("tradability", "tradable"),
                ("type", option_type.as_str()),
            ],
        )
    }

    fn get_options_owned(&self) -> BrokerResult<Vec<Value>> {
        self.get_paginated(&self.url("options/positions/"), &[("nonzero", "true")])
    }

    fn get_option_market_data(&self, option_id: &str) -> BrokerResult<Value> {
        self.get_with(&self.endpoint(&["marketdata", "options", option_id])?, &[])
    }

    fn get_option_chainid(&self, symbol: &str) -> BrokerResult<String> {
        string_field(&self.instrument(symbol)?, "tradable_chain_id")
    }

    fn get_option_quote(
        &self,
        symbol: &str,
        strike: f64,
        expiration_date: &str,
        option_type: OptionType,
    ) -> BrokerResult<Value> {
        let chain_id = self.get_option_chainid(symbol)?;
        let strike = format!("{:.4}", strike);
        let url = self.url("options/instruments/");
        let contract = self.first_result(
            &url,
            &[
                ("chain_id", chain_id.as_str()),
                ("expiration_dates", expiration_date),
                ("strike_price", strike.as_str()),
                ("state", "active"),
                ("tradability", "tradable"),
                ("type", option_type.as_str()),
            ],
        )?;
        let option_id = string_field(&contract, "id")?;
        self.get_option_market_data(&option_id)
    }

    fn get_fundamentals(&self, stock: &str) -> BrokerResult<Value> {
        self.get_with(
            &self.endpoint(&["fundamentals", &stock.to_uppercase()])?,
            &[],
        )
    }

    fn get_portfolio(&self) -> BrokerResult<Value> {
        self.first_result(&self.url("portfolios/"), &[])
    }

    fn order_history(&self) -> BrokerResult<Vec<Value>> {
        self.get_paginated(&self.url("orders/"), &[])
    }

    fn get_positions(&self) -> BrokerResult<Vec<Value>> {
        self.get_paginated(&self.url("positions/"), &[])
    }

    fn get_securities_owned(&self) -> BrokerResult<Vec<Value>> {
        self.get_paginated(&self.url("positions/"), &[("nonzero", "true")])
    }

    fn place_market_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.submit_order(symbol, OrderSpec::market(Side::Buy, time_in_force, quantity))
    }

    fn place_limit_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
        price: f64,
    ) -> BrokerResult<Value> {
        self.submit_order(
            symbol,
            OrderSpec::limit(Side::Buy, time_in_force, price, quantity),
        )
    }

    fn place_stop_loss_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.submit_order(
            symbol,
            OrderSpec::stop_loss(Side::Buy, time_in_force, stop_price, quantity),
        )
    }

    fn place_stop_limit_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        price: f64,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.submit_order(
            symbol,
            OrderSpec::stop_limit(Side::Buy, time_in_force, stop_price, price, quantity),
        )
    }

    fn place_market_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.submit_order(symbol, OrderSpec::market(Side::Sell, time_in_force, quantity))
    }

    fn place_limit_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        price: f64,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.submit_order(
            symbol,
            OrderSpec::limit(Side::Sell, time_in_force, price, quantity),
        )
    }

    fn place_stop_loss_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.submit_order(
            symbol,
            OrderSpec::stop_loss(Side::Sell, time_in_force, stop_price, quantity),
        )
    }

    fn place_stop_limit_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        price: f64,
        stop_price: f64,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.submit_order(
            symbol,
            OrderSpec::stop_limit(Side::Sell, time_in_force, stop_price, price, quantity),
        )
    }

    fn get_open_orders(&self) -> BrokerResult<Vec<Value>> {
        Ok(self
            .order_history()?
            .into_iter()
            .filter(|order| {
                order
                    .get("state")
                    .and_then(Value::as_str)
                    .map(|state| OPEN_ORDER_STATES.contains(&state))
                    .unwrap_or(false)
            })
            .collect())
    }

    fn cancel_order(&self, order_id: &str) -> BrokerResult<Value> {
        self.post_json(
            &self.endpoint(&["orders", order_id, "cancel"])?,
            &Value::Object(Map::new()),
        )
    }
}
