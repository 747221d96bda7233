//! Recording brokerage double shared by unit tests

use crate::broker::{BrokerResult, Brokerage, Connector, Credentials, OptionType, TimeInForce};
use crate::error::BrokerError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serializes tests that set or remove process environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// One recorded call: operation name and its arguments in order
pub type Call = (String, Vec<Value>);

/// Returns canned values and records every call it receives
#[derive(Default)]
pub struct FakeBrokerage {
    calls: Mutex<Vec<Call>>,
    canned: HashMap<String, Value>,
    failures: HashMap<String, (u16, String)>,
}

impl FakeBrokerage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `op` with `value`
    pub fn returning(mut self, op: &str, value: Value) -> Self {
        self.canned.insert(op.to_string(), value);
        self
    }

    /// Answer `op` with an API error
    pub fn failing(mut self, op: &str, status: u16, message: &str) -> Self {
        self.failures
            .insert(op.to_string(), (status, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, op: &str, args: Vec<Value>) -> BrokerResult<Value> {
        self.calls.lock().unwrap().push((op.to_string(), args));
        if let Some((status, message)) = self.failures.get(op) {
            return Err(BrokerError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self
            .canned
            .get(op)
            .cloned()
            .unwrap_or_else(|| json!({ "op": op })))
    }

    fn list(&self, op: &str, args: Vec<Value>) -> BrokerResult<Vec<Value>> {
        Ok(self
            .respond(op, args)?
            .as_array()
            .cloned()
            .unwrap_or_default())
    }

    fn float(&self, op: &str, args: Vec<Value>) -> BrokerResult<f64> {
        Ok(self.respond(op, args)?.as_f64().unwrap_or(0.0))
    }

    fn size(&self, op: &str, args: Vec<Value>) -> BrokerResult<u64> {
        Ok(self.respond(op, args)?.as_u64().unwrap_or(0))
    }

    fn text(&self, op: &str, args: Vec<Value>) -> BrokerResult<String> {
        Ok(self
            .respond(op, args)?
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}

impl Brokerage for FakeBrokerage {
    fn quote_data(&self, stock: &str) -> BrokerResult<Value> {
        self.respond("quote_data", vec![json!(stock)])
    }

    fn get_quote_list(&self, stock: &str, key: &str) -> BrokerResult<Vec<Value>> {
        self.list("get_quote_list", vec![json!(stock), json!(key)])
    }

    fn get_quote(&self, stock: &str) -> BrokerResult<Value> {
        self.respond("get_quote", vec![json!(stock)])
    }

    fn get_stock_marketdata(&self, instruments: &[String]) -> BrokerResult<Vec<Value>> {
        self.list("get_stock_marketdata", vec![json!(instruments)])
    }

    fn get_historical_quotes(
        &self,
        stock: &str,
        interval: &str,
        span: &str,
    ) -> BrokerResult<Value> {
        self.respond(
            "get_historical_quotes",
            vec![json!(stock), json!(interval), json!(span)],
        )
    }

    fn get_news(&self, stock: &str) -> BrokerResult<Value> {
        self.respond("get_news", vec![json!(stock)])
    }

    fn get_watchlists(&self) -> BrokerResult<Value> {
        self.respond("get_watchlists", vec![])
    }

    fn ask_price(&self, stock: &str) -> BrokerResult<f64> {
        self.float("ask_price", vec![json!(stock)])
    }

    fn ask_size(&self, stock: &str) -> BrokerResult<u64> {
        self.size("ask_size", vec![json!(stock)])
    }

    fn bid_price(&self, stock: &str) -> BrokerResult<f64> {
        self.float("bid_price", vec![json!(stock)])
    }

    fn bid_size(&self, stock: &str) -> BrokerResult<u64> {
        self.size("bid_size", vec![json!(stock)])
    }

    fn last_trade_price(&self, stock: &str) -> BrokerResult<f64> {
        self.float("last_trade_price", vec![json!(stock)])
    }

    fn previous_close(&self, stock: &str) -> BrokerResult<f64> {
        self.float("previous_close", vec![json!(stock)])
    }

    fn previous_close_date(&self, stock: &str) -> BrokerResult<String> {
        self.text("previous_close_date", vec![json!(stock)])
    }

    fn symbol(&self, stock: &str) -> BrokerResult<String> {
        self.text("symbol", vec![json!(stock)])
    }

    fn last_updated_at(&self, stock: &str) -> BrokerResult<String> {
        self.text("last_updated_at", vec![json!(stock)])
    }

    fn get_account(&self) -> BrokerResult<Value> {
        self.respond("get_account", vec![])
    }

    fn get_url(&self, url: &str) -> BrokerResult<Value> {
        self.respond("get_url", vec![json!(url)])
    }

    fn get_tickers_by_tag(&self, tag: &str) -> BrokerResult<Vec<String>> {
        Ok(self
            .list("get_tickers_by_tag", vec![json!(tag)])?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect())
    }

    fn get_options(
        &self,
        stock: &str,
        expiration_dates: &[String],
        option_type: OptionType,
    ) -> BrokerResult<Vec<Value>> {
        self.list(
            "get_options",
            vec![json!(stock), json!(expiration_dates), json!(option_type)],
        )
    }

    fn get_options_owned(&self) -> BrokerResult<Vec<Value>> {
        self.list("get_options_owned", vec![])
    }

    fn get_option_market_data(&self, option_id: &str) -> BrokerResult<Value> {
        self.respond("get_option_market_data", vec![json!(option_id)])
    }

    fn get_option_chainid(&self, symbol: &str) -> BrokerResult<String> {
        self.text("get_option_chainid", vec![json!(symbol)])
    }

    fn get_option_quote(
        &self,
        symbol: &str,
        strike: f64,
        expiration_date: &str,
        option_type: OptionType,
    ) -> BrokerResult<Value> {
        self.respond(
            "get_option_quote",
            vec![
                json!(symbol),
                json!(strike),
                json!(expiration_date),
                json!(option_type),
            ],
        )
    }

    fn get_fundamentals(&self, stock: &str) -> BrokerResult<Value> {
        self.respond("get_fundamentals", vec![json!(stock)])
    }

    fn get_portfolio(&self) -> BrokerResult<Value> {
        self.respond("get_portfolio", vec![])
    }

    fn order_history(&self) -> BrokerResult<Vec<Value>> {
        self.list("order_history", vec![])
    }

    fn get_positions(&self) -> BrokerResult<Vec<Value>> {
        self.list("get_positions", vec![])
    }

    fn get_securities_owned(&self) -> BrokerResult<Vec<Value>> {
        self.list("get_securities_owned", vec![])
    }

    fn place_market_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.respond(
            "place_market_buy_order",
            vec![json!(symbol), json!(time_in_force), json!(quantity)],
        )
    }

    fn place_limit_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
        price: f64,
    ) -> BrokerResult<Value> {
        self.respond(
            "place_limit_buy_order",
            vec![json!(symbol), json!(time_in_force), json!(quantity), json!(price)],
        )
    }

    fn place_stop_loss_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.respond(
            "place_stop_loss_buy_order",
            vec![json!(symbol), json!(time_in_force), json!(stop_price), json!(quantity)],
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
        self.respond(
            "place_stop_limit_buy_order",
            vec![
                json!(symbol),
                json!(time_in_force),
                json!(stop_price),
                json!(price),
                json!(quantity),
            ],
        )
    }

    fn place_market_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.respond(
            "place_market_sell_order",
            vec![json!(symbol), json!(time_in_force), json!(quantity)],
        )
    }

    fn place_limit_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        price: f64,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.respond(
            "place_limit_sell_order",
            vec![json!(symbol), json!(time_in_force), json!(price), json!(quantity)],
        )
    }

    fn place_stop_loss_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> BrokerResult<Value> {
        self.respond(
            "place_stop_loss_sell_order",
            vec![json!(symbol), json!(time_in_force), json!(stop_price), json!(quantity)],
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
        self.respond(
            "place_stop_limit_sell_order",
            vec![
                json!(symbol),
                json!(time_in_force),
                json!(price),
                json!(stop_price),
                json!(quantity),
            ],
        )
    }

    fn get_open_orders(&self) -> BrokerResult<Vec<Value>> {
        self.list("get_open_orders", vec![])
    }

    fn cancel_order(&self, order_id: &str) -> BrokerResult<Value> {
        self.respond("cancel_order", vec![json!(order_id)])
    }
}

/// Hands out a prepared [`FakeBrokerage`] and remembers the credentials it saw
#[derive(Default)]
pub struct FakeConnector {
    pub seen: Mutex<Vec<(String, String)>>,
    pub reject: bool,
}

impl Connector for FakeConnector {
    type Session = FakeBrokerage;

    fn connect(&self, credentials: &Credentials) -> BrokerResult<FakeBrokerage> {
        self.seen.lock().unwrap().push((
            credentials.username().to_string(),
            credentials.password().to_string(),
        ));
        if self.reject {
            return Err(BrokerError::Authentication(
                "Unable to log in with provided credentials.".to_string(),
            ));
        }
        Ok(FakeBrokerage::new())
    }
}
