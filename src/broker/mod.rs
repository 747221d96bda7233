//! Brokerage session contract
//!
//! The plugin depends only on the [`Brokerage`] trait. [`RobinhoodClient`]
//! is the HTTP implementation; tests substitute a recording double.

mod order;
mod robinhood;
mod types;

pub use robinhood::{RobinhoodClient, RobinhoodConnector, DEFAULT_BASE_URL, DEFAULT_CLIENT_ID};
pub use types::{Credentials, OptionType, TimeInForce, PASSWORD_ENV, USERNAME_ENV};
pub(crate) use types::env_value;

use crate::error::BrokerError;
use serde_json::Value;

/// Result type for brokerage calls
pub type BrokerResult<T> = std::result::Result<T, BrokerError>;

/// An authenticated brokerage session.
///
/// Every call blocks until the brokerage answers. Responses are the
/// brokerage's own JSON, not a local model.
pub trait Brokerage: Send + Sync {
    /// Full quote record for a ticker
    fn quote_data(&self, stock: &str) -> BrokerResult<Value>;

    /// Selected quote keys for comma-separated tickers
    fn get_quote_list(&self, stock: &str, key: &str) -> BrokerResult<Vec<Value>>;

    fn get_quote(&self, stock: &str) -> BrokerResult<Value>;

    /// Market data for instrument URLs, in input order
    fn get_stock_marketdata(&self, instruments: &[String]) -> BrokerResult<Vec<Value>>;

    /// Historical bars; valid pairs are 5minute|10minute with day|week,
    /// day with year, and week alone.
    fn get_historical_quotes(&self, stock: &str, interval: &str, span: &str)
        -> BrokerResult<Value>;

    fn get_news(&self, stock: &str) -> BrokerResult<Value>;

    /// Instruments on the first watchlist
    fn get_watchlists(&self) -> BrokerResult<Value>;

    fn ask_price(&self, stock: &str) -> BrokerResult<f64>;
    fn ask_size(&self, stock: &str) -> BrokerResult<u64>;
    fn bid_price(&self, stock: &str) -> BrokerResult<f64>;
    fn bid_size(&self, stock: &str) -> BrokerResult<u64>;
    fn last_trade_price(&self, stock: &str) -> BrokerResult<f64>;
    fn previous_close(&self, stock: &str) -> BrokerResult<f64>;
    fn previous_close_date(&self, stock: &str) -> BrokerResult<String>;
    fn symbol(&self, stock: &str) -> BrokerResult<String>;
    fn last_updated_at(&self, stock: &str) -> BrokerResult<String>;

    fn get_account(&self) -> BrokerResult<Value>;

    /// Fetch an arbitrary brokerage URL
    fn get_url(&self, url: &str) -> BrokerResult<Value>;

    fn get_tickers_by_tag(&self, tag: &str) -> BrokerResult<Vec<String>>;

    fn get_options(
        &self,
        stock: &str,
        expiration_dates: &[String],
        option_type: OptionType,
    ) -> BrokerResult<Vec<Value>>;

    fn get_options_owned(&self) -> BrokerResult<Vec<Value>>;
    fn get_option_market_data(&self, option_id: &str) -> BrokerResult<Value>;
    fn get_option_chainid(&self, symbol: &str) -> BrokerResult<String>;

    fn get_option_quote(
        &self,
        symbol: &str,
        strike: f64,
        expiration_date: &str,
        option_type: OptionType,
    ) -> BrokerResult<Value>;

    fn get_fundamentals(&self, stock: &str) -> BrokerResult<Value>;
    fn get_portfolio(&self) -> BrokerResult<Value>;
    fn order_history(&self) -> BrokerResult<Vec<Value>>;
    fn get_positions(&self) -> BrokerResult<Vec<Value>>;

    /// Positions with a non-zero quantity
    fn get_securities_owned(&self) -> BrokerResult<Vec<Value>>;

    fn place_market_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
    ) -> BrokerResult<Value>;

    fn place_limit_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
        price: f64,
    ) -> BrokerResult<Value>;

    fn place_stop_loss_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> BrokerResult<Value>;

    fn place_stop_limit_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        price: f64,
        quantity: u64,
    ) -> BrokerResult<Value>;

    fn place_market_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
    ) -> BrokerResult<Value>;

    fn place_limit_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        price: f64,
        quantity: u64,
    ) -> BrokerResult<Value>;

    fn place_stop_loss_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> BrokerResult<Value>;

    fn place_stop_limit_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        price: f64,
        stop_price: f64,
        quantity: u64,
    ) -> BrokerResult<Value>;

    /// Orders still working at the brokerage
    fn get_open_orders(&self) -> BrokerResult<Vec<Value>>;

    fn cancel_order(&self, order_id: &str) -> BrokerResult<Value>;
}

/// Establishes a brokerage session from credentials
pub trait Connector {
    type Session: Brokerage + 'static;

    fn connect(&self, credentials: &Credentials) -> BrokerResult<Self::Session>;
}
