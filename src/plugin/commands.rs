//! Forwarding table
//!
//! Each method hands its arguments, unchanged and in order, to the
//! brokerage session and returns what the session returned. Only
//! `quote_data` and `get_stock_news` are registered as prompt commands.

use super::RobinhoodPlugin;
use crate::broker::{Brokerage, OptionType, TimeInForce};
use crate::error::{PluginError, Result};
use serde_json::Value;
use tracing::warn;

impl<B: Brokerage + 'static> RobinhoodPlugin<B> {
    /// Full quote record for a ticker
    pub fn quote_data(&self, stock: &str) -> Result<Value> {
        Ok(self.forward("quote_data").quote_data(stock)?)
    }

    /// Selected quote keys for one or more comma-separated tickers.
    /// Tickers the brokerage does not recognize are left out.
    pub fn get_quote_list(&self, stock: &str, key: &str) -> Result<Vec<Value>> {
        Ok(self.forward("get_quote_list").get_quote_list(stock, key)?)
    }

    pub fn get_quote(&self, stock: &str) -> Result<Value> {
        Ok(self.forward("get_quote").get_quote(stock)?)
    }

    /// Market data for each instrument URL, in input order
    pub fn get_stock_marketdata(&self, instruments: &[String]) -> Result<Vec<Value>> {
        Ok(self
            .forward("get_stock_marketdata")
            .get_stock_marketdata(instruments)?)
    }

    /// Historical bars.
    ///
    /// Valid combinations: `5minute` or `10minute` with `day` or `week`,
    /// `day` with `year`, and `week`.
    pub fn get_historical_quotes(&self, stock: &str, interval: &str, span: &str) -> Result<Value> {
        Ok(self
            .forward("get_historical_quotes")
            .get_historical_quotes(stock, interval, span)?)
    }

    /// News items for a ticker
    pub fn get_stock_news(&self, stock: &str) -> Result<Value> {
        Ok(self.forward("get_news").get_news(stock)?)
    }

    pub fn get_watchlists(&self) -> Result<Value> {
        Ok(self.forward("get_watchlists").get_watchlists()?)
    }

    pub fn ask_price(&self, stock: &str) -> Result<f64> {
        Ok(self.forward("ask_price").ask_price(stock)?)
    }

    pub fn ask_size(&self, stock: &str) -> Result<u64> {
        Ok(self.forward("ask_size").ask_size(stock)?)
    }

    pub fn bid_price(&self, stock: &str) -> Result<f64> {
        Ok(self.forward("bid_price").bid_price(stock)?)
    }

    pub fn bid_size(&self, stock: &str) -> Result<u64> {
        Ok(self.forward("bid_size").bid_size(stock)?)
    }

    pub fn last_trade_price(&self, stock: &str) -> Result<f64> {
        Ok(self.forward("last_trade_price").last_trade_price(stock)?)
    }

    pub fn previous_close(&self, stock: &str) -> Result<f64> {
        Ok(self.forward("previous_close").previous_close(stock)?)
    }

    pub fn previous_close_date(&self, stock: &str) -> Result<String> {
        Ok(self.forward("previous_close_date").previous_close_date(stock)?)
    }

    pub fn get_symbol(&self, stock: &str) -> Result<String> {
        Ok(self.forward("symbol").symbol(stock)?)
    }

    pub fn last_updated_at(&self, stock: &str) -> Result<String> {
        Ok(self.forward("last_updated_at").last_updated_at(stock)?)
    }

    pub fn get_account(&self) -> Result<Value> {
        Ok(self.forward("get_account").get_account()?)
    }

    pub fn get_url(&self, url: &str) -> Result<Value> {
        Ok(self.forward("get_url").get_url(url)?)
    }

    pub fn get_tickers_by_tag(&self, tag: &str) -> Result<Vec<String>> {
        Ok(self.forward("get_tickers_by_tag").get_tickers_by_tag(tag)?)
    }

    pub fn get_options(
        &self,
        stock: &str,
        expiration_dates: &[String],
        option_type: OptionType,
    ) -> Result<Vec<Value>> {
        Ok(self
            .forward("get_options")
            .get_options(stock, expiration_dates, option_type)?)
    }

    pub fn get_options_owned(&self) -> Result<Vec<Value>> {
        Ok(self.forward("get_options_owned").get_options_owned()?)
    }

    pub fn get_option_market_data(&self, option_id: &str) -> Result<Value> {
        Ok(self
            .forward("get_option_market_data")
            .get_option_market_data(option_id)?)
    }

    pub fn get_option_chainid(&self, symbol: &str) -> Result<String> {
        Ok(self.forward("get_option_chainid").get_option_chainid(symbol)?)
    }

    pub fn get_option_quote(
        &self,
        symbol: &str,
        strike: f64,
        expiration_date: &str,
        option_type: OptionType,
    ) -> Result<Value> {
        Ok(self
            .forward("get_option_quote")
            .get_option_quote(symbol, strike, expiration_date, option_type)?)
    }

    pub fn get_fundamentals(&self, stock: &str) -> Result<Value> {
        Ok(self.forward("get_fundamentals").get_fundamentals(stock)?)
    }

    pub fn get_portfolio(&self) -> Result<Value> {
        Ok(self.forward("get_portfolio").get_portfolio()?)
    }

    /// Order history.
    ///
    /// This entry point is declared without an instance receiver, so any
    /// call through a plugin fails with an argument-binding error before
    /// the brokerage is contacted.
    pub fn order_history(&self) -> Result<Vec<Value>> {
        warn!("order_history has no bound receiver; rejecting call");
        Err(PluginError::ArgumentBinding {
            method: "order_history",
            expected: 0,
            given: 1,
        })
    }

    pub fn get_positions(&self) -> Result<Vec<Value>> {
        Ok(self.forward("get_positions").get_positions()?)
    }

    pub fn get_securities_owned(&self) -> Result<Vec<Value>> {
        Ok(self.forward("get_securities_owned").get_securities_owned()?)
    }

    pub fn place_market_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
    ) -> Result<Value> {
        Ok(self
            .forward("place_market_buy_order")
            .place_market_buy_order(symbol, time_in_force, quantity)?)
    }

    pub fn place_limit_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
        price: f64,
    ) -> Result<Value> {
        Ok(self
            .forward("place_limit_buy_order")
            .place_limit_buy_order(symbol, time_in_force, quantity, price)?)
    }

    pub fn place_stop_loss_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> Result<Value> {
        Ok(self
            .forward("place_stop_loss_buy_order")
            .place_stop_loss_buy_order(symbol, time_in_force, stop_price, quantity)?)
    }

    pub fn place_stop_limit_buy_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        price: f64,
        quantity: u64,
    ) -> Result<Value> {
        Ok(self
            .forward("place_stop_limit_buy_order")
            .place_stop_limit_buy_order(symbol, time_in_force, stop_price, price, quantity)?)
    }

    pub fn place_market_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        quantity: u64,
    ) -> Result<Value> {
        Ok(self
            .forward("place_market_sell_order")
            .place_market_sell_order(symbol, time_in_force, quantity)?)
    }

    pub fn place_limit_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        price: f64,
        quantity: u64,
    ) -> Result<Value> {
        Ok(self
            .forward("place_limit_sell_order")
            .place_limit_sell_order(symbol, time_in_force, price, quantity)?)
    }

    pub fn place_stop_loss_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> Result<Value> {
        Ok(self
            .forward("place_stop_loss_sell_order")
            .place_stop_loss_sell_order(symbol, time_in_force, stop_price, quantity)?)
    }

    pub fn place_stop_limit_sell_order(
        &self,
        symbol: &str,
        time_in_force: TimeInForce,
        price: f64,
        stop_price: f64,
        quantity: u64,
    ) -> Result<Value> {
        Ok(self
            .forward("place_stop_limit_sell_order")
            .place_stop_limit_sell_order(symbol, time_in_force, price, stop_price, quantity)?)
    }

    pub fn get_open_orders(&self) -> Result<Vec<Value>> {
        Ok(self.forward("get_open_orders").get_open_orders()?)
    }

    /// Cancel an order.
    ///
    /// Declared without an instance receiver, like [`Self::order_history`]:
    /// the order id lands in the receiver slot and the call is rejected.
    pub fn cancel_order(&self, _order_id: &str) -> Result<Value> {
        warn!("cancel_order has no bound receiver; rejecting call");
        Err(PluginError::ArgumentBinding {
            method: "cancel_order",
            expected: 1,
            given: 2,
        })
    }
}
