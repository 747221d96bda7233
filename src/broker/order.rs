//! Order ticket construction

use super::types::TimeInForce;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OrderKind {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Trigger {
    Immediate,
    Stop,
}

/// What the caller asked for, before account and instrument are resolved
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderSpec {
    pub side: Side,
    pub kind: OrderKind,
    pub trigger: Trigger,
    pub time_in_force: TimeInForce,
    pub price: Option<f64>,
    pub stop_price: Option<f64>,
    pub quantity: u64,
}

impl OrderSpec {
    pub fn market(side: Side, time_in_force: TimeInForce, quantity: u64) -> Self {
        Self {
            side,
            kind: OrderKind::Market,
            trigger: Trigger::Immediate,
            time_in_force,
            price: None,
            stop_price: None,
            quantity,
        }
    }

    pub fn limit(side: Side, time_in_force: TimeInForce, price: f64, quantity: u64) -> Self {
        Self {
            kind: OrderKind::Limit,
            price: Some(price),
            ..Self::market(side, time_in_force, quantity)
        }
    }

    /// Stop that becomes a market order once `stop_price` trades
    pub fn stop_loss(
        side: Side,
        time_in_force: TimeInForce,
        stop_price: f64,
        quantity: u64,
    ) -> Self {
        Self {
            trigger: Trigger::Stop,
            stop_price: Some(stop_price),
            ..Self::market(side, time_in_force, quantity)
        }
    }

    /// Stop that becomes a limit order at `price` once `stop_price` trades
    pub fn stop_limit(
        side: Side,
        time_in_force: TimeInForce,
        stop_price: f64,
        price: f64,
        quantity: u64,
    ) -> Self {
        Self {
            kind: OrderKind::Limit,
            trigger: Trigger::Stop,
            price: Some(price),
            stop_price: Some(stop_price),
            ..Self::market(side, time_in_force, quantity)
        }
    }

    /// Whether the brokerage needs a reference price filled in from the quote
    pub fn needs_quote_price(&self) -> bool {
        self.kind == OrderKind::Market && self.price.is_none()
    }
}

/// Body posted to the orders endpoint
#[derive(Debug, Serialize)]
pub(crate) struct OrderTicket<'a> {
    pub account: &'a str,
    pub instrument: &'a str,
    pub symbol: &'a str,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    pub time_in_force: TimeInForce,
    pub trigger: Trigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<f64>,
    pub quantity: u64,
    pub side: Side,
}

impl<'a> OrderTicket<'a> {
    pub fn new(
        request: &OrderSpec,
        account: &'a str,
        instrument: &'a str,
        symbol: &'a str,
    ) -> Self {
        Self {
            account,
            instrument,
            symbol,
            kind: request.kind,
            time_in_force: request.time_in_force,
            trigger: request.trigger,
            price: request.price,
            stop_price: request.stop_price,
            quantity: request.quantity,
            side: request.side,
        }
    }
}
