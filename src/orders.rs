//! Orders
//!
//! Placing an order freezes the cart: its lines and totals are copied into the [`Order`] and
//! never recomputed. A placed order starts out pending and is then accepted or refused once.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartLine},
    pricing::{OrderPricing, OrderSummary, PricingError},
};

/// Errors related to placing or reviewing orders.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// An empty cart cannot be ordered.
    #[error("cannot place an order for an empty cart")]
    EmptyCart,

    /// The order has already been reviewed.
    #[error("order is {0}, only pending orders can be reviewed")]
    NotPending(OrderStatus),

    /// The status string is not one of the known statuses.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// Error calculating the order totals.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Review status of an order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
    /// Waiting for the sales team
    #[default]
    Pending,

    /// Accepted for delivery
    Accepted,

    /// Refused
    Refused,
}

impl OrderStatus {
    /// Stored status string.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "EN_ATTENTE",
            OrderStatus::Accepted => "ACCEPTEE",
            OrderStatus::Refused => "REFUSEE",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EN_ATTENTE" => Ok(OrderStatus::Pending),
            "ACCEPTEE" => Ok(OrderStatus::Accepted),
            "REFUSEE" => Ok(OrderStatus::Refused),
            _ => Err(OrderError::UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = OrderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed order
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    lines: Vec<CartLine<'a>>,
    summary: OrderSummary<'a>,
    status: OrderStatus,
}

impl<'a> Order<'a> {
    /// Lines as they were when the order was placed
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Totals as they were when the order was placed
    pub fn summary(&self) -> &OrderSummary<'a> {
        &self.summary
    }

    /// Current review status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Accept a pending order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotPending`] if the order was already reviewed.
    pub fn accept(&mut self) -> Result<(), OrderError> {
        self.review(OrderStatus::Accepted)
    }

    /// Refuse a pending order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotPending`] if the order was already reviewed.
    pub fn refuse(&mut self) -> Result<(), OrderError> {
        self.review(OrderStatus::Refused)
    }

    fn review(&mut self, outcome: OrderStatus) -> Result<(), OrderError> {
        if self.status != OrderStatus::Pending {
            warn!(status = %self.status, outcome = %outcome, "order already reviewed");

            return Err(OrderError::NotPending(self.status));
        }

        self.status = outcome;

        Ok(())
    }
}

/// Place an order for the cart's current lines.
///
/// # Errors
///
/// - [`OrderError::EmptyCart`]: the cart has no lines.
/// - [`OrderError::Pricing`]: the totals cannot be calculated.
pub fn place_order<'a>(
    cart: &Cart<'a>,
    pricing: &OrderPricing<'a>,
) -> Result<Order<'a>, OrderError> {
    if cart.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let summary = cart.summary(pricing)?;

    debug!(
        lines = cart.len(),
        total = summary.total().to_minor_units(),
        "placed order"
    );

    Ok(Order {
        lines: cart.lines().to_vec(),
        summary,
        status: OrderStatus::Pending,
    })
}
