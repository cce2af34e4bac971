//! Receipt

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    orders::Order,
    pricing::{OrderPricing, OrderSummary, PricingError},
    products::ProductId,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating the order summary.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A line total overflowed.
    #[error("line total for product {0} overflowed")]
    LineOverflow(ProductId),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Snapshot of a cart's lines together with its order summary.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[CartLine<'a>; 8]>,
    summary: OrderSummary<'a>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt for the cart's current lines.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the order summary cannot be calculated.
    pub fn new(cart: &Cart<'a>, pricing: &OrderPricing<'a>) -> Result<Self, ReceiptError> {
        Ok(Self {
            lines: cart.lines().iter().cloned().collect(),
            summary: cart.summary(pricing)?,
        })
    }

    /// Build a receipt for a placed order, using the totals frozen at placement.
    pub fn from_order(order: &Order<'a>) -> Self {
        Self {
            lines: order.lines().iter().cloned().collect(),
            summary: *order.summary(),
        }
    }

    /// Lines included in the receipt.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Order summary for the lines.
    pub fn summary(&self) -> &OrderSummary<'a> {
        &self.summary
    }

    /// Writes the receipt as a table followed by the summary amounts.
    ///
    /// # Errors
    ///
    /// Returns an error if a line total overflows or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Unit Price", "Qty", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            let line_total = line
                .line_total()
                .ok_or(ReceiptError::LineOverflow(line.product()))?;

            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name().to_string(),
                format!("{}", line.unit_price()),
                line.quantity().to_string(),
                format!("{line_total}"),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        write_summary(&mut out, &self.summary)?;

        Ok(())
    }
}

fn write_summary(out: &mut impl io::Write, summary: &OrderSummary<'_>) -> io::Result<()> {
    let rows: [(&str, Money<'_, Currency>); 4] = [
        ("Subtotal:", summary.subtotal()),
        ("Shipping:", summary.shipping()),
        ("Tax:", summary.tax()),
        ("Total:", summary.total()),
    ];

    let values: SmallVec<[String; 4]> = rows.iter().map(|(_, amount)| amount.to_string()).collect();

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = values.iter().map(String::len).max().unwrap_or(0);

    for ((label, _), value) in rows.iter().zip(values.iter()) {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    writeln!(out)
}
