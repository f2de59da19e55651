use std::fmt;

use crate::{
    models::quote::{Quote, QuoteResult},
    utils::price::format_amount,
};

pub const MAINTENANCE_INCLUDED_NOTE: &str = "Included in subscription";

const ITEM_WIDTH: usize = 26;
const QTY_WIDTH: usize = 8;
const AMOUNT_WIDTH: usize = 16;

pub fn render_text(result: &QuoteResult, currency: &str) -> String {
    match result {
        QuoteResult::Ok(quote) => render_quote(quote, currency),
        QuoteResult::ValidationError { message } => format!("Invalid input: {message}\n"),
        QuoteResult::EscalateToSales { message } => format!("Escalated to sales: {message}\n"),
    }
}

pub fn render_json(result: &QuoteResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn render_quote(quote: &Quote, currency: &str) -> String {
    QuoteTable { quote, currency }.to_string()
}

/// Fixed-width text table of one priced quote.
pub struct QuoteTable<'a> {
    pub quote: &'a Quote,
    pub currency: &'a str,
}

impl fmt::Display for QuoteTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = self.quote;
        let rule = "-".repeat(ITEM_WIDTH + QTY_WIDTH + AMOUNT_WIDTH * 2 + 3);

        writeln!(
            f,
            "{} quote for {} customer",
            quote.pricing_model.label(),
            quote.customer_type.label()
        )?;
        if !self.currency.is_empty() {
            writeln!(f, "Currency: {}", self.currency)?;
        }
        writeln!(f, "{rule}")?;
        write_row(f, "Item", "Qty", "Unit Price", "Subtotal")?;
        writeln!(f, "{rule}")?;

        for item in &quote.line_items {
            write_row(
                f,
                &item.label,
                &item.quantity.to_string(),
                &format_amount(item.unit_price),
                &format_amount(item.subtotal),
            )?;
        }

        writeln!(f, "{rule}")?;
        let totals = [
            ("Grand Total", format_amount(quote.grand_total)),
            ("Discount", format_amount(quote.discount)),
            ("Net Total", format_amount(quote.net_total)),
            ("Maintenance (Yearly)", maintenance_text(quote)),
        ];
        for (label, value) in totals {
            writeln!(
                f,
                "{:<w$} {:>aw$}",
                label,
                value,
                w = ITEM_WIDTH + QTY_WIDTH + AMOUNT_WIDTH + 2,
                aw = AMOUNT_WIDTH
            )?;
        }

        Ok(())
    }
}

fn write_row(
    f: &mut fmt::Formatter<'_>,
    item: &str,
    quantity: &str,
    unit_price: &str,
    subtotal: &str,
) -> fmt::Result {
    writeln!(
        f,
        "{:<iw$} {:>qw$} {:>aw$} {:>aw$}",
        item,
        quantity,
        unit_price,
        subtotal,
        iw = ITEM_WIDTH,
        qw = QTY_WIDTH,
        aw = AMOUNT_WIDTH
    )
}

pub fn maintenance_text(quote: &Quote) -> String {
    if quote.maintenance_bundled {
        MAINTENANCE_INCLUDED_NOTE.to_string()
    } else {
        format_amount(quote.yearly_maintenance)
    }
}
