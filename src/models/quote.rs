use serde::{Deserialize, Serialize};

use super::request::{CustomerType, PricingModel};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LineItem {
    pub label: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

impl LineItem {
    pub fn is_empty(&self) -> bool {
        self.quantity == 0 && self.subtotal == 0.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Quote {
    pub pricing_model: PricingModel,
    pub customer_type: CustomerType,
    pub line_items: Vec<LineItem>,
    pub grand_total: f64,
    pub discount: f64,
    pub net_total: f64,
    pub yearly_maintenance: f64,
    pub maintenance_bundled: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Ok,
    ValidationError,
    EscalateToSales,
}

/// Outcome of one pricing call. Only `Ok` carries numbers; the other two
/// states withhold totals entirely.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteResult {
    Ok(Quote),
    ValidationError { message: String },
    EscalateToSales { message: String },
}

impl QuoteResult {
    pub fn status(&self) -> QuoteStatus {
        match self {
            QuoteResult::Ok(_) => QuoteStatus::Ok,
            QuoteResult::ValidationError { .. } => QuoteStatus::ValidationError,
            QuoteResult::EscalateToSales { .. } => QuoteStatus::EscalateToSales,
        }
    }

    pub fn quote(&self) -> Option<&Quote> {
        match self {
            QuoteResult::Ok(quote) => Some(quote),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            QuoteResult::Ok(_) => None,
            QuoteResult::ValidationError { message } | QuoteResult::EscalateToSales { message } => {
                Some(message.as_str())
            }
        }
    }
}
