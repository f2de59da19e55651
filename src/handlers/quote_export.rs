use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::{
    handlers::quote_render::MAINTENANCE_INCLUDED_NOTE,
    models::{
        quote::{Quote, QuoteResult, QuoteStatus},
        request::PricingModel,
    },
};

pub const SHEET_HEADER: [&str; 4] = ["Item", "Quantity", "Unit Price", "Subtotal"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Only priced quotes can be exported, status was {0:?}")]
    NotPriced(QuoteStatus),

    #[error("Failed to write quote sheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write quote file: {0}")]
    Io(#[from] io::Error),
}

pub fn quote_filename(model: PricingModel, date: NaiveDate) -> String {
    format!("quote_{}_{}.csv", model, date.format("%Y-%m-%d"))
}

fn amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Writes the single quote sheet: one row per line item, then the totals
/// block. Escalated and invalid results have no numbers to write.
pub fn write_quote_csv<W: io::Write>(result: &QuoteResult, writer: W) -> Result<(), ExportError> {
    let quote = priced(result)?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(SHEET_HEADER)?;
    for item in &quote.line_items {
        csv_writer.write_record([
            item.label.clone(),
            item.quantity.to_string(),
            amount(item.unit_price),
            amount(item.subtotal),
        ])?;
    }

    let maintenance = if quote.maintenance_bundled {
        MAINTENANCE_INCLUDED_NOTE.to_string()
    } else {
        amount(quote.yearly_maintenance)
    };

    let totals = [
        ("Grand Total", amount(quote.grand_total)),
        ("Discount", amount(quote.discount)),
        ("Net Total", amount(quote.net_total)),
        ("Maintenance (Yearly)", maintenance),
    ];
    for (label, value) in totals {
        csv_writer.write_record([label, "", "", value.as_str()])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_quote(
    result: &QuoteResult,
    directory: &Path,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let quote = priced(result)?;

    fs::create_dir_all(directory)?;
    let path = directory.join(quote_filename(quote.pricing_model, date));
    let file = File::create(&path)?;
    write_quote_csv(result, file)?;

    info!("Quote exported to {}", path.display());

    Ok(path)
}

fn priced(result: &QuoteResult) -> Result<&Quote, ExportError> {
    result
        .quote()
        .ok_or_else(|| ExportError::NotPriced(result.status()))
}
