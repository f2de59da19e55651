use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::{MaintenancePolicy, OverflowPolicy, Settings, StorageSelection},
    models::{
        quote::{LineItem, Quote, QuoteResult},
        request::{CustomerType, PricingModel, PricingRequest},
    },
    utils::{
        hardware::hardware_units,
        price::{calculate_marked_up_price, calculate_subtotal, round_cents},
        storage::{StorageCombo, choose_storage_combo, smallest_fitting},
        tier::{TierPrice, TierTable, tier_price},
    },
};

#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("AI cameras ({ai}) exceed total cameras ({total})")]
    AiExceedsTotal { ai: u64, total: u32 },

    #[error("Storage was requested without a positive TB requirement")]
    MissingStorage,

    #[error("Unrecognized storage size: no single unit holds {0} TB")]
    UnrecognizedStorageSize(u32),

    #[error("No catalog price for {0} TB storage unit")]
    UnpricedStorage(u32),

    #[error("{label} count {count} exceeds the standard pricing ceiling of {ceiling}")]
    AboveCeiling {
        label: &'static str,
        count: u32,
        ceiling: u32,
    },

    #[error("{label} count {count} is beyond the published price tiers")]
    BeyondTiers { label: &'static str, count: u32 },
}

impl QuoteError {
    pub fn escalates(&self) -> bool {
        matches!(
            self,
            QuoteError::AboveCeiling { .. } | QuoteError::BeyondTiers { .. }
        )
    }
}

impl From<QuoteError> for QuoteResult {
    fn from(err: QuoteError) -> Self {
        let message = err.to_string();
        if err.escalates() {
            QuoteResult::EscalateToSales {
                message: format!("{message}. Please contact sales for a custom quote."),
            }
        } else {
            QuoteResult::ValidationError { message }
        }
    }
}

pub const LABEL_BASE_LICENSE: &str = "Base License";
pub const LABEL_CAMERAS: &str = "Camera Licenses";
pub const LABEL_AI_BASE_LICENSE: &str = "AI Base License";
pub const LABEL_TIER1: &str = "AI Tier 1 Licenses";
pub const LABEL_TIER2: &str = "AI Tier 2 Licenses";
pub const LABEL_HARDWARE: &str = "AI Processing Hardware";

pub fn storage_label(size_tb: u32) -> String {
    format!("Storage {size_tb} TB")
}

/// Prices one request. Never fails: inconsistent input and out-of-range
/// counts come back as the matching `QuoteResult` state.
pub fn calculate(settings: &Settings, request: &PricingRequest) -> QuoteResult {
    match calculate_quote(settings, request) {
        Ok(quote) => {
            info!(
                "Quote calculated: model={} customer={} net_total={}",
                quote.pricing_model, quote.customer_type, quote.net_total
            );
            QuoteResult::Ok(quote)
        }
        Err(err) => {
            info!("Quote not priced: {err}");
            err.into()
        }
    }
}

pub fn calculate_quote(settings: &Settings, request: &PricingRequest) -> Result<Quote, QuoteError> {
    validate_request(request)?;

    let policy = &settings.policy;
    let (tier1, tier2) = request.ai_counts();

    if policy.overflow == OverflowPolicy::Escalate {
        let counts = [
            (LABEL_CAMERAS, request.total_cameras),
            (LABEL_TIER1, tier1),
            (LABEL_TIER2, tier2),
        ];
        if let Some((label, count)) = counts
            .into_iter()
            .find(|(_, count)| *count > policy.escalation_ceiling)
        {
            return Err(QuoteError::AboveCeiling {
                label,
                count,
                ceiling: policy.escalation_ceiling,
            });
        }
    }

    let book = settings.price_book(request.pricing_model);
    let camera_price = resolve_price(
        LABEL_CAMERAS,
        request.total_cameras,
        &book.cameras,
        policy.overflow,
    )?;
    let tier1_price = resolve_price(LABEL_TIER1, tier1, &book.tier1, policy.overflow)?;
    let tier2_price = resolve_price(LABEL_TIER2, tier2, &book.tier2, policy.overflow)?;

    let ai_base_qty = u32::from(tier1 > 0 || tier2 > 0);

    let mut discountable = vec![
        flat_line(LABEL_BASE_LICENSE, 1, book.base_license),
        flat_line(LABEL_CAMERAS, request.total_cameras, camera_price),
        flat_line(LABEL_AI_BASE_LICENSE, ai_base_qty, book.ai_base_license),
        flat_line(LABEL_TIER1, tier1, tier1_price),
        flat_line(LABEL_TIER2, tier2, tier2_price),
    ];

    let markup = markup_for(settings, request.customer_type);

    let units = hardware_units(tier1, tier2, &settings.hardware.capacity());
    let hardware_price = calculate_marked_up_price(settings.hardware.base_price, markup);
    let mut marked_up = vec![flat_line(LABEL_HARDWARE, units, hardware_price)];

    if request.include_storage {
        let required = request.storage_tb_required.unwrap_or(0);
        let combo = storage_combo(settings, required)?;
        debug!("Storage combo for {required} TB: {:?}", combo);

        for (size_tb, count) in combo.iter().rev() {
            let base = settings
                .storage
                .price_of(*size_tb)
                .ok_or(QuoteError::UnpricedStorage(*size_tb))?;
            let unit_price = calculate_marked_up_price(base, markup);
            marked_up.push(flat_line(&storage_label(*size_tb), *count, unit_price));
        }
    }

    let discount_base: f64 = discountable.iter().map(|l| l.subtotal).sum();
    let discount = if request.customer_type.is_preferential() {
        -round_cents(discount_base * settings.rates.partner_discount)
    } else {
        0.0
    };

    let grand_total =
        round_cents(discount_base + marked_up.iter().map(|l| l.subtotal).sum::<f64>());
    let net_total = round_cents(grand_total + discount);

    let maintenance_bundled = request.pricing_model == PricingModel::Subscription
        && policy.subscription_maintenance == MaintenancePolicy::Bundled;
    let yearly_maintenance = if maintenance_bundled {
        0.0
    } else {
        round_cents(net_total * settings.rates.maintenance)
    };

    discountable.append(&mut marked_up);
    let line_items: Vec<LineItem> = discountable.into_iter().filter(|l| !l.is_empty()).collect();

    debug!("Quote line items: {:?}", line_items);

    Ok(Quote {
        pricing_model: request.pricing_model,
        customer_type: request.customer_type,
        line_items,
        grand_total,
        discount,
        net_total,
        yearly_maintenance,
        maintenance_bundled,
    })
}

fn validate_request(request: &PricingRequest) -> Result<(), QuoteError> {
    let ai = request.ai_cameras();
    if ai > request.total_cameras as u64 {
        return Err(QuoteError::AiExceedsTotal {
            ai,
            total: request.total_cameras,
        });
    }

    if request.include_storage && request.storage_tb_required.unwrap_or(0) == 0 {
        return Err(QuoteError::MissingStorage);
    }

    Ok(())
}

fn resolve_price(
    label: &'static str,
    count: u32,
    table: &TierTable,
    overflow: OverflowPolicy,
) -> Result<f64, QuoteError> {
    match (tier_price(count, table), overflow) {
        (TierPrice::Price(price), _) => Ok(price),
        (TierPrice::Overflow, OverflowPolicy::FixedOverflowPrice) => table
            .overflow_price
            .ok_or(QuoteError::BeyondTiers { label, count }),
        (TierPrice::Overflow, OverflowPolicy::Escalate) => {
            Err(QuoteError::BeyondTiers { label, count })
        }
    }
}

fn storage_combo(settings: &Settings, required_tb: u32) -> Result<StorageCombo, QuoteError> {
    let sizes = settings.storage.sizes();
    match settings.policy.storage {
        StorageSelection::BinPacked => Ok(choose_storage_combo(required_tb, &sizes)),
        StorageSelection::SingleTier => smallest_fitting(required_tb, &sizes)
            .map(|size| StorageCombo::from([(size, 1)]))
            .ok_or(QuoteError::UnrecognizedStorageSize(required_tb)),
    }
}

fn markup_for(settings: &Settings, customer_type: CustomerType) -> f64 {
    match customer_type {
        CustomerType::Partner => settings.rates.partner_markup,
        CustomerType::NonPartner => settings.rates.non_partner_markup,
    }
}

fn flat_line(label: &str, quantity: u32, unit_price: f64) -> LineItem {
    LineItem {
        label: label.to_string(),
        quantity,
        unit_price,
        subtotal: calculate_subtotal(quantity, unit_price),
    }
}
