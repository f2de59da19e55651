use camquote::{
    CustomerType, PricingModel, PricingRequest, QuoteResult, QuoteStatus, Settings, calculate,
    handlers::quote_calculate::{LABEL_HARDWARE, LABEL_TIER1},
    utils::storage::{StorageCombo, choose_storage_combo},
};

fn one_time(total: u32, tier1: u32, tier2: u32, customer_type: CustomerType) -> PricingRequest {
    PricingRequest {
        pricing_model: PricingModel::OneTime,
        customer_type,
        total_cameras: total,
        ai_enabled: true,
        tier1_cameras: tier1,
        tier2_cameras: tier2,
        include_storage: false,
        storage_tb_required: None,
    }
}

fn subtotal(result: &QuoteResult, label: &str) -> f64 {
    result
        .quote()
        .and_then(|q| q.line_items.iter().find(|l| l.label == label))
        .map(|l| l.subtotal)
        .unwrap_or(0.0)
}

#[test]
fn non_partner_22_cameras() {
    let result = calculate(
        &Settings::default(),
        &one_time(22, 5, 7, CustomerType::NonPartner),
    );
    let quote = result.quote().expect("priced quote");

    let expected: Vec<(&str, u32, f64, f64)> = vec![
        ("Base License", 1, 45000.0, 45000.0),
        ("Camera Licenses", 22, 1600.0, 35200.0),
        ("AI Base License", 1, 15000.0, 15000.0),
        ("AI Tier 1 Licenses", 5, 11000.0, 55000.0),
        ("AI Tier 2 Licenses", 7, 5600.0, 39200.0),
        ("AI Processing Hardware", 1, 84500.0, 84500.0),
    ];
    let actual: Vec<(&str, u32, f64, f64)> = quote
        .line_items
        .iter()
        .map(|l| (l.label.as_str(), l.quantity, l.unit_price, l.subtotal))
        .collect();

    assert_eq!(actual, expected);
    assert_eq!(quote.grand_total, 278900.0);
    assert_eq!(quote.discount, 0.0);
    assert_eq!(quote.net_total, 278900.0);
}

#[test]
fn partner_discount_with_markup_held_fixed() {
    let mut settings = Settings::default();
    settings.rates.partner_markup = settings.rates.non_partner_markup;

    let result = calculate(&settings, &one_time(22, 5, 7, CustomerType::Partner));
    let quote = result.quote().expect("priced quote");

    assert_eq!(subtotal(&result, LABEL_HARDWARE), 84500.0);
    assert_eq!(quote.grand_total, 278900.0);
    assert_eq!(quote.discount, -37880.0);
    assert_eq!(quote.net_total, 241020.0);
}

#[test]
fn toggling_discount_leaves_hardware_and_storage_alone() {
    let mut settings = Settings::default();
    settings.rates.partner_markup = settings.rates.non_partner_markup;

    let mut partner = one_time(40, 12, 20, CustomerType::Partner);
    partner.include_storage = true;
    partner.storage_tb_required = Some(23);
    let non_partner = PricingRequest {
        customer_type: CustomerType::NonPartner,
        ..partner.clone()
    };

    let with_discount = calculate(&settings, &partner);
    let without_discount = calculate(&settings, &non_partner);
    let a = with_discount.quote().unwrap();
    let b = without_discount.quote().unwrap();

    let marked_up = |q: &camquote::Quote| -> Vec<f64> {
        q.line_items
            .iter()
            .filter(|l| l.label == LABEL_HARDWARE || l.label.starts_with("Storage"))
            .map(|l| l.subtotal)
            .collect()
    };

    assert_eq!(marked_up(a), marked_up(b));
    assert_eq!(a.grand_total, b.grand_total);
    assert!(a.discount < 0.0);
    assert_eq!(b.discount, 0.0);
}

#[test]
fn above_ceiling_escalates_to_sales() {
    let result = calculate(
        &Settings::default(),
        &one_time(110, 60, 50, CustomerType::NonPartner),
    );

    assert_eq!(result.status(), QuoteStatus::EscalateToSales);
    assert!(result.quote().is_none());
    assert!(result.message().unwrap().contains("contact sales"));

    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("grand_total").is_none());
    assert!(json.get("line_items").is_none());
}

#[test]
fn ai_counts_beyond_total_is_a_validation_error() {
    let result = calculate(
        &Settings::default(),
        &one_time(10, 6, 5, CustomerType::Partner),
    );

    assert_eq!(result.status(), QuoteStatus::ValidationError);
    assert!(
        result
            .message()
            .unwrap()
            .contains("exceed total cameras")
    );
}

#[test]
fn fifteen_tb_is_packed_as_ten_plus_six() {
    let settings = Settings::default();
    assert_eq!(
        choose_storage_combo(15, &settings.storage.sizes()),
        StorageCombo::from([(6, 1), (10, 1)])
    );

    let mut request = one_time(22, 5, 7, CustomerType::NonPartner);
    request.include_storage = true;
    request.storage_tb_required = Some(15);
    let result = calculate(&settings, &request);

    let storage: Vec<(String, u32)> = result
        .quote()
        .unwrap()
        .line_items
        .iter()
        .filter(|l| l.label.starts_with("Storage"))
        .map(|l| (l.label.clone(), l.quantity))
        .collect();
    assert_eq!(
        storage,
        vec![("Storage 10 TB".to_string(), 1), ("Storage 6 TB".to_string(), 1)]
    );
    // 278900 + 10990 * 1.3 + 4990 * 1.3
    assert_eq!(result.quote().unwrap().grand_total, 278900.0 + 14287.0 + 6487.0);
}

#[test]
fn identical_requests_give_identical_results() {
    let settings = Settings::default();
    let request = PricingRequest::default();

    let first = calculate(&settings, &request);
    let second = calculate(&settings, &request);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn tier_prices_switch_at_bounds() {
    let settings = Settings::default();
    let at_fifty = calculate(&settings, &one_time(100, 50, 0, CustomerType::NonPartner));
    let past_fifty = calculate(&settings, &one_time(100, 51, 0, CustomerType::NonPartner));

    assert_eq!(subtotal(&at_fifty, LABEL_TIER1), 50.0 * 11000.0);
    assert_eq!(subtotal(&past_fifty, LABEL_TIER1), 51.0 * 8000.0);
}

#[test]
fn subscription_uses_its_own_price_book() {
    let settings = Settings::default();
    let request = PricingRequest {
        pricing_model: PricingModel::Subscription,
        ..one_time(22, 5, 7, CustomerType::NonPartner)
    };

    let result = calculate(&settings, &request);
    let quote = result.quote().unwrap();

    assert_eq!(subtotal(&result, "Base License"), 15000.0);
    assert_eq!(subtotal(&result, "Camera Licenses"), 22.0 * 550.0);
    assert_eq!(quote.yearly_maintenance, 0.0);
    assert!(quote.maintenance_bundled);
}

#[test]
fn json_request_with_ai_over_total_is_a_validation_error() {
    let request: PricingRequest = serde_json::from_str(
        r#"{
            "customer_type": "non-si",
            "total_cameras": 10,
            "ai_enabled": true,
            "tier1_cameras": 6,
            "tier2_cameras": 5,
            "include_storage": false
        }"#,
    )
    .unwrap();

    let result = calculate(&Settings::default(), &request);
    assert_eq!(result.status(), QuoteStatus::ValidationError);
    assert!(result.quote().is_none());
}

#[test]
fn json_request_keeps_ai_and_storage_lines() {
    let request: PricingRequest = serde_json::from_str(
        r#"{
            "customer_type": "non_partner",
            "total_cameras": 22,
            "ai_enabled": true,
            "tier1_cameras": 5,
            "tier2_cameras": 7,
            "include_storage": true,
            "storage_tb_required": 15
        }"#,
    )
    .unwrap();

    let result = calculate(&Settings::default(), &request);
    assert_eq!(subtotal(&result, LABEL_TIER1), 55000.0);
    assert_eq!(subtotal(&result, "Storage 10 TB"), 14287.0);
    assert_eq!(
        result.quote().unwrap().grand_total,
        278900.0 + 14287.0 + 6487.0
    );
}
