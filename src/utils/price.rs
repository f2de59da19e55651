pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn calculate_marked_up_price(base_price: f64, markup: f64) -> f64 {
    round_cents(base_price * (1.0 + markup))
}

pub fn calculate_subtotal(quantity: u32, unit_price: f64) -> f64 {
    round_cents(quantity as f64 * unit_price)
}

/// Thousands-separated amount with two decimals, e.g. `1234567.8` -> `1,234,567.80`.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}
