//! Display Formatting
//!
//! The only place amounts are rounded. Core values stay unrounded.

/// Whole units with thousands separators, e.g. `1,250,000 VND`
pub fn format_amount(value: f64, currency: &str) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if currency.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{} {}", sign, grouped, currency)
    }
}

/// Two decimals, e.g. `7.14%`
pub fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}
