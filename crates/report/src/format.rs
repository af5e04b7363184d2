use configuration::DisplaySettings;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as currency, e.g. `-$1,234.50`.
///
/// Rounds half away from zero to `decimal_places`, groups the integer part
/// with `thousands_separator` and puts the sign in front of the symbol.
pub fn format_currency(amount: Decimal, display: &DisplaySettings) -> String {
    let places = display.decimal_places;
    let rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.*}", places as usize, rounded.abs());
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + 8);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&display.currency_symbol);
    out.push_str(&group_thousands(whole, &display.thousands_separator));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Formats a fraction as a percentage, e.g. `0.1234` → `12.34%`.
pub fn format_percent(fraction: Decimal, places: u32) -> String {
    let percent = (fraction * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", places as usize, percent)
}

pub fn format_number(value: f64, places: usize) -> String {
    format!("{value:.places$}")
}

fn group_thousands(digits: &str, separator: &str) -> String {
    if separator.is_empty() || digits.len() <= 3 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
