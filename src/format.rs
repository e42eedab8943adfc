use rust_decimal::RoundingStrategy;

use crate::expense::Amount;

fn with_commas(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Render an amount as `₪ 1,234.50`.
///
/// Amounts the backend sent as text that is not a number are shown as is.
pub fn format_amount(amount: &Amount, symbol: &str) -> String {
    let Some(value) = amount.value() else {
        return amount.raw().to_owned();
    };

    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let cents = value
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", cents);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    format!("{}{} {}.{}", sign, symbol, with_commas(whole), fraction)
}
