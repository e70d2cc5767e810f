//! Display helpers for monetary amounts handed to presentation layers.

use crate::types::Money;

/// Currency symbol used by [`human_currency`].
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Format an amount with the default symbol, thousands separators and no
/// decimal places, e.g. `₹4,028`.
pub fn human_currency(amount: Money) -> String {
    format_currency(amount, DEFAULT_CURRENCY_SYMBOL)
}

/// Format an amount with the given symbol, thousands separators and no
/// decimal places. Halves round to even.
pub fn format_currency(amount: Money, symbol: &str) -> String {
    let rounded = amount.round_dp(0);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_human_currency_groups_thousands() {
        assert_eq!(human_currency(dec!(4027.97)), "₹4,028");
        assert_eq!(human_currency(dec!(966_711.84)), "₹966,712");
        assert_eq!(human_currency(dec!(1_234_567)), "₹1,234,567");
    }

    #[test]
    fn test_small_and_zero_amounts() {
        assert_eq!(human_currency(dec!(0)), "₹0");
        assert_eq!(human_currency(dec!(0.4)), "₹0");
        assert_eq!(human_currency(dec!(999)), "₹999");
        assert_eq!(human_currency(dec!(100.00)), "₹100");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(format_currency(dec!(-1234.4), "$"), "-$1,234");
        assert_eq!(format_currency(dec!(-0.2), "$"), "$0");
    }

    #[test]
    fn test_half_rounds_to_even() {
        assert_eq!(format_currency(dec!(2.5), "$"), "$2");
        assert_eq!(format_currency(dec!(3.5), "$"), "$4");
    }
}
