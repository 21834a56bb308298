//! Money values typed by hand into the modal, and their pt-BR rendering.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parses a user-typed amount.
///
/// The first comma is read as the decimal separator, then the longest leading
/// `[+-]digits[.digits]` run is taken, so `"50,00 reais"` reads as 50. No
/// leading number, or one too large for a `Decimal`, counts as zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let normalized = raw.trim().replacen(',', ".", 1);
    let number = leading_number(&normalized);
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return Decimal::ZERO;
    }

    let (negative, unsigned) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number.strip_prefix('+').unwrap_or(number)),
    };
    let unsigned = unsigned.trim_end_matches('.');
    let parsed = if unsigned.starts_with('.') {
        Decimal::from_str(&format!("0{unsigned}"))
    } else {
        Decimal::from_str(unsigned)
    };

    match parsed {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => Decimal::ZERO,
    }
}

fn leading_number(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    &s[..end]
}

/// Formats a value as Brazilian reais, e.g. `R$ 1.234,50`.
///
/// The space after the symbol is a no-break space (U+00A0).
pub fn format_brl(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    let digits = rounded.to_string();
    let (integer, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{sign}R$\u{a0}{},{cents}", group_thousands(integer))
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}
