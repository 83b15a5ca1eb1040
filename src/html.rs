//! Helpers shared by the rendered views.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `number` as dollars with two decimal places, e.g. "$12.50" or "-$3.00".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter("$"));
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| currency_formatter("-$"));

    let formatted_string = match (number, positive_fmt, negative_fmt) {
        // Zero is hardcoded as "0" by numfmt.
        (number, _, _) if number == 0.0 || !number.is_finite() => return "$0.00".to_owned(),
        (number, _, Some(formatter)) if number < 0.0 => formatter.fmt_string(number.abs()),
        (number, Some(formatter), _) if number > 0.0 => formatter.fmt_string(number),
        (number, _, _) if number < 0.0 => return format!("-${:.2}", number.abs()),
        (number, _, _) => return format!("${number:.2}"),
    };

    pad_decimals(formatted_string)
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    match Formatter::currency(prefix) {
        Ok(formatter) => Some(formatter.precision(Precision::Decimals(2))),
        Err(error) => {
            tracing::error!("Could not create currency formatter: {error:?}");
            None
        }
    }
}

/// numfmt drops trailing zeros, so "12.30" comes out as "12.3" and "5.00" as "5".
fn pad_decimals(formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        None => format!("{formatted_string}.00"),
        Some(dot) => match formatted_string.len() - dot - 1 {
            0 => format!("{formatted_string}00"),
            1 => format!("{formatted_string}0"),
            _ => formatted_string,
        },
    }
}

#[cfg(test)]
mod format_currency_tests {
    use super::{format_currency, pad_decimals};

    #[test]
    fn zero_has_two_decimals() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn positive_amount_is_prefixed() {
        assert_eq!(format_currency(12.5), "$12.50");
    }

    #[test]
    fn negative_amount_is_prefixed_with_sign() {
        assert_eq!(format_currency(-3.25), "-$3.25");
    }

    #[test]
    fn pads_missing_decimals() {
        assert_eq!(pad_decimals("$5".to_owned()), "$5.00");
        assert_eq!(pad_decimals("$5.".to_owned()), "$5.00");
        assert_eq!(pad_decimals("$5.1".to_owned()), "$5.10");
        assert_eq!(pad_decimals("$5.12".to_owned()), "$5.12");
    }
}
