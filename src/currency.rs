//! Currency formatting for tables and summaries.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format an amount as currency, e.g. `$1,234.50`, with a `-$` prefix for
/// negative values.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    // Zero is hardcoded as "0", so the formatted string for zero is spelled
    // out here.
    let mut formatted = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        return "$0.00".to_owned();
    };

    // numfmt omits the last trailing zero, e.g. "12.30" is rendered as
    // "12.3", so it is appended here.
    if formatted.as_bytes()[formatted.len() - 3] != b'.' {
        formatted.push('0');
    }

    formatted
}

/// Format an amount with an explicit sign, e.g. `+$2,000.00` or `-$150.50`.
pub fn format_signed_currency(number: f64) -> String {
    if number > 0.0 {
        format!("+{}", format_currency(number))
    } else {
        format_currency(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_thousands_and_decimals() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(2000.0), "$2,000.00");
        assert_eq!(format_currency(4.5), "$4.50");
    }

    #[test]
    fn formats_zero_and_negatives() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-150.5), "-$150.50");
    }

    #[test]
    fn signed_formatting_marks_income() {
        assert_eq!(format_signed_currency(2000.0), "+$2,000.00");
        assert_eq!(format_signed_currency(-150.5), "-$150.50");
        assert_eq!(format_signed_currency(0.0), "$0.00");
    }
}
