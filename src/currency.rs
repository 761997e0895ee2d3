//! Rupiah formatting and parsing of the amount the user types in.
//!
//! Rupiah has no minor unit, so amounts are always whole numbers and use `.`
//! to separate thousands, e.g. "Rp 150.000".

/// The most digits kept from an amount the user typed in, so that every
/// amount fits in an `i64`.
pub const MAX_AMOUNT_DIGITS: usize = 15;

const THOUSANDS_SEPARATOR: char = '.';

/// Group the digits of `number` in threes with `.`, e.g. `1000000` is "1.000.000".
pub fn format_thousands(number: u64) -> String {
    let digits = number.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }

        grouped.push(digit);
    }

    grouped
}

/// Format `amount` as Rupiah, e.g. `-50000` is "-Rp 50.000".
pub fn format_rupiah(amount: i64) -> String {
    let digits = format_thousands(amount.unsigned_abs());

    if amount < 0 {
        format!("-Rp {digits}")
    } else {
        format!("Rp {digits}")
    }
}

/// An amount as typed into the amount field, normalised on every keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountInput {
    /// The amount as a whole number of Rupiah.
    pub raw: u64,
    /// The grouped digits to show in the field, empty if nothing was typed.
    pub display: String,
}

impl AmountInput {
    /// Keep only the digits of `text` and read them as a whole number.
    ///
    /// Anything that is not a digit (thousands separators, currency symbols,
    /// minus signs and decimal points) is dropped. Digits past the
    /// [MAX_AMOUNT_DIGITS]th are dropped too.
    pub fn parse(text: &str) -> Self {
        let digits: String = text
            .chars()
            .filter(char::is_ascii_digit)
            .take(MAX_AMOUNT_DIGITS)
            .collect();

        if digits.is_empty() {
            return Self {
                raw: 0,
                display: String::new(),
            };
        }

        let raw = digits
            .bytes()
            .fold(0u64, |total, digit| total * 10 + u64::from(digit - b'0'));

        Self {
            raw,
            display: format_thousands(raw),
        }
    }

    /// Whether the amount can be saved as a transaction.
    pub fn is_valid(&self) -> bool {
        self.raw > 0
    }
}

#[cfg(test)]
mod currency_tests {
    use super::{AmountInput, format_rupiah, format_thousands};

    #[test]
    fn formats_rupiah() {
        assert_eq!(format_rupiah(150_000), "Rp 150.000");
        assert_eq!(format_rupiah(999), "Rp 999");
        assert_eq!(format_rupiah(1_000), "Rp 1.000");
        assert_eq!(format_rupiah(1_234_567_890), "Rp 1.234.567.890");
    }

    #[test]
    fn formats_zero_rupiah() {
        assert_eq!(format_rupiah(0), "Rp 0");
    }

    #[test]
    fn formats_negative_rupiah() {
        assert_eq!(format_rupiah(-50_000), "-Rp 50.000");
    }

    #[test]
    fn formats_trillions_without_exponent() {
        assert_eq!(format_rupiah(1_000_000_000_000), "Rp 1.000.000.000.000");
        assert_eq!(format_rupiah(10_000_000_000_000), "Rp 10.000.000.000.000");
        assert_eq!(format_rupiah(120_000_000_000_000), "Rp 120.000.000.000.000");
        assert_eq!(
            format_rupiah(-100_000_000_000_000),
            "-Rp 100.000.000.000.000"
        );
    }

    #[test]
    fn formats_largest_values() {
        assert_eq!(format_thousands(u64::MAX), "18.446.744.073.709.551.615");
        assert_eq!(format_rupiah(i64::MIN), "-Rp 9.223.372.036.854.775.808");
    }

    #[test]
    fn parses_fourteen_digit_amount() {
        let amount = AmountInput::parse("100000000000000");

        assert_eq!(amount.raw, 100_000_000_000_000);
        assert_eq!(amount.display, "100.000.000.000.000");
    }

    #[test]
    fn formats_fifteen_digits_exactly() {
        assert_eq!(format_thousands(999_999_999_999_999), "999.999.999.999.999");
    }

    #[test]
    fn parses_plain_digits() {
        let amount = AmountInput::parse("1000000");

        assert_eq!(amount.raw, 1_000_000);
        assert_eq!(amount.display, "1.000.000");
        assert!(amount.is_valid());
    }

    #[test]
    fn parse_strips_separators_and_symbols() {
        let amount = AmountInput::parse("Rp 1.500.000,-");

        assert_eq!(amount.raw, 1_500_000);
        assert_eq!(amount.display, "1.500.000");
    }

    #[test]
    fn parse_ignores_sign() {
        assert_eq!(AmountInput::parse("-2500").raw, 2_500);
    }

    #[test]
    fn empty_input_is_zero_with_empty_display() {
        let amount = AmountInput::parse("");

        assert_eq!(amount.raw, 0);
        assert_eq!(amount.display, "");
        assert!(!amount.is_valid());
    }

    #[test]
    fn zero_input_is_invalid() {
        let amount = AmountInput::parse("0");

        assert_eq!(amount.raw, 0);
        assert_eq!(amount.display, "0");
        assert!(!amount.is_valid());
    }

    #[test]
    fn non_digit_input_is_zero() {
        assert_eq!(AmountInput::parse("abc").raw, 0);
    }

    #[test]
    fn digits_past_the_limit_are_dropped() {
        let amount = AmountInput::parse("12345678901234567890");

        assert_eq!(amount.raw, 123_456_789_012_345);
        assert_eq!(amount.display, "123.456.789.012.345");
    }

    #[test]
    fn leading_zeros_are_dropped_from_display() {
        let amount = AmountInput::parse("007500");

        assert_eq!(amount.raw, 7_500);
        assert_eq!(amount.display, "7.500");
    }
}
