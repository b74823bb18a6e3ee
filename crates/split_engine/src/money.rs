use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use crate::AmountError;

/// Signed money amount represented as **integer cents**.
///
/// Every amount typed into a split is rounded to cents when parsed, so
/// summing many small splits never drifts.
///
/// `Display` is the normalized two-decimal form used on the wire:
///
/// ```rust
/// use split_engine::Money;
///
/// assert_eq!(Money::new(-3000).to_string(), "-30.00");
/// assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// Returns `self` with its magnitude kept and the sign of `reference`.
    ///
    /// A zero reference counts as positive.
    #[must_use]
    pub const fn with_sign_of(self, reference: Money) -> Money {
        let magnitude = self.0.saturating_abs();
        if reference.is_negative() {
            Money(-magnitude)
        } else {
            Money(magnitude)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl FromStr for Money {
    type Err = AmountError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`. Digits past the second fraction digit are rounded half away
    /// from zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountError::Invalid(s.to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let (units_str, frac_str) = match rest.find(['.', ',']) {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };

        if units_str.is_empty() && frac_str.is_empty() {
            return Err(invalid());
        }
        if !units_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| AmountError::Overflow)?
        };

        let digits = frac_str.as_bytes();
        let digit = |idx: usize| digits.get(idx).map_or(0, |d| i64::from(d - b'0'));
        let mut cents = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            cents += 1;
        }

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(AmountError::Overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

/// Parses user input, returning `None` for anything that is not a number.
#[must_use]
pub fn parse_amount(text: &str) -> Option<Money> {
    text.parse().ok()
}

/// Re-renders `text` with the sign of `reference`.
///
/// Split amounts follow the debit/credit direction of the transaction they
/// are split from. Unparsable input becomes `"0.00"`.
#[must_use]
pub fn signed_format(text: &str, reference: Money) -> String {
    parse_amount(text)
        .map(|value| value.with_sign_of(reference))
        .unwrap_or(Money::ZERO)
        .to_string()
}

/// Sums amount strings, counting unparsable entries as zero.
pub fn sum<'a>(amounts: impl IntoIterator<Item = &'a str>) -> Money {
    amounts
        .into_iter()
        .map(|text| parse_amount(text).unwrap_or(Money::ZERO))
        .fold(Money::ZERO, |acc, value| acc + value)
}

/// Formats an amount as US dollars, e.g. `-$1,234.50`.
#[must_use]
pub fn format_currency(amount: Money) -> String {
    let abs = amount.cents().unsigned_abs();
    let digits = (abs / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_normalizes_to_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(5).to_string(), "0.05");
        assert_eq!(Money::new(4000).to_string(), "40.00");
        assert_eq!(Money::new(-7050).to_string(), "-70.50");
    }

    #[test]
    fn parse_accepts_common_decimal_forms() {
        assert_eq!(parse_amount("40"), Some(Money::new(4000)));
        assert_eq!(parse_amount("40.5"), Some(Money::new(4050)));
        assert_eq!(parse_amount("40,50"), Some(Money::new(4050)));
        assert_eq!(parse_amount(" -0.01 "), Some(Money::new(-1)));
        assert_eq!(parse_amount("+1.00"), Some(Money::new(100)));
        assert_eq!(parse_amount(".5"), Some(Money::new(50)));
        assert_eq!(parse_amount("5."), Some(Money::new(500)));
    }

    #[test]
    fn parse_rounds_extra_fraction_digits() {
        assert_eq!(parse_amount("0.125"), Some(Money::new(13)));
        assert_eq!(parse_amount("0.1249"), Some(Money::new(12)));
        assert_eq!(parse_amount("-2.999"), Some(Money::new(-300)));
    }

    #[test]
    fn parse_rejects_non_numbers() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("1e3"), None);
        assert_eq!("".parse::<Money>(), Err(AmountError::Empty));
        assert_eq!(
            "99999999999999999999".parse::<Money>(),
            Err(AmountError::Overflow)
        );
    }

    #[test]
    fn signed_format_follows_reference_sign() {
        assert_eq!(signed_format("30", Money::new(-10000)), "-30.00");
        assert_eq!(signed_format("-30", Money::new(10000)), "30.00");
        assert_eq!(signed_format("12.3", Money::ZERO), "12.30");
        assert_eq!(signed_format("nope", Money::new(-10000)), "0.00");
    }

    #[test]
    fn sum_skips_unparsable_entries() {
        assert_eq!(sum([]), Money::ZERO);
        assert_eq!(sum(["10.10", "x", "", "-0.10"]), Money::new(1000));

        let many = vec!["0.10"; 1000];
        assert_eq!(sum(many), Money::new(10000));
    }

    #[test]
    fn currency_format_groups_thousands() {
        assert_eq!(format_currency(Money::new(10000)), "$100.00");
        assert_eq!(format_currency(Money::new(-123456789)), "-$1,234,567.89");
        assert_eq!(format_currency(Money::new(100000)), "$1,000.00");
        assert_eq!(format_currency(Money::ZERO), "$0.00");
    }
}
