use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use crate::EngineError;

/// Number of fractional digits carried by every monetary value.
pub const FRACTION_DIGITS: usize = 8;

const SCALE: i64 = 100_000_000;

/// Signed money amount represented as **integer minor units** at 8 decimal
/// places (1 major unit = 100_000_000 minor units).
///
/// Use this type for **all** monetary values in the engine (budgets, unit
/// costs, request totals, ledger amounts) to avoid floating-point drift.
/// Because unit costs are stored at this scale and quantities are integers,
/// a request total is always exact; the 8-decimal rendering matches the
/// ledger's stored textual form.
///
/// The value is signed:
/// - positive = spend / decrease of a budget
/// - negative = reversal / restore of a budget
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::from_major(50);
/// assert_eq!(amount.to_string(), "50.00000000");
/// assert_eq!("10.5".parse::<Money>().unwrap(), Money::new(1_050_000_000));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units (10^-8 of a major unit).
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole major units.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * SCALE)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Multiplies a unit cost by an item quantity.
    ///
    /// The product of an 8-decimal unit cost and an integer quantity is exact
    /// at 8 decimals, so no rounding is involved; `None` means the result
    /// does not fit the representable range.
    #[must_use]
    pub fn checked_mul_quantity(self, quantity: u32) -> Option<Money> {
        let wide = i128::from(self.0).checked_mul(i128::from(quantity))?;
        i64::try_from(wide).ok().map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / SCALE as u64;
        let frac = abs % SCALE as u64;
        write!(f, "{sign}{major}.{frac:0width$}", width = FRACTION_DIGITS)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`.
    ///
    /// Validation rules:
    /// - max 8 fractional digits (rejects `1.000000001`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::Validation("empty amount".to_string());
        let invalid = || EngineError::Validation("invalid amount".to_string());
        let overflow = || EngineError::Validation("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| invalid())?;

        let frac: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > FRACTION_DIGITS {
                    return Err(EngineError::Validation("too many decimals".to_string()));
                }
                let digits: i64 = frac.parse().map_err(|_| invalid())?;
                digits * 10_i64.pow((FRACTION_DIGITS - frac.len()) as u32)
            }
        };

        let total = major
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_to_eight_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00000000");
        assert_eq!(Money::new(1).to_string(), "0.00000001");
        assert_eq!(Money::from_major(50).to_string(), "50.00000000");
        assert_eq!(Money::new(1_050_000_000).to_string(), "10.50000000");
        assert_eq!(Money::new(-1_050_000_000).to_string(), "-10.50000000");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap(), Money::from_major(10));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::new(1_050_000_000));
        assert_eq!("10,50".parse::<Money>().unwrap(), Money::new(1_050_000_000));
        assert_eq!("-0.00000001".parse::<Money>().unwrap(), Money::new(-1));
        assert_eq!("+1.00".parse::<Money>().unwrap(), Money::from_major(1));
        assert_eq!("  2.30 ".parse::<Money>().unwrap(), Money::new(230_000_000));
    }

    #[test]
    fn parse_rejects_more_than_eight_decimals() {
        assert!("1.000000001".parse::<Money>().is_err());
        assert!("0.123456789".parse::<Money>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for minor in [0, 1, 99, 100_000_000, 123_456_789_012, -50_000_000] {
            let money = Money::new(minor);
            assert_eq!(money.to_string().parse::<Money>().unwrap(), money);
        }
    }

    #[test]
    fn mul_quantity_is_exact() {
        let unit = "10.00".parse::<Money>().unwrap();
        assert_eq!(unit.checked_mul_quantity(5).unwrap(), Money::from_major(50));
        assert_eq!(
            Money::new(1).checked_mul_quantity(3).unwrap(),
            Money::new(3)
        );
        assert!(Money::new(i64::MAX).checked_mul_quantity(2).is_none());
    }
}
