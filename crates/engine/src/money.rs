use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use serde::{Serialize, Serializer};

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Use this type for all monetary values in the engine (unit prices,
/// payments, aggregate totals) to avoid floating-point drift. A payment is
/// computed as `price.times(quantity)`, which is exact in cents; the
/// two-decimal rounding the persisted schema requires therefore never loses
/// anything.
///
/// The textual form is always plain fixed two-decimal text (`"9.50"`): that
/// is what the flat-file contract stores and what the display layer
/// decorates with a currency symbol. The engine itself never formats
/// currency.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let price = MoneyCents::new(9_50);
/// assert_eq!(price.cents(), 950);
/// assert_eq!(price.to_string(), "9.50");
/// assert_eq!("9.5".parse::<MoneyCents>().unwrap(), price);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit amount by a quantity, saturating on overflow.
    ///
    /// Saturation is unreachable with realistic prices and stock levels but
    /// keeps the arithmetic total.
    #[must_use]
    pub fn times(self, quantity: u32) -> MoneyCents {
        MoneyCents(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for MoneyCents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses fixed-point decimal text (`"10"`, `"9.5"`, `"9.50"`).
    ///
    /// At most two decimal digits are accepted; the persisted schema never
    /// carries more.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (sign, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(EngineError::InvalidPrice(format!("empty amount: {s:?}")));
        }
        if frac.len() > 2 {
            return Err(EngineError::InvalidPrice(format!(
                "more than two decimals: {s:?}"
            )));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(EngineError::InvalidPrice(format!("not a number: {s:?}")));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| EngineError::InvalidPrice(format!("not a number: {s:?}")))?
        };
        let mut frac_value: i64 = if frac.is_empty() {
            0
        } else {
            frac.parse()
                .map_err(|_| EngineError::InvalidPrice(format!("not a number: {s:?}")))?
        };
        if frac.len() == 1 {
            frac_value *= 10;
        }

        whole_value
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac_value))
            .map(|v| MoneyCents(sign * v))
            .ok_or_else(|| EngineError::InvalidPrice(format!("amount out of range: {s:?}")))
    }
}
