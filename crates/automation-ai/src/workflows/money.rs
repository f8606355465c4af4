use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;

use crate::workflows::validation::{hundredths, ValidationError};

/// Ten digits overall, two of them after the decimal point.
pub const MONEY_MAX_DIGITS: u32 = 10;

/// Currency amount in whole cents. Sums stay exact; the JSON form is a plain number
/// with at most two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Validate a caller-supplied amount.
    pub fn parse(field: &str, value: Option<f64>) -> Result<Option<Money>, ValidationError> {
        Ok(hundredths(field, value, MONEY_MAX_DIGITS)?.map(Money))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.fold(0_i64, |total, amount| total.saturating_add(amount.0)))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}
