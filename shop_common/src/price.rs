use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------       Price        ---------------------------------------------------------
/// A monetary amount, stored as an integer number of cents.
///
/// Catalog prices carry two decimal places; keeping them as cents avoids floating-point drift in totals while still
/// round-tripping through the database as a plain integer column.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Price(i64);

op!(binary Price, Add, add);
op!(binary Price, Sub, sub);
op!(inplace Price, AddAssign, add_assign);
op!(inplace Price, SubAssign, sub_assign);
op!(unary Price, Neg, neg);

impl Mul<i64> for Price {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a price: {0}")]
pub struct PriceConversionError(String);

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Price {}

impl TryFrom<u64> for Price {
    type Error = PriceConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(PriceConversionError(format!("Value {} is too large to convert to a Price", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", cents / 100, cents % 100)
    }
}

/// Parses a decimal amount with up to two decimal places, e.g. "10", "10.5" or "10.50".
impl FromStr for Price {
    type Err = PriceConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let err = || PriceConversionError(format!("'{raw}' is not a valid price"));
        let negative = raw.starts_with('-');
        let s = raw.trim_start_matches('-').trim_start_matches('$');
        let (units, frac) = match s.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (s, ""),
        };
        if frac.len() > 2 {
            return Err(err());
        }
        let units = units.parse::<u64>().map_err(|_| err())?;
        let mut cents = if frac.is_empty() { 0 } else { frac.parse::<u64>().map_err(|_| err())? };
        if frac.len() == 1 {
            cents *= 10;
        }
        let value = units.checked_mul(100).and_then(|u| u.checked_add(cents)).ok_or_else(err)?;
        let value = i64::try_from(value).map_err(|_| err())?;
        Ok(Self(if negative { -value } else { value }))
    }
}

impl Price {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// A price of the given whole currency units, e.g. `Price::from_units(10)` is $10.00.
    pub fn from_units(units: i64) -> Self {
        Self(units * 100)
    }
}
