//! Fixed-point monetary amount with 4 decimal places precision.
//!
//! Every balance, deposit, withdrawal and loan figure in the ledger is a
//! [`Money`] value in the ledger's single currency unit. Interest rates are
//! plain `rust_decimal::Decimal` values and only meet money through
//! [`Money::apply_rate`].
//!
//! A `Money` always carries exactly 4 decimal places. Values too large to be
//! stored at that scale are rejected on construction, and arithmetic is
//! checked, so an amount can always be formatted.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// A signed amount that maintains exactly 4 decimal places.
///
/// The largest representable magnitude is `7922816251426433759354395.0335`.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use bank_ledger::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.5000");
///
/// assert!(Money::from_str("79228162514264337593543950335").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 4;

    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a `Money` from a `Decimal`, rounding to 4 decimal places.
    ///
    /// Returns `None` if the value is too large to hold 4 decimal places.
    pub fn new(value: Decimal) -> Option<Self> {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        if normalized.scale() == Self::SCALE {
            Some(Money(normalized))
        } else {
            None
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` for amounts strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        Money::new(self.0.checked_add(rhs.0)?)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        Money::new(self.0.checked_sub(rhs.0)?)
    }

    /// Multiplies this amount by a fractional rate (`0.01` is one percent),
    /// rounding the product back to 4 decimal places.
    pub fn apply_rate(&self, rate: Decimal) -> Option<Money> {
        Money::new(self.0.checked_mul(rate)?)
    }
}

impl From<i64> for Money {
    /// Every `i64` fits: `i64::MAX * 10^4` is far below the 96-bit mantissa limit.
    fn from(value: i64) -> Self {
        Money(Decimal::from_i128_with_scale(
            i128::from(value) * 10_000,
            Self::SCALE,
        ))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Money::new(decimal).ok_or(if decimal.is_sign_negative() {
            rust_decimal::Error::LessThanMinimumPossibleValue
        } else {
            rust_decimal::Error::ExceedsMaximumPossibleValue
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
