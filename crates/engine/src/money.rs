use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount in **minor units** (cents).
///
/// Expense amounts and shares are never negative; the sign only shows up in
/// balances, where a positive value means the counterparty owes money.
///
/// Arithmetic is checked only: any aggregate that leaves the `i64` range is
/// reported as [`EngineError::InvalidAmount`].
///
/// ```rust
/// use engine::Amount;
///
/// let share = Amount::new(60_00);
/// assert_eq!(share.minor(), 6000);
/// assert_eq!(share.to_string(), "60.00");
/// assert_eq!(share.checked_sub(Amount::new(70_00)), Some(Amount::new(-10_00)));
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// `self + rhs`, or `InvalidAmount` when the result does not fit.
    pub fn try_add(self, rhs: Amount) -> Result<Amount, EngineError> {
        self.checked_add(rhs).ok_or_else(too_large)
    }

    /// `self - rhs`, or `InvalidAmount` when the result does not fit.
    pub fn try_sub(self, rhs: Amount) -> Result<Amount, EngineError> {
        self.checked_sub(rhs).ok_or_else(too_large)
    }

    pub fn checked_sum<I>(amounts: I) -> Result<Amount, EngineError>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, value| acc.try_add(value))
    }
}

fn too_large() -> EngineError {
    EngineError::InvalidAmount("amount too large".to_string())
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_two_decimals() {
        assert_eq!(Amount::new(0).to_string(), "0.00");
        assert_eq!(Amount::new(5).to_string(), "0.05");
        assert_eq!(Amount::new(6000).to_string(), "60.00");
        assert_eq!(Amount::new(-1050).to_string(), "-10.50");
        assert_eq!(Amount::new(i64::MIN).to_string(), "-92233720368547758.08");
    }

    #[test]
    fn checked_sum_detects_overflow() {
        let values = [Amount::new(i64::MAX), Amount::new(1)];
        assert!(Amount::checked_sum(values).is_err());
        assert_eq!(
            Amount::checked_sum([Amount::new(40), Amount::new(60)]).unwrap(),
            Amount::new(100)
        );
    }

    #[test]
    fn try_sub_detects_underflow() {
        assert_eq!(
            Amount::new(i64::MIN).try_sub(Amount::new(1)).unwrap_err(),
            EngineError::InvalidAmount("amount too large".to_string())
        );
        assert_eq!(
            Amount::new(100).try_sub(Amount::new(250)).unwrap(),
            Amount::new(-150)
        );
    }
}
