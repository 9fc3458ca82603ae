use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Rounding applied whenever a decimal result is cut to a fixed scale.
///
/// Names follow the usual decimal rounding modes; `HalfUp` rounds ties away
/// from zero, so it is symmetric for negated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    Up,
    Down,
    Ceiling,
    Floor,
    HalfUp,
    HalfDown,
    HalfEven,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        RoundingPolicy::HalfUp
    }
}

impl RoundingPolicy {
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingPolicy::Up => RoundingStrategy::AwayFromZero,
            RoundingPolicy::Down => RoundingStrategy::ToZero,
            RoundingPolicy::Ceiling => RoundingStrategy::ToPositiveInfinity,
            RoundingPolicy::Floor => RoundingStrategy::ToNegativeInfinity,
            RoundingPolicy::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingPolicy::HalfDown => RoundingStrategy::MidpointTowardZero,
            RoundingPolicy::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoundingPolicy::Up => "Up",
            RoundingPolicy::Down => "Down",
            RoundingPolicy::Ceiling => "Ceiling",
            RoundingPolicy::Floor => "Floor",
            RoundingPolicy::HalfUp => "Half Up",
            RoundingPolicy::HalfDown => "Half Down",
            RoundingPolicy::HalfEven => "Half Even",
        }
    }

    /// Round `value` to `scale` fractional digits.
    pub fn round(&self, value: Decimal, scale: u32) -> Decimal {
        value.round_dp_with_strategy(scale, self.strategy())
    }
}

/// Divide and round the quotient to `scale` fractional digits.
///
/// Fails on a zero divisor or when the quotient does not fit a `Decimal`.
pub fn divide_round(
    numerator: Decimal,
    denominator: Decimal,
    scale: u32,
    rounding: RoundingPolicy,
) -> Result<Decimal> {
    if denominator.is_zero() {
        return Err(ChartError::InvalidConfiguration(format!(
            "division of {numerator} by zero"
        )));
    }
    let quotient = numerator
        .checked_div(denominator)
        .ok_or(ChartError::Overflow("quotient"))?;
    Ok(rounding.round(quotient, scale))
}

/// Convert an already rounded decimal to a pixel coordinate, saturating at the
/// `i32` limits.
pub fn to_pixel(value: Decimal) -> i32 {
    let whole = value.trunc();
    whole.to_i32().unwrap_or(if whole.is_sign_negative() {
        i32::MIN
    } else {
        i32::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn half_up_rounds_ties_away_from_zero() {
        assert_eq!(RoundingPolicy::HalfUp.round(dec!(2.5), 0), dec!(3));
        assert_eq!(RoundingPolicy::HalfUp.round(dec!(-2.5), 0), dec!(-3));
        assert_eq!(RoundingPolicy::HalfEven.round(dec!(2.5), 0), dec!(2));
        assert_eq!(RoundingPolicy::Floor.round(dec!(-2.1), 0), dec!(-3));
    }

    #[test]
    fn divide_round_keeps_requested_scale() {
        let q = divide_round(dec!(1), dec!(3), 4, RoundingPolicy::HalfUp).unwrap();
        assert_eq!(q, dec!(0.3333));
        let q = divide_round(dec!(2), dec!(3), 4, RoundingPolicy::Down).unwrap();
        assert_eq!(q, dec!(0.6666));
    }

    #[test]
    fn divide_by_zero_is_rejected() {
        let err = divide_round(dec!(1), Decimal::ZERO, 2, RoundingPolicy::HalfUp);
        assert!(matches!(err, Err(ChartError::InvalidConfiguration(_))));
    }

    #[test]
    fn pixel_conversion_saturates() {
        assert_eq!(to_pixel(dec!(42)), 42);
        assert_eq!(to_pixel(dec!(-7)), -7);
        let huge = Decimal::from(10_000_000_000i64);
        assert_eq!(to_pixel(huge), i32::MAX);
        assert_eq!(to_pixel(-huge), i32::MIN);
    }
}
