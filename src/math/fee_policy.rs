use crate::error::{Error, ParamError};
use crate::math::math_helpers::{mul_div, mul_div_rounding_up};
use alloy_primitives::U256;

/// Fee rates are expressed in parts-per-million of the leg they apply to.
pub const RATE_PRECISION: u32 = 1_000_000;

const USES_QUOTE_BIT: u32 = 1 << 23;
const RATE_MASK: u32 = USES_QUOTE_BIT - 1;

/// A book's taker fee schedule: a ppm rate plus the leg it applies to.
///
/// When `uses_quote_for_fee` is set the fee is deducted from the quote
/// amount the taker receives; otherwise it is added on top of the base
/// amount the taker pays. Every consumer branches on the flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FeePolicy {
    rate_ppm: u32,
    uses_quote_for_fee: bool,
}

impl FeePolicy {
    pub fn new(rate_ppm: u32, uses_quote_for_fee: bool) -> Result<Self, Error> {
        if rate_ppm >= RATE_PRECISION {
            return Err(ParamError::FeeRateOutOfBounds.into());
        }
        Ok(Self {
            rate_ppm,
            uses_quote_for_fee,
        })
    }

    /// Decodes the on-chain policy word: bit 23 selects the fee leg, the
    /// low 23 bits carry the ppm rate.
    pub fn from_packed(raw: u32) -> Result<Self, Error> {
        if raw & !(USES_QUOTE_BIT | RATE_MASK) != 0 {
            return Err(ParamError::FeeRateOutOfBounds.into());
        }
        Self::new(raw & RATE_MASK, raw & USES_QUOTE_BIT != 0)
    }

    pub fn to_packed(&self) -> u32 {
        let flag = if self.uses_quote_for_fee {
            USES_QUOTE_BIT
        } else {
            0
        };
        flag | self.rate_ppm
    }

    pub fn rate_ppm(&self) -> u32 {
        self.rate_ppm
    }

    pub fn uses_quote_for_fee(&self) -> bool {
        self.uses_quote_for_fee
    }

    /// Fee charged on `amount`: `amount * rate / RATE_PRECISION`,
    /// truncating, +1 when `round_up` and the division was inexact.
    pub fn calculate_fee(&self, amount: U256, round_up: bool) -> Result<U256, Error> {
        let rate = U256::from(self.rate_ppm);
        let precision = U256::from(RATE_PRECISION);
        let fee = if round_up {
            mul_div_rounding_up(amount, rate, precision)?
        } else {
            mul_div(amount, rate, precision)?
        };
        Ok(fee)
    }

    /// Inverse of the deduction: the gross amount whose net-of-fee value
    /// is `net_amount`, i.e. `net * RATE_PRECISION / (RATE_PRECISION -
    /// rate)`, with the same rounding contract as [`calculate_fee`].
    pub fn calculate_original_amount(&self, net_amount: U256, round_up: bool) -> Result<U256, Error> {
        let precision = U256::from(RATE_PRECISION);
        let divider = U256::from(RATE_PRECISION - self.rate_ppm);
        let original = if round_up {
            mul_div_rounding_up(net_amount, precision, divider)?
        } else {
            mul_div(net_amount, precision, divider)?
        };
        Ok(original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_rate_at_or_above_precision() {
        assert!(FeePolicy::new(RATE_PRECISION, true).is_err());
        assert!(FeePolicy::new(RATE_PRECISION + 1, false).is_err());
        assert!(FeePolicy::new(RATE_PRECISION - 1, true).is_ok());
    }

    #[test]
    fn packed_word_round_trips() {
        for rate in [0u32, 1, 600, 2500, 30000, 999_999] {
            for uses_quote in [false, true] {
                let policy = FeePolicy::new(rate, uses_quote).unwrap();
                let decoded = FeePolicy::from_packed(policy.to_packed()).unwrap();
                assert_eq!(decoded, policy);
            }
        }
    }

    #[test]
    fn from_packed_rejects_stray_high_bits() {
        assert!(FeePolicy::from_packed(1 << 24).is_err());
        assert!(FeePolicy::from_packed(u32::MAX).is_err());
    }

    #[test]
    fn fee_rounding_direction_is_explicit() {
        // 1000 * 2500 / 1e6 = 2.5
        let policy = FeePolicy::new(2500, true).unwrap();
        assert_eq!(
            policy.calculate_fee(U256::from(1000u32), false).unwrap(),
            U256::from(2u8)
        );
        assert_eq!(
            policy.calculate_fee(U256::from(1000u32), true).unwrap(),
            U256::from(3u8)
        );

        // Exact division rounds the same both ways.
        assert_eq!(
            policy.calculate_fee(U256::from(400u32), false).unwrap(),
            U256::from(1u8)
        );
        assert_eq!(
            policy.calculate_fee(U256::from(400u32), true).unwrap(),
            U256::from(1u8)
        );
    }

    #[test]
    fn zero_rate_charges_nothing_and_inverts_to_identity() {
        let policy = FeePolicy::new(0, false).unwrap();
        let amount = U256::from(123_456_789u64);
        assert_eq!(policy.calculate_fee(amount, true).unwrap(), U256::ZERO);
        assert_eq!(
            policy.calculate_original_amount(amount, true).unwrap(),
            amount
        );
    }

    #[test]
    fn original_amount_recovers_at_least_the_gross() {
        for rate in [100u32, 2500, 30_000, 100_000] {
            let policy = FeePolicy::new(rate, true).unwrap();
            for amount in [997u64, 10_000, 123_456_789, 10u64.pow(18)] {
                let amount = U256::from(amount);
                let net = amount - policy.calculate_fee(amount, false).unwrap();
                let original = policy.calculate_original_amount(net, true).unwrap();
                assert!(original >= amount, "rate {rate}: {original} < {amount}");
                assert!(
                    original - amount <= U256::from(2u8),
                    "rate {rate}: inverse drifted by more than rounding"
                );
            }
        }
    }
}
