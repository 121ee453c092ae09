use crate::error::{Error, MathError, ParamError};
use crate::math::math_helpers::mul_div;
use alloy_primitives::{I256, U256};

/// Inputs to a two-sided vault deposit quote.
///
/// `decimals_a`/`decimals_b` only matter for the very first deposit,
/// where the two legs are compared on an 18-decimal common basis.
#[derive(Copy, Clone, Debug)]
pub struct MintParams {
    pub total_supply: U256,
    pub liquidity_a: U256,
    pub liquidity_b: U256,
    pub amount_a: U256,
    pub amount_b: U256,
    pub decimals_a: u8,
    pub decimals_b: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MintResult {
    pub mint_amount: U256,
    pub in_amount_a: U256,
    pub in_amount_b: U256,
}

impl MintResult {
    const ZERO: MintResult = MintResult {
        mint_amount: U256::ZERO,
        in_amount_a: U256::ZERO,
        in_amount_b: U256::ZERO,
    };
}

/// Signed rebalance amounts. A positive delta means the deposit is short
/// that asset and should acquire it; a negative delta means surplus to
/// sell. At most one side of the pair is negative.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdealDelta {
    pub delta_a: I256,
    pub delta_b: I256,
}

fn scale_to_wad(amount: U256, decimals: u8) -> Result<U256, Error> {
    let ten = U256::from(10u8);
    if decimals <= 18 {
        let factor = ten.pow(U256::from(18 - decimals));
        amount
            .checked_mul(factor)
            .ok_or_else(|| MathError::Overflow.into())
    } else {
        Ok(amount / ten.pow(U256::from(decimals - 18)))
    }
}

fn to_signed(magnitude: U256) -> Result<I256, Error> {
    if magnitude > I256::MAX.into_raw() {
        return Err(MathError::Overflow.into());
    }
    Ok(I256::from_raw(magnitude))
}

/// Quotes the LP shares minted for a deposit and the amounts actually
/// consumed.
///
/// Bootstrap (`total_supply == 0`) mints the larger of the two legs
/// scaled to 18 decimals and consumes both amounts in full; there is no
/// existing ratio to preserve, and the remote ledger's policy is the
/// larger leg, not a symmetric mean. Later deposits mint against the
/// binding (smaller) side and recompute the other leg's consumption from
/// the minted share count, so `in_amount_x <= amount_x` always holds and
/// the pool ratio is preserved exactly.
pub fn get_expected_mint_result(params: MintParams) -> Result<MintResult, Error> {
    let MintParams {
        total_supply,
        liquidity_a,
        liquidity_b,
        amount_a,
        amount_b,
        decimals_a,
        decimals_b,
    } = params;

    if total_supply.is_zero() {
        if amount_a.is_zero() || amount_b.is_zero() {
            return Ok(MintResult::ZERO);
        }
        let scaled_a = scale_to_wad(amount_a, decimals_a)?;
        let scaled_b = scale_to_wad(amount_b, decimals_b)?;
        return Ok(MintResult {
            mint_amount: scaled_a.max(scaled_b),
            in_amount_a: amount_a,
            in_amount_b: amount_b,
        });
    }

    let mut mint_amount: Option<U256> = None;
    if !liquidity_a.is_zero() {
        mint_amount = Some(mul_div(amount_a, total_supply, liquidity_a)?);
    }
    if !liquidity_b.is_zero() {
        let candidate = mul_div(amount_b, total_supply, liquidity_b)?;
        mint_amount = Some(match mint_amount {
            Some(current) => current.min(candidate),
            None => candidate,
        });
    }

    // Supply outstanding but both reserves empty: nothing to price
    // a deposit against.
    let Some(mint_amount) = mint_amount else {
        return Ok(MintResult::ZERO);
    };

    let in_amount_a = if liquidity_a.is_zero() {
        U256::ZERO
    } else {
        mul_div(liquidity_a, mint_amount, total_supply)?
    };
    let in_amount_b = if liquidity_b.is_zero() {
        U256::ZERO
    } else {
        mul_div(liquidity_b, mint_amount, total_supply)?
    };

    Ok(MintResult {
        mint_amount,
        in_amount_a,
        in_amount_b,
    })
}

/// Solves for the single-asset swap that leaves the remaining deposit
/// exactly proportional to the pool, with `swap_amount_a/swap_amount_b`
/// as the reference exchange rate:
///
/// `delta = (liquidity_a*amount_b - liquidity_b*amount_a) * swap_leg
///            / (swap_amount_a*liquidity_b + swap_amount_b*liquidity_a)`
pub fn get_ideal_delta(
    amount_a: U256,
    amount_b: U256,
    liquidity_a: U256,
    liquidity_b: U256,
    swap_amount_a: U256,
    swap_amount_b: U256,
) -> Result<IdealDelta, Error> {
    if swap_amount_a.is_zero() || swap_amount_b.is_zero() {
        return Err(ParamError::ZeroReferenceSwapAmount.into());
    }
    if liquidity_a.is_zero() && liquidity_b.is_zero() {
        return Ok(IdealDelta {
            delta_a: I256::ZERO,
            delta_b: I256::ZERO,
        });
    }

    let lhs = liquidity_a
        .checked_mul(amount_b)
        .ok_or(MathError::Overflow)?;
    let rhs = liquidity_b
        .checked_mul(amount_a)
        .ok_or(MathError::Overflow)?;
    let denominator = swap_amount_a
        .checked_mul(liquidity_b)
        .and_then(|left| left.checked_add(swap_amount_b.checked_mul(liquidity_a)?))
        .ok_or(MathError::Overflow)?;

    let surplus_in_b = lhs >= rhs;
    let imbalance = if surplus_in_b { lhs - rhs } else { rhs - lhs };
    if imbalance.is_zero() {
        return Ok(IdealDelta {
            delta_a: I256::ZERO,
            delta_b: I256::ZERO,
        });
    }

    let magnitude_a = to_signed(mul_div(imbalance, swap_amount_a, denominator)?)?;
    let magnitude_b = to_signed(mul_div(imbalance, swap_amount_b, denominator)?)?;

    Ok(if surplus_in_b {
        IdealDelta {
            delta_a: magnitude_a,
            delta_b: -magnitude_b,
        }
    } else {
        IdealDelta {
            delta_a: -magnitude_a,
            delta_b: magnitude_b,
        }
    })
}
