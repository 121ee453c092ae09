use crate::error::MathError;
use alloy_primitives::U256;

const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

/// Computes `a * b / denominator` with full 512-bit intermediate
/// precision, flooring the result.
///
/// Every amount/price conversion in the crate goes through this (or one
/// of its rounding variants) so that the rounding direction of each
/// division is explicit at the call site.
pub fn mul_div(a: U256, b: U256, mut denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    // 512-bit product as (prod1, prod0).
    let mm = a.mul_mod(b, U256::MAX);
    let mut prod0 = a.wrapping_mul(b);
    let (mut prod1, borrow) = mm.overflowing_sub(prod0);
    if borrow {
        prod1 = prod1.wrapping_sub(U256::ONE);
    }

    // Short-circuit: the product fits in 256 bits.
    if prod1.is_zero() {
        return Ok(prod0.wrapping_div(denominator));
    }

    if denominator <= prod1 {
        return Err(MathError::Overflow);
    }

    // Make the division exact by subtracting the remainder.
    let remainder = a.mul_mod(b, denominator);
    let (p0, borrow) = prod0.overflowing_sub(remainder);
    prod0 = p0;
    if borrow {
        prod1 = prod1.wrapping_sub(U256::ONE);
    }

    // Factor powers of two out of the denominator.
    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    prod0 = prod0.wrapping_div(twos);
    let twos_shift = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256::ONE);
    prod0 |= prod1.wrapping_mul(twos_shift);

    // Modular inverse of the (now odd) denominator via Newton iteration,
    // doubling the correct bit count each round: 8, 16, 32, 64, 128, 256.
    let mut inv = U256_THREE.wrapping_mul(denominator) ^ U256_TWO;
    for _ in 0..6 {
        inv = inv.wrapping_mul(U256_TWO.wrapping_sub(denominator.wrapping_mul(inv)));
    }

    Ok(prod0.wrapping_mul(inv))
}

/// Like [`mul_div`], but rounds up when the division leaves a remainder.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let mut result = mul_div(a, b, denominator)?;

    if a.mul_mod(b, denominator) > U256::ZERO {
        if result == U256::MAX {
            return Err(MathError::Overflow);
        }
        result += U256::ONE;
    }
    Ok(result)
}

/// Ceiling division. Panics on a zero divisor like primitive integer
/// division, so callers must check `b != 0` themselves.
pub fn div_rounding_up(a: U256, b: U256) -> U256 {
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::ONE
    }
}
