use crate::error::{Error, ParamError};
use crate::math::tick_math::{from_price, max_price, min_price, to_price};
use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::{pow, Zero};
use std::str::FromStr;

/// The two ticks bracketing a parsed human price. Equal when the raw
/// price lands exactly on the ladder; otherwise one apart, letting the
/// caller pick the conservative side for the order it is building.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParsedPrice {
    pub rounding_down_tick: i32,
    pub rounding_up_tick: i32,
}

fn u256_to_bigint(value: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

fn bigint_to_u256(value: &BigInt) -> U256 {
    let (_, bytes) = value.to_bytes_be();
    U256::from_be_slice(&bytes)
}

/// Parses a human-decimal price (quote per base, e.g. `"3500.25"`) into
/// its bracketing ticks.
///
/// The decimal is scaled into raw Q96 units, adjusting for the decimal
/// places of the two currencies, with exact integer arithmetic end to
/// end. Out-of-range magnitudes (including zero and negative inputs)
/// clamp to the price domain rather than erroring; only an unparseable
/// string is rejected.
pub fn parse_price(
    human_price: &str,
    quote_decimals: u8,
    base_decimals: u8,
) -> Result<ParsedPrice, Error> {
    let decimal = BigDecimal::from_str(human_price.trim())
        .map_err(|_| ParamError::InvalidPriceString(human_price.to_string()))?;
    let (mantissa, scale) = decimal.into_bigint_and_exponent();

    // raw = mantissa * 2^96 * 10^(quote_decimals - base_decimals - scale),
    // floored. Negative mantissas fall through the MIN_PRICE clamp below.
    let raw = if mantissa.sign() == Sign::Minus || mantissa.is_zero() {
        BigInt::zero()
    } else {
        let shifted: BigInt = mantissa << 96u32;
        let exponent = quote_decimals as i64 - base_decimals as i64 - scale;
        if exponent >= 0 {
            shifted * pow(BigInt::from(10), exponent as usize)
        } else {
            shifted / pow(BigInt::from(10), (-exponent) as usize)
        }
    };

    let raw = raw
        .max(u256_to_bigint(min_price()))
        .min(u256_to_bigint(max_price()));
    let raw = bigint_to_u256(&raw);

    let rounding_down_tick = from_price(raw)?;
    let rounding_up_tick = if to_price(rounding_down_tick)? == raw {
        rounding_down_tick
    } else {
        rounding_down_tick + 1
    };

    Ok(ParsedPrice {
        rounding_down_tick,
        rounding_up_tick,
    })
}

/// Renders a tick's price back into exact human decimals (quote per
/// base). Division by 2^96 terminates in decimal, so the result is
/// exact, not an approximation.
pub fn format_price(
    tick: i32,
    quote_decimals: u8,
    base_decimals: u8,
) -> Result<BigDecimal, Error> {
    let price = to_price(tick)?;

    // price / 2^96 == price * 5^96 / 10^96, an exact decimal; the
    // currency-decimals difference just shifts the exponent.
    let mantissa = u256_to_bigint(price) * pow(BigInt::from(5), 96);
    let scale = 96 + quote_decimals as i64 - base_decimals as i64;
    Ok(BigDecimal::new(mantissa, scale).normalized())
}
