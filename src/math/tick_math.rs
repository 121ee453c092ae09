use crate::error::{Error, RangeError};
use alloy_primitives::{I256, U256};

/// Widest tick the price ladder supports; `|tick| <= MAX_TICK` keeps the
/// Q96 price inside 256 bits on both ends of the ladder.
pub const MAX_TICK: i32 = 524287;
pub const MIN_TICK: i32 = -MAX_TICK;

// Q128 multipliers for 1.0001^(-2^i), i = 0..=18, covering every bit of
// |tick| up to MAX_TICK. Positive ticks are produced by inverting the
// assembled negative-tick ratio.
const MULTIPLIERS: [U256; 19] = [
    U256::from_limbs([6459403834229662010, 18444899583751176498, 0, 0]),
    U256::from_limbs([17226890335427755468, 18443055278223354162, 0, 0]),
    U256::from_limbs([2032852871939366096, 18439367220385604838, 0, 0]),
    U256::from_limbs([14545316742740207172, 18431993317065449817, 0, 0]),
    U256::from_limbs([5129152022828963008, 18417254355718160513, 0, 0]),
    U256::from_limbs([4894419605888772193, 18387811781193591352, 0, 0]),
    U256::from_limbs([1280255884321894483, 18329067761203520168, 0, 0]),
    U256::from_limbs([15924666964335305636, 18212142134806087854, 0, 0]),
    U256::from_limbs([8010504389359918676, 17980523815641551639, 0, 0]),
    U256::from_limbs([10668036004952895731, 17526086738831147013, 0, 0]),
    U256::from_limbs([4878133418470705625, 16651378430235024244, 0, 0]),
    U256::from_limbs([9537173718739605541, 15030750278693429944, 0, 0]),
    U256::from_limbs([9972618978014552549, 12247334978882834399, 0, 0]),
    U256::from_limbs([10428997489610666743, 8131365268884726200, 0, 0]),
    U256::from_limbs([9305304367709015974, 3584323654723342297, 0, 0]),
    U256::from_limbs([14301143598189091785, 696457651847595233, 0, 0]),
    U256::from_limbs([7393154844743099908, 26294789957452057, 0, 0]),
    U256::from_limbs([2209338891292245656, 37481735321082, 0, 0]),
    U256::from_limbs([10518117631919034274, 76158723, 0, 0]),
];

// 1.0 in Q128.
const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);

// 1 / log2(1.0001) in Q64, used to turn a binary log into a tick count.
const INV_LOG2_BASE: I256 =
    I256::from_raw(U256::from_limbs([15096324921010923074, 6931, 0, 0]));

fn in_tick_domain(tick: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

// Assumes the tick is in domain; public entry points validate first.
fn price_unchecked(tick: i32) -> U256 {
    let abs_tick = tick.unsigned_abs();

    let mut ratio = Q128;
    for (i, multiplier) in MULTIPLIERS.iter().enumerate() {
        if abs_tick & (1 << i) != 0 {
            ratio = ratio.wrapping_mul(*multiplier) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128 -> Q96, rounding up so truncation never understates a price.
    let truncated = (ratio.as_limbs()[0] & 0xFFFF_FFFF) != 0;
    (ratio >> 32) + U256::from(truncated as u64)
}

/// Returns the Q96 fixed-point price at a tick (`1.0001^tick << 96`), or
/// `RangeError::TickOutOfBounds` outside `[MIN_TICK, MAX_TICK]`.
///
/// Strictly increasing over the whole domain: distinct ticks always map
/// to distinct prices.
pub fn to_price(tick: i32) -> Result<U256, Error> {
    if !in_tick_domain(tick) {
        return Err(RangeError::TickOutOfBounds.into());
    }
    Ok(price_unchecked(tick))
}

/// Smallest representable Q96 price, `to_price(MIN_TICK)`.
pub fn min_price() -> U256 {
    price_unchecked(MIN_TICK)
}

/// Largest representable Q96 price, `to_price(MAX_TICK)`.
pub fn max_price() -> U256 {
    price_unchecked(MAX_TICK)
}

/// Returns the floor tick for a Q96 price: the greatest `tick` with
/// `to_price(tick) <= price`. Prices outside `[min_price(), max_price()]`
/// are `RangeError::PriceOutOfBounds`.
pub fn from_price(price: U256) -> Result<i32, Error> {
    if price < min_price() || price > max_price() {
        return Err(RangeError::PriceOutOfBounds.into());
    }

    // log2 of the Q128 ratio: integer part from the msb, then 14 bits of
    // fraction by repeated squaring.
    let ratio = price << 32usize;
    let msb: u32 = 255 - ratio.leading_zeros() as u32;

    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    let mut log_2: I256 =
        (I256::from_raw(U256::from(msb)) - I256::from_raw(U256::from(128u8))) << 64usize;

    for shift in (50usize..=63).rev() {
        r = r.overflowing_mul(r).0 >> 127;
        let f = r >> 128usize;
        log_2 |= I256::from_raw(f << shift);
        if !f.is_zero() {
            r >>= 1;
        }
    }

    // Q64 log2 * Q64 ticks-per-log2 = Q128 tick estimate, floored. The
    // estimate is within one tick of the answer; settle it exactly
    // against the forward ladder.
    let mut tick = (log_2.wrapping_mul(INV_LOG2_BASE) >> 128usize).low_i32();

    tick = tick.clamp(MIN_TICK, MAX_TICK);
    while tick < MAX_TICK && price_unchecked(tick + 1) <= price {
        tick += 1;
    }
    while tick > MIN_TICK && price_unchecked(tick) > price {
        tick -= 1;
    }

    Ok(tick)
}

/// Mirrors a tick across 1.0: expressing an ask book in the bid book's
/// price domain queries it at `invert_tick(tick)`.
pub fn invert_tick(tick: i32) -> Result<i32, Error> {
    if !in_tick_domain(tick) {
        return Err(RangeError::TickOutOfBounds.into());
    }
    Ok(-tick)
}
