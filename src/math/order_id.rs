use crate::error::{Error, RangeError};
use alloy_primitives::U256;

const INDEX_BITS: usize = 40;
const TICK_BITS: usize = 24;
const BOOK_SHIFT: usize = INDEX_BITS + TICK_BITS;

const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;
const TICK_MASK: u64 = (1 << TICK_BITS) - 1;

/// Widest signed tick an order id can carry. The price-ladder domain is
/// narrower; the id codec covers the full 24-bit field.
pub const ORDER_TICK_MIN: i32 = -(1 << (TICK_BITS - 1));
pub const ORDER_TICK_MAX: i32 = (1 << (TICK_BITS - 1)) - 1;

/// The unpacked form of a composite order identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OrderId {
    pub book_id: U256,
    pub tick: i32,
    pub index: u64,
}

/// Packs `(book_id, tick, index)` into one 256-bit id: the 40-bit
/// sequence index in the low bits, the tick as 24-bit two's complement
/// above it, and the 192-bit book id in the high bits.
pub fn to_order_id(book_id: U256, tick: i32, index: u64) -> Result<U256, Error> {
    if book_id >> 192 != U256::ZERO {
        return Err(RangeError::BookIdOutOfBounds.into());
    }
    if !(ORDER_TICK_MIN..=ORDER_TICK_MAX).contains(&tick) {
        return Err(RangeError::TickOutOfBounds.into());
    }
    if index & !INDEX_MASK != 0 {
        return Err(RangeError::OrderIndexOutOfBounds.into());
    }

    let tick_field = (tick as u32 as u64) & TICK_MASK;
    let low = (tick_field << INDEX_BITS) | index;
    Ok((book_id << BOOK_SHIFT) | U256::from(low))
}

/// Inverse of [`to_order_id`], sign-extending the tick field.
pub fn from_order_id(id: U256) -> OrderId {
    let low: u64 = id.as_limbs()[0];
    let index = low & INDEX_MASK;
    let tick_field = (low >> INDEX_BITS) & TICK_MASK;

    let tick = if tick_field & (1 << (TICK_BITS - 1)) != 0 {
        (tick_field as i64 - (1 << TICK_BITS)) as i32
    } else {
        tick_field as i32
    };

    OrderId {
        book_id: id >> BOOK_SHIFT,
        tick,
        index,
    }
}
