//! Deterministic quoting core for a CLOB exchange SDK, in pure Rust.
//!
//! This crate is the part of the SDK that must reproduce the remote
//! ledger's arithmetic bit for bit before a transaction is submitted:
//! - Tick/price codec and fee math (`math::tick_math`, `math::fee_policy`).
//! - A greedy order-book matching simulator for take/spend quotes
//!   (`book::simulate`).
//! - Two-sided vault mint and rebalance math (`math::liquidity_math`).
//! - The composite order-id codec (`math::order_id`).
//! - An exact-decimal boundary for human price strings (`price`).
//!
//! Everything is a pure function over `alloy-primitives` big integers;
//! no floating point touches a price or an amount, and every division
//! states its rounding direction.
//!
//! # Examples
//!
//! ## Tick/price codec
//! ```
//! use clob_quote_math::math::tick_math::{from_price, to_price};
//! use clob_quote_math::{PRICE_PRECISION, U256};
//!
//! let par = to_price(0).unwrap();
//! assert_eq!(par, PRICE_PRECISION); // 1.0 in Q96
//! assert_eq!(from_price(par).unwrap(), 0);
//! ```
//!
//! ## Quoting a take against a depth snapshot
//! ```
//! use clob_quote_math::book::{simulate_take, DepthLevel};
//! use clob_quote_math::math::fee_policy::FeePolicy;
//! use clob_quote_math::U256;
//!
//! let depth = [DepthLevel { tick: 100, resting_units: 50 }];
//! let fee = FeePolicy::new(0, false).unwrap();
//!
//! // Drain everything down to tick 100.
//! let quote = simulate_take(&depth, 100, U256::MAX, fee, 1_000_000).unwrap();
//! assert_eq!(quote.events.len(), 1);
//! assert_eq!(quote.taken_quote_amount, U256::from(50_000_000u64));
//! ```

pub use alloy_primitives::{I256, U256};

pub mod book;
pub mod error;
pub mod math;
pub mod price;

pub use book::{simulate_spend, simulate_take, DepthLevel, MatchEvent, SimulationResult};
pub use error::Error;
pub use math::fee_policy::{FeePolicy, RATE_PRECISION};
pub use math::liquidity_math::{
    get_expected_mint_result, get_ideal_delta, IdealDelta, MintParams, MintResult,
};
pub use math::order_id::{from_order_id, to_order_id, OrderId};
pub use math::tick_math::{
    from_price, invert_tick, max_price, min_price, to_price, MAX_TICK, MIN_TICK,
};
pub use price::{format_price, parse_price, ParsedPrice};

/// Number of fractional bits in a Q96 price.
pub const PRICE_RESOLUTION: u8 = 96;

/// 1.0 as a Q96 price (`2^96`).
pub const PRICE_PRECISION: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
