pub mod fee_policy;
pub mod liquidity_math;
pub mod math_helpers;
pub mod order_id;
pub mod tick_math;
