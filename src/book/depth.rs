use alloy_primitives::U256;

/// Resting liquidity at one price level, in whole multiples of the
/// book's unit size. Snapshots arrive in arbitrary order from the
/// ledger-query side; the simulator sorts its own copy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthLevel {
    pub tick: i32,
    pub resting_units: u64,
}

/// One consumed price level, best price first in a result's event list.
/// Amounts are post-fee: exactly what the taker receives and pays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchEvent {
    pub tick: i32,
    pub taken_quote_amount: U256,
    pub spent_base_amount: U256,
}

/// Totals plus the per-level trace of a simulated take or spend.
///
/// Zero totals with no events is a normal terminal state (empty book,
/// limit immediately exceeded, or a sub-unit remainder), never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationResult {
    pub taken_quote_amount: U256,
    pub spent_base_amount: U256,
    pub events: Vec<MatchEvent>,
}

impl SimulationResult {
    pub(crate) fn empty() -> Self {
        Self {
            taken_quote_amount: U256::ZERO,
            spent_base_amount: U256::ZERO,
            events: Vec::new(),
        }
    }
}
