use crate::book::depth::{DepthLevel, MatchEvent, SimulationResult};
use crate::error::{Error, MathError, ParamError};
use crate::math::fee_policy::{FeePolicy, RATE_PRECISION};
use crate::math::math_helpers::{div_rounding_up, mul_div, mul_div_rounding_up};
use crate::math::tick_math::to_price;
use crate::PRICE_PRECISION;
use alloy_primitives::U256;

// Fee-adjusted legs for `units` whole units filled at `price`.
// Quote->base always rounds up, so a quoted cost never understates the
// on-chain one; the fee rounds against the taker on whichever leg it
// applies to.
fn fill_level(
    units: U256,
    unit: U256,
    price: U256,
    fee_policy: &FeePolicy,
) -> Result<(U256, U256), Error> {
    let quote = units * unit;
    let base = mul_div_rounding_up(quote, PRICE_PRECISION, price)?;

    if fee_policy.uses_quote_for_fee() {
        let fee = fee_policy.calculate_fee(quote, true)?;
        Ok((quote - fee, base))
    } else {
        let fee = fee_policy.calculate_fee(base, true)?;
        let base = base.checked_add(fee).ok_or(MathError::Overflow)?;
        Ok((quote, base))
    }
}

fn sorted_best_first(depth: &[DepthLevel]) -> Vec<DepthLevel> {
    let mut levels = depth.to_vec();
    levels.sort_by(|a, b| b.tick.cmp(&a.tick));
    levels
}

/// Replays greedy matching to answer "what does taking `quote_amount_out`
/// of quote cost, down to `limit_tick`?".
///
/// Levels are consumed best price first until the cumulative taken quote
/// reaches the target, the limit is crossed, or depth runs out. Matching
/// advances only in whole units, so the final level may overshoot the
/// target by a sub-unit remainder; a bound of zero units terminates.
/// Pass `U256::MAX` as the target to drain everything down to the limit.
pub fn simulate_take(
    depth: &[DepthLevel],
    limit_tick: i32,
    quote_amount_out: U256,
    fee_policy: FeePolicy,
    unit_size: u64,
) -> Result<SimulationResult, Error> {
    if unit_size == 0 {
        return Err(ParamError::ZeroUnitSize.into());
    }
    let unit = U256::from(unit_size);

    let mut result = SimulationResult::empty();
    for level in sorted_best_first(depth) {
        if level.tick < limit_tick || result.taken_quote_amount >= quote_amount_out {
            break;
        }
        let price = to_price(level.tick)?;

        // Gross quote still needed: when the fee is deducted from the
        // quote leg, the book must surrender more than the target.
        // Saturate so an effectively-infinite target drains the book.
        let remaining = quote_amount_out - result.taken_quote_amount;
        let gross_target = if fee_policy.uses_quote_for_fee() {
            fee_policy
                .calculate_original_amount(remaining, true)
                .unwrap_or(U256::MAX)
        } else {
            remaining
        };

        let units = div_rounding_up(gross_target, unit).min(U256::from(level.resting_units));
        if units.is_zero() {
            break;
        }

        let (quote_leg, base_leg) = fill_level(units, unit, price, &fee_policy)?;
        if quote_leg.is_zero() {
            break;
        }

        result.taken_quote_amount += quote_leg;
        result.spent_base_amount += base_leg;
        result.events.push(MatchEvent {
            tick: level.tick,
            taken_quote_amount: quote_leg,
            spent_base_amount: base_leg,
        });
    }

    Ok(result)
}

/// Replays greedy matching to answer "what does spending `base_amount_in`
/// of base buy, down to `limit_tick`?".
///
/// The unit bound rounds down, so the budget is never exceeded beyond
/// the final level's fee adjustment (and never at all under a zero
/// rate). A remainder too small to cover one whole unit terminates.
pub fn simulate_spend(
    depth: &[DepthLevel],
    limit_tick: i32,
    base_amount_in: U256,
    fee_policy: FeePolicy,
    unit_size: u64,
) -> Result<SimulationResult, Error> {
    if unit_size == 0 {
        return Err(ParamError::ZeroUnitSize.into());
    }
    let unit = U256::from(unit_size);

    let mut result = SimulationResult::empty();
    for level in sorted_best_first(depth) {
        if level.tick < limit_tick || result.spent_base_amount >= base_amount_in {
            break;
        }
        let price = to_price(level.tick)?;

        // When the fee lands on the base leg the budget must cover base
        // plus fee, so only the net-of-fee portion converts into units.
        let remaining = base_amount_in - result.spent_base_amount;
        let usable_base = if fee_policy.uses_quote_for_fee() {
            remaining
        } else {
            mul_div(
                remaining,
                U256::from(RATE_PRECISION),
                U256::from(RATE_PRECISION) + U256::from(fee_policy.rate_ppm()),
            )?
        };

        // Base->quote rounds down; saturate for drain-the-book budgets.
        let quote_capacity =
            mul_div(usable_base, price, PRICE_PRECISION).unwrap_or(U256::MAX);
        let units = (quote_capacity / unit).min(U256::from(level.resting_units));
        if units.is_zero() {
            break;
        }

        let (quote_leg, base_leg) = fill_level(units, unit, price, &fee_policy)?;
        if quote_leg.is_zero() {
            break;
        }

        result.taken_quote_amount += quote_leg;
        result.spent_base_amount += base_leg;
        result.events.push(MatchEvent {
            tick: level.tick,
            taken_quote_amount: quote_leg,
            spent_base_amount: base_leg,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RangeError;

    const UNIT: u64 = 1_000_000;

    fn no_fee() -> FeePolicy {
        FeePolicy::new(0, false).unwrap()
    }

    fn level(tick: i32, resting_units: u64) -> DepthLevel {
        DepthLevel {
            tick,
            resting_units,
        }
    }

    fn assert_conserved(result: &SimulationResult) {
        let quote: U256 = result
            .events
            .iter()
            .fold(U256::ZERO, |acc, e| acc + e.taken_quote_amount);
        let base: U256 = result
            .events
            .iter()
            .fold(U256::ZERO, |acc, e| acc + e.spent_base_amount);
        assert_eq!(quote, result.taken_quote_amount);
        assert_eq!(base, result.spent_base_amount);
    }

    #[test]
    fn empty_depth_is_a_normal_zero_result() {
        let result = simulate_take(&[], 0, U256::from(1u8), no_fee(), UNIT).unwrap();
        assert_eq!(result, SimulationResult::empty());

        let result = simulate_spend(&[], -100, U256::MAX, no_fee(), UNIT).unwrap();
        assert_eq!(result, SimulationResult::empty());
    }

    #[test]
    fn limit_above_best_tick_matches_nothing() {
        let depth = [level(100, 50)];
        let result = simulate_take(&depth, 101, U256::MAX, no_fee(), UNIT).unwrap();
        assert_eq!(result, SimulationResult::empty());
    }

    #[test]
    fn draining_one_level_emits_one_event() {
        let depth = [level(100, 50)];
        let result = simulate_take(&depth, 100, U256::MAX, no_fee(), UNIT).unwrap();

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].tick, 100);
        assert_eq!(
            result.taken_quote_amount,
            U256::from(50u64) * U256::from(UNIT)
        );
        let expected_base = mul_div_rounding_up(
            result.taken_quote_amount,
            PRICE_PRECISION,
            to_price(100).unwrap(),
        )
        .unwrap();
        assert_eq!(result.spent_base_amount, expected_base);
        assert_conserved(&result);
    }

    #[test]
    fn depth_is_sorted_before_matching() {
        // Deliberately shuffled input: best tick must be consumed first.
        let depth = [level(3, 10), level(9, 10), level(6, 10)];
        let result = simulate_take(&depth, 3, U256::MAX, no_fee(), UNIT).unwrap();
        let ticks: Vec<i32> = result.events.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![9, 6, 3]);
        assert_conserved(&result);
    }

    #[test]
    fn take_never_matches_past_the_limit() {
        let depth = [level(10, 5), level(5, 5), level(0, 5)];
        let result = simulate_take(&depth, 5, U256::MAX, no_fee(), UNIT).unwrap();
        assert_eq!(result.events.len(), 2);
        assert!(result.events.iter().all(|e| e.tick >= 5));
    }

    #[test]
    fn take_stops_once_the_target_is_met() {
        let depth = [level(0, 100)];
        // At tick 0 the price is exactly 1.0, so 3 units of quote cost 3
        // units of base. Ask for 2.5 units: whole-unit matching rounds
        // the fill up to 3 units.
        let target = U256::from(5u64) * U256::from(UNIT) / U256::from(2u8);
        let result = simulate_take(&depth, 0, target, no_fee(), UNIT).unwrap();
        assert_eq!(result.taken_quote_amount, U256::from(3u64) * U256::from(UNIT));
        assert_eq!(result.events.len(), 1);
        assert!(result.taken_quote_amount >= target);
    }

    #[test]
    fn take_output_is_monotone_in_the_target() {
        let depth = [level(40, 7), level(20, 9), level(0, 11)];
        let mut previous = U256::ZERO;
        for multiple in 1..40u64 {
            let target = U256::from(multiple) * U256::from(UNIT) / U256::from(3u8);
            let result = simulate_take(&depth, 0, target, no_fee(), UNIT).unwrap();
            assert!(result.taken_quote_amount >= previous);
            assert_conserved(&result);
            previous = result.taken_quote_amount;
        }
    }

    #[test]
    fn take_with_quote_fee_reduces_the_received_leg() {
        // 1% fee on the quote leg: one full unit nets 990_000.
        let fee = FeePolicy::new(10_000, true).unwrap();
        let depth = [level(0, 1)];
        let result = simulate_take(&depth, 0, U256::MAX, fee, UNIT).unwrap();
        assert_eq!(result.taken_quote_amount, U256::from(990_000u64));
        // Base leg is untouched by a quote-side fee.
        assert_eq!(result.spent_base_amount, U256::from(UNIT));
    }

    #[test]
    fn take_with_base_fee_increases_the_paid_leg() {
        let fee = FeePolicy::new(10_000, false).unwrap();
        let depth = [level(0, 1)];
        let result = simulate_take(&depth, 0, U256::MAX, fee, UNIT).unwrap();
        assert_eq!(result.taken_quote_amount, U256::from(UNIT));
        assert_eq!(result.spent_base_amount, U256::from(1_010_000u64));
    }

    #[test]
    fn take_quote_fee_grosses_up_the_target() {
        // Meeting a 990_000 net target under a 1% quote fee requires a
        // full 1_000_000 gross, exactly one unit.
        let fee = FeePolicy::new(10_000, true).unwrap();
        let depth = [level(0, 5)];
        let result =
            simulate_take(&depth, 0, U256::from(990_000u64), fee, UNIT).unwrap();
        assert_eq!(result.taken_quote_amount, U256::from(990_000u64));
        assert_eq!(result.events.len(), 1);
    }

    #[test]
    fn spend_consumes_up_to_the_budget() {
        let depth = [level(0, 10)];
        // At tick 0, 3.7 units of base buy exactly 3 whole units.
        let budget = U256::from(37u64) * U256::from(UNIT) / U256::from(10u8);
        let result = simulate_spend(&depth, 0, budget, no_fee(), UNIT).unwrap();
        assert_eq!(result.taken_quote_amount, U256::from(3u64) * U256::from(UNIT));
        assert!(result.spent_base_amount <= budget);
        assert_conserved(&result);
    }

    #[test]
    fn spend_sub_unit_budget_matches_nothing() {
        let depth = [level(0, 10)];
        let result =
            simulate_spend(&depth, 0, U256::from(UNIT - 1), no_fee(), UNIT).unwrap();
        assert_eq!(result, SimulationResult::empty());
    }

    #[test]
    fn spend_respects_the_limit_tick() {
        let depth = [level(10, 2), level(-10, 2)];
        let result = simulate_spend(&depth, 0, U256::MAX, no_fee(), UNIT).unwrap();
        assert!(result.events.iter().all(|e| e.tick >= 0));
        assert_eq!(result.events.len(), 1);
    }

    #[test]
    fn spend_with_base_fee_stays_near_the_budget() {
        // 1% fee on base: a 2_020_000 budget covers one unit plus its
        // fee twice over at tick 0.
        let fee = FeePolicy::new(10_000, false).unwrap();
        let depth = [level(0, 10)];
        let budget = U256::from(2_020_000u64);
        let result = simulate_spend(&depth, 0, budget, fee, UNIT).unwrap();
        assert_eq!(result.taken_quote_amount, U256::from(2u64) * U256::from(UNIT));
        assert_eq!(result.spent_base_amount, budget);
    }

    #[test]
    fn spend_drains_the_book_with_an_unbounded_budget() {
        let depth = [level(50, 4), level(25, 4)];
        let result = simulate_spend(&depth, 0, U256::MAX, no_fee(), UNIT).unwrap();
        assert_eq!(result.events.len(), 2);
        assert_eq!(
            result.taken_quote_amount,
            U256::from(8u64) * U256::from(UNIT)
        );
        assert_conserved(&result);
    }

    #[test]
    fn zero_unit_size_is_rejected() {
        let depth = [level(0, 1)];
        let result = simulate_take(&depth, 0, U256::MAX, no_fee(), 0);
        assert!(matches!(
            result,
            Err(Error::ParamError(ParamError::ZeroUnitSize))
        ));
    }

    #[test]
    fn out_of_domain_snapshot_tick_is_rejected() {
        let depth = [level(crate::math::tick_math::MAX_TICK + 1, 1)];
        let result = simulate_take(&depth, 0, U256::MAX, no_fee(), UNIT);
        assert!(matches!(
            result,
            Err(Error::RangeError(RangeError::TickOutOfBounds))
        ));
    }
}
