//! Slot pricing and utility projection for budget-aware balanced bidding.
//!
//! Everything here is derived from the previous round only. A quote says what it would cost to
//! tie for a slot if every competitor bids exactly what it bid last round, and the projected
//! utility says what holding that slot for the rest of the simulation would be worth given
//! the remaining budget.

use crate::errors::BidError;
use crate::gsp::SlotPricingOracle;
use crate::history::{AgentId, AuctionHistory, Round};

/// Price window for one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotQuote {
    pub slot: usize,
    /// Bid that ties the competitor holding this slot last round
    pub min_bid: f64,
    /// Bid that ties the competitor one slot up; twice `min_bid` for the top slot
    pub max_bid: f64,
}

/// What an agent brings to the utility projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    /// Per-click value
    pub value: f64,
    /// Budget left at the time of projecting
    pub budget: f64,
    /// Rounds still to be played, counting the current one
    pub remaining_rounds: usize,
}

/// Look up the round preceding `t`
pub fn previous_round(history: &dyn AuctionHistory, t: usize) -> Result<&Round, BidError> {
    if t == 0 {
        return Err(BidError::NoPreviousRound { round: t });
    }
    history.round(t - 1).ok_or(BidError::NoPreviousRound { round: t })
}

/// Quote every slot of the previous round against the other agents' bids from that round
pub fn slot_info(agent_id: AgentId, t: usize, history: &dyn AuctionHistory, reserve: f64, oracle: &dyn SlotPricingOracle) -> Result<Vec<SlotQuote>, BidError> {
    let prev_round = previous_round(history, t)?;
    Ok(quote_round(agent_id, prev_round, reserve, oracle))
}

/// Quote every slot of `round` for `agent_id`, its own bid excluded
pub fn quote_round(agent_id: AgentId, round: &Round, reserve: f64, oracle: &dyn SlotPricingOracle) -> Vec<SlotQuote> {
    let other_bids = round.other_bids(agent_id);
    (0..round.num_slots())
        .map(|slot| {
            let range = oracle.bid_range_for_slot(slot, &round.clicks, reserve, &other_bids);
            SlotQuote {
                slot,
                min_bid: range.min_bid,
                max_bid: range.max_bid.unwrap_or(2.0 * range.min_bid),
            }
        })
        .collect()
}

/// Projected utility of targeting each slot, aligned with `quotes`.
///
/// Winning slot s at its tying price is worth `clicks[s] * (value - min_bid)`. If holding the
/// slot at that price for all remaining rounds would cost more than the budget, the utility is
/// scaled down by `budget / cost`.
pub fn expected_utils(quotes: &[SlotQuote], clicks: &[f64], input: &ProjectionInput) -> Vec<f64> {
    quotes
        .iter()
        .zip(clicks.iter())
        .map(|(quote, &slot_clicks)| {
            let util = slot_clicks * (input.value - quote.min_bid);
            util * sustainability_factor(quote.min_bid, slot_clicks, input)
        })
        .collect()
}

/// Share of the sustained cost of a slot the budget covers, capped at 1.0.
/// A slot quoted at zero, or one with no clicks, costs nothing to hold.
pub fn sustainability_factor(min_bid: f64, slot_clicks: f64, input: &ProjectionInput) -> f64 {
    let sustained_cost = min_bid * slot_clicks * input.remaining_rounds as f64;
    if min_bid != 0.0 && sustained_cost != 0.0 && input.budget < sustained_cost {
        input.budget / sustained_cost
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gsp::GspPricing;
    use crate::history::History;

    const EPSILON: f64 = 1e-9;

    fn two_slot_history() -> History {
        let mut history = History::new();
        // Agent 0 bid 7.0, competitors 6.0 and 3.0
        history.push(Round::new(
            vec![(0, 7.0), (1, 6.0), (2, 3.0)],
            vec![100.0, 50.0],
            vec![0, 1],
            vec![6.0, 3.0],
        ));
        history
    }

    #[test]
    fn test_slot_info_quotes_every_slot() {
        let history = two_slot_history();
        let quotes = slot_info(0, 1, &history, 0.0, &GspPricing).unwrap();
        assert_eq!(quotes, vec![
            SlotQuote { slot: 0, min_bid: 6.0, max_bid: 12.0 },
            SlotQuote { slot: 1, min_bid: 3.0, max_bid: 6.0 },
        ]);
        for quote in &quotes {
            assert!(quote.max_bid >= quote.min_bid);
        }
    }

    #[test]
    fn test_slot_info_ignores_own_bid() {
        let history = two_slot_history();
        // From agent 1's point of view the competitors are 7.0 and 3.0
        let quotes = slot_info(1, 1, &history, 0.0, &GspPricing).unwrap();
        assert_eq!(quotes[0].min_bid, 7.0);
        assert_eq!(quotes[1].min_bid, 3.0);
        assert_eq!(quotes[1].max_bid, 7.0);
    }

    #[test]
    fn test_slot_info_without_previous_round() {
        let history = History::new();
        assert_eq!(slot_info(0, 0, &history, 0.0, &GspPricing), Err(BidError::NoPreviousRound { round: 0 }));
        assert_eq!(slot_info(0, 3, &history, 0.0, &GspPricing), Err(BidError::NoPreviousRound { round: 3 }));
    }

    #[test]
    fn test_expected_utils_unscaled() {
        let quotes = [
            SlotQuote { slot: 0, min_bid: 6.0, max_bid: 12.0 },
            SlotQuote { slot: 1, min_bid: 3.0, max_bid: 6.0 },
        ];
        let input = ProjectionInput { value: 10.0, budget: 1000.0, remaining_rounds: 1 };
        let utils = expected_utils(&quotes, &[100.0, 50.0], &input);
        assert_eq!(utils, vec![400.0, 350.0]);
    }

    #[test]
    fn test_expected_utils_scaled_by_budget() {
        let quotes = [
            SlotQuote { slot: 0, min_bid: 6.0, max_bid: 12.0 },
            SlotQuote { slot: 1, min_bid: 3.0, max_bid: 6.0 },
        ];
        let input = ProjectionInput { value: 10.0, budget: 50.0, remaining_rounds: 8 };
        let utils = expected_utils(&quotes, &[100.0, 50.0], &input);
        assert!((utils[0] - 400.0 * 50.0 / 4800.0).abs() < EPSILON);
        assert!((utils[1] - 350.0 * 50.0 / 1200.0).abs() < EPSILON);
        assert!(utils[1] > utils[0]);
    }

    #[test]
    fn test_scaling_boundary() {
        // Budget exactly covering the sustained cost is not scaled
        let input = ProjectionInput { value: 10.0, budget: 4800.0, remaining_rounds: 8 };
        assert_eq!(sustainability_factor(6.0, 100.0, &input), 1.0);
        let input = ProjectionInput { budget: 4799.0, ..input };
        assert!(sustainability_factor(6.0, 100.0, &input) < 1.0);
    }

    #[test]
    fn test_zero_min_bid_never_scaled() {
        let input = ProjectionInput { value: 10.0, budget: 0.0, remaining_rounds: 20 };
        assert_eq!(sustainability_factor(0.0, 100.0, &input), 1.0);
    }

    #[test]
    fn test_negative_budget_gives_negative_utility() {
        let quotes = [SlotQuote { slot: 0, min_bid: 2.0, max_bid: 4.0 }];
        let input = ProjectionInput { value: 10.0, budget: -10.0, remaining_rounds: 5 };
        let utils = expected_utils(&quotes, &[10.0], &input);
        // 80 * (-10 / 100)
        assert!((utils[0] + 8.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_click_slot_stays_finite() {
        let quotes = [SlotQuote { slot: 0, min_bid: 2.0, max_bid: 4.0 }];
        let input = ProjectionInput { value: 10.0, budget: -10.0, remaining_rounds: 5 };
        let utils = expected_utils(&quotes, &[0.0], &input);
        assert_eq!(utils, vec![0.0]);
    }
}
