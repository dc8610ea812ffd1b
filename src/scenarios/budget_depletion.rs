//! A budget-balanced bidder with a small budget replays a whole simulation against two
//! competitors who always bid 6.0 and 3.0 on clicks [100, 50].
//!
//! Occupancy is scripted from those fixed bids: the agent holds slot 0 at 6.0 per click while
//! it bids at least 6.0, slot 1 at 3.0 while it bids at least 3.0, and nothing otherwise.
//! Its balanced bid for slot 1 (6.5) keeps it in slot 0, so it pays for slot 0 every round
//! and overdraws. The checks are that the budget only ever moves by what was paid, that the
//! unsustainable top slot is not targeted while there is budget left, and that the overdraft
//! shows up as a negative budget rather than as an error. Once overdrawn, every scaled utility
//! turns negative and the top slot, discounted least, is targeted again.

use crate::agent::BudgetBalancedBidder;
use crate::config::SimulationConfig;
use crate::history::{AgentId, History, Round};
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::scenarios::Checks;

inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "budget_depletion",
    run,
});

const AGENT_ID: AgentId = 0;
const VALUE: f64 = 10.0;
const INITIAL_BUDGET: f64 = 63.0;
const COMPETITOR_BIDS: [(AgentId, f64); 2] = [(1, 6.0), (2, 3.0)];
const CLICKS: [f64; 2] = [100.0, 50.0];

/// Round in which the agent bid `agent_bid` against the fixed competitor bids
fn scripted_round(agent_bid: f64) -> Round {
    let mut bids = vec![(AGENT_ID, agent_bid)];
    bids.extend_from_slice(&COMPETITOR_BIDS);

    let (occupants, slot_payments) = if agent_bid >= 6.0 {
        (vec![AGENT_ID, 1, 2], vec![6.0, 3.0])
    } else if agent_bid >= 3.0 {
        (vec![1, AGENT_ID], vec![6.0, 3.0])
    } else {
        (vec![1, 2], vec![3.0, 0.0])
    };
    // Two slots on offer, so the third bidder does not place
    let occupants: Vec<AgentId> = occupants.into_iter().take(CLICKS.len()).collect();
    let slot_payments: Vec<f64> = slot_payments.into_iter().take(CLICKS.len()).collect();

    Round::new(bids, CLICKS.to_vec(), occupants, slot_payments)
}

pub fn run(scenario_name: &str, config: &SimulationConfig, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let mut agent = BudgetBalancedBidder::new(AGENT_ID, VALUE, INITIAL_BUDGET, config.clone());
    let mut history = History::new();
    let mut checks = Checks::new();

    logln!(logger, LogEvent::Scenario, "\n=== {} over {} rounds ===", agent, agent.config().total_rounds);

    let mut bid = agent.initial_bid(0.0);
    let mut budgets = vec![agent.budget()];
    let mut exact_charges = true;
    let mut top_slot_targeted = false;
    let mut max_bid = bid;

    for t in 1..config.total_rounds {
        let round = scripted_round(bid);
        let paid = round.payment_for(AGENT_ID).unwrap_or(0.0);
        history.push(round);

        let budget_before = agent.budget();
        bid = agent.bid(t, &history, 0.0, logger)?;
        exact_charges &= agent.budget() == budget_before - paid;
        if agent.budget() > 0.0 {
            top_slot_targeted |= agent.target_slot(t, &history, 0.0)?.slot == 0;
        }
        max_bid = max_bid.max(bid);
        budgets.push(agent.budget());

        logln!(logger, LogEvent::Agent, "round {:>2}: paid {:.2}, budget {:>8.2}, next bid {:.4}", t, paid, agent.budget(), bid);
    }

    let monotonic = budgets.windows(2).all(|w| w[1] <= w[0]);
    let final_budget = agent.budget();

    checks.check(monotonic,
        format!("Budget never increases: {:.2} -> {:.2}", INITIAL_BUDGET, final_budget), logger);
    checks.check(exact_charges,
        "Budget drops by exactly the per-click price paid in the previous round".to_string(), logger);
    checks.check(!top_slot_targeted,
        "Unsustainable top slot is not targeted while budget remains".to_string(), logger);
    checks.check(max_bid <= VALUE,
        format!("Bids never exceed value: {:.4} <= {:.4}", max_bid, VALUE), logger);
    if config.total_rounds > 12 {
        checks.check(final_budget < 0.0,
            format!("Overdraft is reported as a negative budget: {:.2}", final_budget), logger);
    }

    checks.finish(scenario_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_occupancy() {
        assert_eq!(scripted_round(6.5).occupied_slot(AGENT_ID), Some(0));
        assert_eq!(scripted_round(6.5).payment_for(AGENT_ID), Some(6.0));
        assert_eq!(scripted_round(4.0).payment_for(AGENT_ID), Some(3.0));
        assert_eq!(scripted_round(1.0).occupied_slot(AGENT_ID), None);
    }

    #[test]
    fn test_short_horizon_passes() {
        let mut logger = Logger::new();
        let config = SimulationConfig::new(6).unwrap();
        assert!(run("budget_depletion", &config, &mut logger).is_ok());
    }
}
