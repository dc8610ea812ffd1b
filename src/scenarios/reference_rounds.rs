//! Two hand-worked rounds on a two slot auction with clicks [100, 50], where the other
//! agents bid 6.0 and 3.0 and the reserve is 0.
//!
//! - Variant A: budget 1000 in the last round of a 48 round simulation. Either slot is
//!   affordable for the one round left, so the top slot wins (400 vs 350) and the bid is value.
//!
//! - Variant B: budget 50 in round 40. Neither slot is sustainable for 8 rounds; slot 1 keeps
//!   more of its utility (14.58 vs 4.17), and the balanced bid for it is 6.5.

use crate::agent::BudgetBalancedBidder;
use crate::config::SimulationConfig;
use crate::history::{History, Round};
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::scenarios::Checks;

inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "reference_rounds",
    run,
});

const VALUE: f64 = 10.0;
const EPSILON: f64 = 1e-9;

/// History of `rounds` identical rounds in which agent 0 bid too low to win anything
fn prepare_history(rounds: usize) -> History {
    let mut history = History::new();
    for _ in 0..rounds {
        history.push(Round::new(
            vec![(0, 2.0), (1, 6.0), (2, 3.0)],
            vec![100.0, 50.0],
            vec![1, 2],
            vec![3.0, 2.0],
        ));
    }
    history
}

// The worked numbers assume the 48 round horizon, so the configured one is not used here
pub fn run(scenario_name: &str, _config: &SimulationConfig, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let config = SimulationConfig::default();
    let mut checks = Checks::new();

    logln!(logger, LogEvent::Scenario, "\n=== Variant A: budget 1000, round 47 ===");
    let t = config.total_rounds - 1;
    let history = prepare_history(t);
    let mut agent = BudgetBalancedBidder::new(0, VALUE, 1000.0, config.clone());
    logln!(logger, LogEvent::Scenario, "{}", agent);

    let utils = agent.expected_utils(t, &history, 0.0)?;
    let target = agent.target_slot(t, &history, 0.0)?;
    let bid = agent.bid(t, &history, 0.0, logger)?;
    checks.check(utils == vec![400.0, 350.0],
        format!("Variant A utilities are unscaled: {:.2?} == [400.00, 350.00]", utils), logger);
    checks.check(target.slot == 0 && target.max_bid == 2.0 * target.min_bid,
        format!("Variant A targets slot 0 with max bid twice the min bid: slot {} [{:.2}, {:.2}]", target.slot, target.min_bid, target.max_bid), logger);
    checks.check(bid == VALUE,
        format!("Variant A bids value: {:.4} == {:.4}", bid, VALUE), logger);

    logln!(logger, LogEvent::Scenario, "\n=== Variant B: budget 50, round 40 ===");
    let t = 40;
    let history = prepare_history(t);
    let mut agent = BudgetBalancedBidder::new(0, VALUE, 50.0, config);

    let utils = agent.expected_utils(t, &history, 0.0)?;
    let target = agent.target_slot(t, &history, 0.0)?;
    let bid = agent.bid(t, &history, 0.0, logger)?;
    let expected_utils = [400.0 * 50.0 / 4800.0, 350.0 * 50.0 / 1200.0];
    checks.check(utils.iter().zip(expected_utils.iter()).all(|(a, b)| (a - b).abs() < EPSILON),
        format!("Variant B utilities are scaled by budget: {:.4?} == {:.4?}", utils, expected_utils), logger);
    checks.check(target.slot == 1,
        format!("Variant B targets slot 1: slot {}", target.slot), logger);
    checks.check((bid - 6.5).abs() < EPSILON,
        format!("Variant B bids the balanced bid: {:.4} == 6.5000", bid), logger);

    checks.finish(scenario_name)
}
