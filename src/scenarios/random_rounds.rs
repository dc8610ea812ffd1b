//! Seeded random rounds: a budget-balanced bidder faces a fresh random auction every round
//! (slot count, click volumes, competitor bids, its own occupancy and payment) and every
//! decision it makes is checked against the properties balanced bidding must hold whatever
//! the market looks like.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::Distribution;

use crate::agent::BudgetBalancedBidder;
use crate::config::SimulationConfig;
use crate::history::{AgentId, History, Round};
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::scenarios::Checks;
use crate::utils::{argmax_index, get_seed, lognormal_dist};

inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "random_rounds",
    run,
});

const AGENT_ID: AgentId = 0;
const EPSILON: f64 = 1e-9;

/// Random round in which the agent submitted `agent_bid`
fn random_round(rng: &mut StdRng, agent_bid: f64) -> Round {
    let num_slots = rng.gen_range(1..=4);
    let top_clicks_dist = lognormal_dist(100.0, 30.0);
    let mut clicks = vec![top_clicks_dist.sample(rng)];
    for _ in 1..num_slots {
        let next = clicks[clicks.len() - 1] * rng.gen_range(0.3..1.0);
        clicks.push(next);
    }

    let bid_dist = lognormal_dist(5.0, 2.0);
    let num_competitors: usize = rng.gen_range(1..=5);
    let mut bids = vec![(AGENT_ID, agent_bid)];
    for id in 1..=num_competitors {
        bids.push((id, bid_dist.sample(rng)));
    }

    let mut occupants: Vec<AgentId> = bids.iter().map(|&(id, _)| id).collect();
    occupants.shuffle(rng);
    occupants.truncate(num_slots);
    let slot_payments: Vec<f64> = occupants.iter().map(|_| rng.gen_range(0.0..8.0)).collect();

    Round::new(bids, clicks, occupants, slot_payments)
}

pub fn run(scenario_name: &str, config: &SimulationConfig, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(get_seed(0));
    let value = rng.gen_range(1.0..15.0);
    let budget = rng.gen_range(0.0..3000.0);
    let reserve = rng.gen_range(0.0..2.0);

    let mut agent = BudgetBalancedBidder::new(AGENT_ID, value, budget, config.clone());
    let mut history = History::new();
    let mut checks = Checks::new();

    logln!(logger, LogEvent::Scenario, "\n=== {} with budget {:.2}, reserve {:.2} ===", agent, budget, reserve);

    let mut bid = agent.initial_bid(reserve);
    let mut quote_violations = 0;
    let mut target_violations = 0;
    let mut bid_violations = 0;
    let mut budget_violations = 0;

    for t in 1..config.total_rounds {
        let round = random_round(&mut rng, bid);
        let paid = round.payment_for(AGENT_ID).unwrap_or(0.0);
        let num_slots = round.num_slots();
        history.push(round);

        let budget_before = agent.budget();
        bid = agent.bid(t, &history, reserve, logger)?;
        if agent.budget() != budget_before - paid {
            budget_violations += 1;
        }

        let quotes = agent.slot_info(t, &history, reserve)?;
        let utils = agent.expected_utils(t, &history, reserve)?;
        let target = agent.target_slot(t, &history, reserve)?;

        let quotes_ok = quotes.len() == num_slots
            && utils.len() == quotes.len()
            && quotes.iter().all(|q| q.max_bid >= q.min_bid)
            && quotes[0].max_bid == 2.0 * quotes[0].min_bid;
        if !quotes_ok {
            quote_violations += 1;
        }

        if argmax_index(&utils) != Some(target.slot) {
            target_violations += 1;
        }

        let bid_ok = if target.slot == 0 || value < target.min_bid {
            bid == value
        } else {
            bid >= target.min_bid - EPSILON && bid <= value + EPSILON
        };
        if !bid_ok {
            bid_violations += 1;
        }

        logln!(logger, LogEvent::Agent, "round {:>2}: {} slots, target {}, bid {:.4}, budget {:.2}", t, num_slots, target.slot, bid, agent.budget());
    }

    checks.check(quote_violations == 0,
        format!("One quote per slot with max bid >= min bid, top slot max twice its min: {} violations", quote_violations), logger);
    checks.check(target_violations == 0,
        format!("Target slot is the first slot of highest projected utility: {} violations", target_violations), logger);
    checks.check(bid_violations == 0,
        format!("Bid is value for the top slot or an unaffordable target, else between min bid and value: {} violations", bid_violations), logger);
    checks.check(budget_violations == 0,
        format!("Budget drops by exactly what was paid: {} violations", budget_violations), logger);

    checks.finish(scenario_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_round_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let round = random_round(&mut rng, 4.0);
            assert!((1..=4).contains(&round.num_slots()));
            assert!(round.clicks.windows(2).all(|w| w[1] <= w[0]));
            assert_eq!(round.occupants.len(), round.slot_payments.len());
            assert!(round.occupants.len() <= round.num_slots());
            assert_eq!(round.bids[0], (AGENT_ID, 4.0));
        }
    }

    #[test]
    fn test_invariants_hold() {
        let mut logger = Logger::new();
        assert!(run("random_rounds", &SimulationConfig::default(), &mut logger).is_ok());
    }
}
