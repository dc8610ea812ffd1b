//! A truthful bidder and a budget-balanced bidder with the same value bid side by side over
//! the same history, through the common bidder interface.
//!
//! Whatever it targets, balanced bidding never asks for more than value, so the budget-aware
//! bidder never outbids the truthful one.

use crate::agent::BudgetBalancedBidder;
use crate::bidders::{BidderTrait, TruthfulBidder};
use crate::config::SimulationConfig;
use crate::history::{AuctionHistory, History, Round};
use crate::logger::{LogEvent, Logger};
use crate::logln;
use crate::scenarios::Checks;

inventory::submit!(crate::scenarios::ScenarioEntry {
    short_name: "truthful_baseline",
    run,
});

const VALUE: f64 = 8.0;

pub fn run(scenario_name: &str, config: &SimulationConfig, logger: &mut Logger) -> Result<(), Box<dyn std::error::Error>> {
    let mut bidders: Vec<Box<dyn BidderTrait>> = vec![
        Box::new(TruthfulBidder { id: 0, value: VALUE }),
        Box::new(BudgetBalancedBidder::new(1, VALUE, 500.0, config.clone())),
    ];
    let mut checks = Checks::new();

    // Occupancy is a fixture: the three competitors hold the three slots every round
    let mut history = History::new();
    let mut bids_by_bidder: Vec<Vec<f64>> = vec![Vec::new(); bidders.len()];
    for (index, bidder) in bidders.iter().enumerate() {
        bids_by_bidder[index].push(bidder.initial_bid(0.0));
    }

    for t in 1..config.total_rounds {
        let mut round_bids = vec![(10, 9.0), (11, 5.0), (12, 2.0)];
        for (index, bidder) in bidders.iter().enumerate() {
            round_bids.push((bidder.agent_id(), bids_by_bidder[index][t - 1]));
        }
        history.push(Round::new(round_bids, vec![120.0, 80.0, 20.0], vec![10, 11, 12], vec![5.0, 2.0, 0.0]));

        for (index, bidder) in bidders.iter_mut().enumerate() {
            let bid = bidder.bid(t, &history, 0.0, logger)?;
            bids_by_bidder[index].push(bid);
        }
    }

    logln!(logger, LogEvent::Scenario, "Replayed {} rounds", history.num_rounds());
    for (index, bidder) in bidders.iter().enumerate() {
        let bids = &bids_by_bidder[index];
        let mean = bids.iter().sum::<f64>() / bids.len() as f64;
        logln!(logger, LogEvent::Agent, "{} (agent {}): mean bid {:.4} over {} rounds", bidder.bidder_type(), bidder.agent_id(), mean, bids.len());
    }

    let truthful = &bids_by_bidder[0];
    let balanced = &bids_by_bidder[1];
    checks.check(truthful.iter().all(|&b| b == VALUE),
        format!("Truthful bidder always bids value {:.2}", VALUE), logger);
    checks.check(balanced.iter().zip(truthful.iter()).all(|(b, t)| b <= t),
        "Budget-balanced bidder never outbids the truthful bidder".to_string(), logger);

    checks.finish(scenario_name)
}
