use std::fmt;

use crate::bidders::BidderTrait;
use crate::config::SimulationConfig;
use crate::errors::BidError;
use crate::gsp::{GspPricing, SlotPricingOracle};
use crate::history::{AgentId, AuctionHistory};
use crate::logger::{LogEvent, Logger};
use crate::projection::{self, ProjectionInput, SlotQuote};
use crate::utils::argmax_index;
use crate::{logln, warnln};

/// Balanced bidding with a budget.
///
/// Each round the bidder picks the slot with the best projected utility, where a slot whose
/// tying price the remaining budget cannot sustain until the end of the simulation is
/// discounted in proportion to the shortfall. It then bids so that it would be indifferent
/// between the target slot at its tying price and the slot above it at the new bid:
///
/// `clicks[s] * (value - min_bid[s]) = clicks[s-1] * (value - bid)`
///
/// For the top slot, or when even the target slot's tying price is above value, it bids value.
pub struct BudgetBalancedBidder {
    pub id: AgentId,
    pub value: f64,
    budget: f64,
    config: SimulationConfig,
    oracle: Box<dyn SlotPricingOracle>,
    /// Last round whose previous-round payment has been deducted
    last_charged_round: Option<usize>,
}

impl BudgetBalancedBidder {
    /// Create a bidder priced with the generalized second price rule
    pub fn new(id: AgentId, value: f64, budget: f64, config: SimulationConfig) -> Self {
        Self::with_oracle(id, value, budget, config, Box::new(GspPricing))
    }

    pub fn with_oracle(id: AgentId, value: f64, budget: f64, config: SimulationConfig, oracle: Box<dyn SlotPricingOracle>) -> Self {
        Self {
            id,
            value,
            budget,
            config,
            oracle,
            last_charged_round: None,
        }
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Round 0 bid: two thirds of value
    pub fn initial_bid(&self, _reserve: f64) -> f64 {
        self.value * 2.0 / 3.0
    }

    /// Quotes for every slot, assuming the other agents repeat their round `t-1` bids
    pub fn slot_info(&self, t: usize, history: &dyn AuctionHistory, reserve: f64) -> Result<Vec<SlotQuote>, BidError> {
        projection::slot_info(self.id, t, history, reserve, self.oracle.as_ref())
    }

    /// Projected utility of targeting each slot for the rest of the simulation
    pub fn expected_utils(&self, t: usize, history: &dyn AuctionHistory, reserve: f64) -> Result<Vec<f64>, BidError> {
        let (_, utils) = self.project(t, history, reserve)?;
        Ok(utils)
    }

    /// The slot with the highest projected utility, lowest slot on ties
    pub fn target_slot(&self, t: usize, history: &dyn AuctionHistory, reserve: f64) -> Result<SlotQuote, BidError> {
        let (quotes, utils) = self.project(t, history, reserve)?;
        let target = argmax_index(&utils).ok_or(BidError::NoSlots { round: t })?;
        Ok(quotes[target])
    }

    /// Deduct what was paid in round `t-1`, if the bidder held a slot then.
    ///
    /// Each round may be charged once; charging a round at or before the last charged one
    /// fails without touching the budget. Returns the budget after the charge.
    pub fn update_budget(&mut self, t: usize, history: &dyn AuctionHistory) -> Result<f64, BidError> {
        if let Some(last_charged) = self.last_charged_round {
            if t <= last_charged {
                return Err(BidError::BudgetAlreadyCharged { round: t, last_charged });
            }
        }

        let prev_round = projection::previous_round(history, t)?;
        if let Some(payment) = prev_round.payment_for(self.id) {
            self.budget -= payment;
        }
        self.last_charged_round = Some(t);

        Ok(self.budget)
    }

    /// Next bid for round `t`. Charges round `t-1` first unless that already happened.
    pub fn bid(&mut self, t: usize, history: &dyn AuctionHistory, reserve: f64, logger: &mut Logger) -> Result<f64, BidError> {
        self.check_horizon(t)?;
        if self.last_charged_round != Some(t) {
            let budget_before = self.budget;
            self.update_budget(t, history)?;
            if self.budget < 0.0 && budget_before >= 0.0 {
                warnln!(logger, LogEvent::Round, "Agent {} is overdrawn in round {}: budget {:.4}", self.id, t, self.budget);
            }
        }

        let (quotes, utils) = self.project(t, history, reserve)?;
        let target = quotes[argmax_index(&utils).ok_or(BidError::NoSlots { round: t })?];

        let bid = if self.value < target.min_bid || target.slot == 0 {
            self.value
        } else {
            let clicks = &projection::previous_round(history, t)?.clicks;
            let clicks_above = clicks[target.slot - 1];
            if clicks_above == 0.0 {
                return Err(BidError::ZeroClicksAboveTarget { slot: target.slot });
            }
            self.value - clicks[target.slot] * (self.value - target.min_bid) / clicks_above
        };

        logln!(logger, LogEvent::Round,
            "Round {} agent {}: budget={:.4}, utilities={:.4?}, target slot {} [{:.4}, {:.4}], bid={:.4}",
            t, self.id, self.budget, utils, target.slot, target.min_bid, target.max_bid, bid);

        Ok(bid)
    }

    fn check_horizon(&self, t: usize) -> Result<(), BidError> {
        if t >= self.config.total_rounds {
            return Err(BidError::RoundBeyondHorizon { round: t, total_rounds: self.config.total_rounds });
        }
        Ok(())
    }

    /// Quotes and their projected utilities, computed from one read of round `t-1`
    fn project(&self, t: usize, history: &dyn AuctionHistory, reserve: f64) -> Result<(Vec<SlotQuote>, Vec<f64>), BidError> {
        self.check_horizon(t)?;
        let prev_round = projection::previous_round(history, t)?;
        let quotes = projection::quote_round(self.id, prev_round, reserve, self.oracle.as_ref());
        let input = ProjectionInput {
            value: self.value,
            budget: self.budget,
            remaining_rounds: self.config.remaining_rounds(t),
        };
        let utils = projection::expected_utils(&quotes, &prev_round.clicks, &input);
        Ok((quotes, utils))
    }
}

impl BidderTrait for BudgetBalancedBidder {
    fn agent_id(&self) -> AgentId {
        self.id
    }

    fn initial_bid(&self, reserve: f64) -> f64 {
        BudgetBalancedBidder::initial_bid(self, reserve)
    }

    fn bid(&mut self, t: usize, history: &dyn AuctionHistory, reserve: f64, logger: &mut Logger) -> Result<f64, BidError> {
        BudgetBalancedBidder::bid(self, t, history, reserve, logger)
    }

    fn bidder_type(&self) -> String {
        "Budget balanced".to_string()
    }
}

impl fmt::Display for BudgetBalancedBidder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BudgetBalancedBidder(id={}, value={})", self.id, self.value)
    }
}
