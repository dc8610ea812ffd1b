use crate::history::AgentId;

/// Range of bids that would land a bidder in a given slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BidRange {
    /// Bid that ties the competitor currently holding the slot
    pub min_bid: f64,
    /// Bid that ties the competitor one slot higher. None for the top slot.
    pub max_bid: Option<f64>,
}

/// Prices slots against a fixed set of competitor bids
pub trait SlotPricingOracle {
    /// Bid range for `slot` given the click vector, the reserve price and the competitors' bids
    fn bid_range_for_slot(&self, slot: usize, clicks: &[f64], reserve: f64, other_bids: &[(AgentId, f64)]) -> BidRange;
}

/// Generalized second price: slots go to bids in descending order, bids below the reserve
/// are ignored, and a bidder in slot k pays the bid in slot k+1 (or the reserve).
pub struct GspPricing;

impl SlotPricingOracle for GspPricing {
    fn bid_range_for_slot(&self, slot: usize, _clicks: &[f64], reserve: f64, other_bids: &[(AgentId, f64)]) -> BidRange {
        let mut valid: Vec<f64> = other_bids
            .iter()
            .map(|&(_, bid)| bid)
            .filter(|&bid| bid >= reserve)
            .collect();
        valid.sort_by(|a, b| b.total_cmp(a));

        // Tie the competitor at this rank; with fewer competitors than slots the reserve is enough
        let min_bid = valid.get(slot).copied().unwrap_or(reserve);
        let max_bid = if slot == 0 {
            None
        } else {
            Some(valid.get(slot - 1).copied().unwrap_or(reserve))
        };

        BidRange { min_bid, max_bid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_competitors() {
        let bids = vec![(1, 3.0), (2, 6.0)];
        let clicks = [100.0, 50.0];
        assert_eq!(GspPricing.bid_range_for_slot(0, &clicks, 0.0, &bids), BidRange { min_bid: 6.0, max_bid: None });
        assert_eq!(GspPricing.bid_range_for_slot(1, &clicks, 0.0, &bids), BidRange { min_bid: 3.0, max_bid: Some(6.0) });
    }

    #[test]
    fn test_reserve_filters_bids() {
        let bids = vec![(1, 3.0), (2, 6.0)];
        let clicks = [100.0, 50.0];
        // Bid 3.0 is below the reserve, so slot 1 is available at the reserve itself
        assert_eq!(GspPricing.bid_range_for_slot(1, &clicks, 4.0, &bids), BidRange { min_bid: 4.0, max_bid: Some(6.0) });
    }

    #[test]
    fn test_more_slots_than_competitors() {
        let bids = vec![(1, 5.0)];
        let clicks = [80.0, 60.0, 40.0];
        assert_eq!(GspPricing.bid_range_for_slot(0, &clicks, 1.0, &bids), BidRange { min_bid: 5.0, max_bid: None });
        assert_eq!(GspPricing.bid_range_for_slot(1, &clicks, 1.0, &bids), BidRange { min_bid: 1.0, max_bid: Some(5.0) });
        assert_eq!(GspPricing.bid_range_for_slot(2, &clicks, 1.0, &bids), BidRange { min_bid: 1.0, max_bid: Some(1.0) });
    }

    #[test]
    fn test_no_competitors() {
        let clicks = [10.0];
        assert_eq!(GspPricing.bid_range_for_slot(0, &clicks, 0.5, &[]), BidRange { min_bid: 0.5, max_bid: None });
    }
}
