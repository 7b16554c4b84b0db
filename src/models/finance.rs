use serde::{Deserialize, Serialize};

/// Balance and week-over-week change for one bucket of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketBalance {
    pub balance: f64,
    pub weekly_change: f64,
}

/// Categorized balances as reported by the aggregator backend. Every bucket is
/// required: a missing bucket is a decode failure, not a zero balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerFinances {
    #[serde(alias = "ben")]
    pub partner1: BucketBalance,
    #[serde(alias = "sydney")]
    pub partner2: BucketBalance,
    pub investments: BucketBalance,
}

impl PartnerFinances {
    pub fn total_balance(&self) -> f64 {
        self.partner1.balance + self.partner2.balance + self.investments.balance
    }
}
