pub mod aggregator;

use async_trait::async_trait;

use crate::models::finance::PartnerFinances;

pub use aggregator::AggregatorClient;

#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("Finance aggregator is not configured")]
    NotConfigured,

    #[error("Request to finance aggregator failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Finance aggregator returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed finance aggregator response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of categorized account balances. Implementations report failure as
/// an error; they never substitute zero or synthetic balances.
#[async_trait]
pub trait FinanceGateway: Send + Sync {
    async fn fetch_balances(&self) -> Result<PartnerFinances, FinanceError>;

    fn is_configured(&self) -> bool;
}
