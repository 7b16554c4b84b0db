use std::time::Duration;

use async_trait::async_trait;

use crate::finance::{FinanceError, FinanceGateway};
use crate::models::finance::PartnerFinances;

/// HTTP client for the aggregator backend that owns the bank connections.
#[derive(Clone)]
pub struct AggregatorClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl AggregatorClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        })
    }
}

#[async_trait]
impl FinanceGateway for AggregatorClient {
    async fn fetch_balances(&self) -> Result<PartnerFinances, FinanceError> {
        let base_url = self.base_url.as_deref().ok_or(FinanceError::NotConfigured)?;
        let url = format!("{}/api/balances", base_url);

        tracing::debug!(url = %url, "Fetching balances from aggregator");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FinanceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let finances: PartnerFinances = serde_json::from_str(&body)?;
        Ok(finances)
    }

    fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }
}
