use crate::app::ports::{DonorSourcePort, FetchOutcome};
use crate::config::LookupConfig;
use crate::error::{LookupError, Result};
use crate::parser::parse_donation_table;
use crate::types::ContributorFormat;
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

/// Donor-lookup client: one GET per name, a single timeout, no retries.
pub struct OpenSecretsClient {
    client: reqwest::Client,
    base_url: Url,
    format: ContributorFormat,
}

impl OpenSecretsClient {
    pub fn new(config: &LookupConfig, format: ContributorFormat) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            LookupError::Config(format!("Invalid lookup base_url '{}': {}", config.base_url, e))
        })?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, base_url, format })
    }

    async fn get_table(&self, url: &str) -> Result<(u16, String)> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;
        Ok((status.as_u16(), body))
    }
}

#[async_trait]
impl DonorSourcePort for OpenSecretsClient {
    fn lookup_url(&self, name: &str) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("name", name);
        url.to_string()
    }

    async fn fetch(&self, name: &str) -> FetchOutcome {
        let url = self.lookup_url(name);
        match self.get_table(&url).await {
            Ok((status_code, body)) => {
                debug!("Fetched {} bytes from {}", body.len(), url);
                let rows = parse_donation_table(&body, self.format);
                FetchOutcome::Table { url, status_code, rows }
            }
            Err(e) => {
                let status_code = match &e {
                    LookupError::Status { status, .. } => Some(*status),
                    _ => None,
                };
                FetchOutcome::Failed {
                    url,
                    status_code,
                    reason: e.to_string(),
                }
            }
        }
    }
}
