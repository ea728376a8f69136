use crate::adapters::http::build_client;
use crate::config::toml_config::EstimatorConfig;
use crate::domain::model::CompletionEstimate;
use crate::domain::ports::CompletionLookup;
use crate::domain::services::{build_search_query, infer_completion_date, YearWindow};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Estimates completion dates by scanning raw search-result markup.
pub struct WebSearchEstimator {
    client: Client,
    endpoint: String,
    keywords: Vec<String>,
    locality: Option<String>,
    window: YearWindow,
    generic_name: String,
}

impl WebSearchEstimator {
    pub fn new(config: &EstimatorConfig, window: YearWindow, generic_name: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(&config.user_agent, config.timeout_seconds, 5)?,
            endpoint: config.endpoint.clone(),
            keywords: config.keywords.clone(),
            locality: config.locality.clone(),
            window,
            generic_name: generic_name.to_string(),
        })
    }

    async fn fetch_text(&self, query: &str) -> Result<String> {
        let text = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

#[async_trait]
impl CompletionLookup for WebSearchEstimator {
    async fn estimate(&self, project_name: &str) -> CompletionEstimate {
        if project_name == self.generic_name {
            return CompletionEstimate::Unknown;
        }

        let query = build_search_query(project_name, self.locality.as_deref(), &self.keywords);
        tracing::debug!("Searching: {}", query);

        // 只嘗試一次，不重試
        match self.fetch_text(&query).await {
            Ok(text) => infer_completion_date(&text, self.window),
            Err(e) => {
                tracing::warn!("Date lookup for '{}' failed: {}", project_name, e);
                CompletionEstimate::LookupFailed
            }
        }
    }
}
