use crate::adapters::http::build_client;
use crate::config::toml_config::ResolverConfig;
use crate::domain::model::GeoPoint;
use crate::domain::ports::LinkResolver;
use crate::domain::services::{extract_coordinates, normalize_link, ExtractionStrategy};
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::Client;

/// Follows redirects of a shared map link and reads the coordinate pair out
/// of the final URL.
pub struct HttpLinkResolver {
    client: Client,
    strategies: Vec<ExtractionStrategy>,
}

impl HttpLinkResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(
                &config.user_agent,
                config.timeout_seconds,
                config.max_redirects,
            )?,
            strategies: config.strategies.clone(),
        })
    }

    /// 單次請求，只取最終 URL；任何網路錯誤都視為無法解析
    async fn final_url(&self, link: &str) -> Result<String> {
        let response = self
            .client
            .get(link)
            .send()
            .await
            .map_err(|e| ScoutError::LinkUnresolved {
                link: link.to_string(),
                reason: format!("fetch failed: {}", e),
            })?;

        tracing::debug!(
            "Link resolved with status {} to {}",
            response.status(),
            response.url()
        );
        Ok(response.url().to_string())
    }
}

#[async_trait]
impl LinkResolver for HttpLinkResolver {
    async fn resolve(&self, link: &str) -> Result<GeoPoint> {
        let link = normalize_link(link)?;
        tracing::info!("🔗 Resolving map link: {}", link);

        let final_url = self.final_url(&link).await?;

        match extract_coordinates(&final_url, &self.strategies) {
            Some(point) => {
                tracing::info!("📍 Resolved coordinates: {}", point);
                Ok(point)
            }
            None => {
                tracing::warn!("No coordinate pattern found in {}", final_url);
                Err(ScoutError::LinkUnresolved {
                    link,
                    reason: "no coordinates in resolved URL".to_string(),
                })
            }
        }
    }
}
