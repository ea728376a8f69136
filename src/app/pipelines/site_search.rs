use crate::adapters::{HttpLinkResolver, OverpassClient, WebSearchEstimator};
use crate::config::ScoutConfig;
use crate::domain::model::{Candidate, GeoPoint, Project};
use crate::domain::ports::{CompletionLookup, FeatureSource, LinkResolver, SearchPipeline};
use crate::domain::services::{aggregate, AggregationRules};
use crate::utils::error::Result;
use crate::utils::throttle::Throttle;
use std::time::Duration;

/// Link → coordinate → nearby features → ranked projects, with optional
/// throttled date enrichment.
pub struct SiteSearchPipeline<R: LinkResolver, F: FeatureSource, E: CompletionLookup> {
    pub(crate) resolver: R,
    pub(crate) features: F,
    pub(crate) lookup: E,
    pub(crate) fallback_name_tags: Vec<String>,
    pub(crate) generic_name: String,
    pub(crate) min_delay: Duration,
    pub(crate) max_lookups: usize,
}

pub type HttpSiteSearchPipeline = SiteSearchPipeline<HttpLinkResolver, OverpassClient, WebSearchEstimator>;

impl<R: LinkResolver, F: FeatureSource, E: CompletionLookup> SiteSearchPipeline<R, F, E> {
    pub fn new(resolver: R, features: F, lookup: E, config: &ScoutConfig) -> Self {
        Self {
            resolver,
            features,
            lookup,
            fallback_name_tags: config.search.fallback_name_tags.clone(),
            generic_name: config.search.generic_name.clone(),
            min_delay: Duration::from_millis(config.estimator.min_delay_ms),
            max_lookups: config.estimator.max_lookups,
        }
    }
}

impl HttpSiteSearchPipeline {
    /// 以 HTTP adapters 建立完整流程
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let resolver = HttpLinkResolver::new(&config.resolver)?;
        let features = OverpassClient::new(&config.overpass)?;
        let lookup = WebSearchEstimator::new(
            &config.estimator,
            config.year_window(),
            &config.search.generic_name,
        )?;
        Ok(Self::new(resolver, features, lookup, config))
    }
}

#[async_trait::async_trait]
impl<R: LinkResolver, F: FeatureSource, E: CompletionLookup> SearchPipeline
    for SiteSearchPipeline<R, F, E>
{
    async fn locate(&self, link: &str) -> Result<GeoPoint> {
        self.resolver.resolve(link).await
    }

    async fn extract(&self, origin: GeoPoint, radius_km: f64) -> Vec<Candidate> {
        self.features.nearby(origin, radius_km).await
    }

    fn rank(&self, origin: GeoPoint, radius_km: f64, candidates: Vec<Candidate>) -> Vec<Project> {
        let rules = AggregationRules {
            radius_km,
            fallback_name_tags: self.fallback_name_tags.clone(),
            generic_name: self.generic_name.clone(),
        };
        aggregate(origin, candidates, &rules)
    }

    async fn enrich(&self, projects: &mut [Project]) {
        let mut throttle = Throttle::new(self.min_delay);
        let limit = self.max_lookups.min(projects.len());
        tracing::info!("🔍 Estimating completion dates for {} sites", limit);

        for (index, project) in projects.iter_mut().take(limit).enumerate() {
            // 通用名稱不會發出請求，不需節流
            let estimate = if project.name != self.generic_name {
                throttle.run(self.lookup.estimate(&project.name)).await
            } else {
                self.lookup.estimate(&project.name).await
            };
            tracing::debug!("{}/{} {} → {}", index + 1, limit, project.name, estimate);
            project.completion_estimate = Some(estimate);
        }
    }
}
