use crate::domain::model::{Candidate, CompletionEstimate, GeoPoint, Project};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 將分享連結解析為座標
#[async_trait]
pub trait LinkResolver: Send + Sync {
    async fn resolve(&self, link: &str) -> Result<GeoPoint>;
}

/// Nearby feature lookup. Failures degrade to an empty list.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn nearby(&self, origin: GeoPoint, radius_km: f64) -> Vec<Candidate>;
}

/// Best-effort completion date lookup. Every path yields an outcome.
#[async_trait]
pub trait CompletionLookup: Send + Sync {
    async fn estimate(&self, project_name: &str) -> CompletionEstimate;
}

/// 搜尋流程的四個階段
#[async_trait]
pub trait SearchPipeline: Send + Sync {
    async fn locate(&self, link: &str) -> Result<GeoPoint>;
    async fn extract(&self, origin: GeoPoint, radius_km: f64) -> Vec<Candidate>;
    fn rank(&self, origin: GeoPoint, radius_km: f64, candidates: Vec<Candidate>) -> Vec<Project>;
    async fn enrich(&self, projects: &mut [Project]);
}
