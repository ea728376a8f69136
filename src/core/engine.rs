use crate::domain::model::SearchSession;
use crate::domain::ports::SearchPipeline;
use crate::utils::error::Result;

pub struct ScoutEngine<P: SearchPipeline> {
    pipeline: P,
}

impl<P: SearchPipeline> ScoutEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Resolves the link and builds a fresh session. Only link problems are
    /// returned as errors; an unavailable spatial query yields an empty list.
    pub async fn search(&self, link: &str, radius_km: f64) -> Result<SearchSession> {
        tracing::info!("Starting site search (radius {} km)", radius_km);

        let origin = self.pipeline.locate(link).await?;

        let candidates = self.pipeline.extract(origin, radius_km).await;
        tracing::info!("Extracted {} candidates", candidates.len());

        let mut session = SearchSession::new(link.trim(), origin, radius_km);
        session.projects = self.pipeline.rank(origin, radius_km, candidates);
        tracing::info!("✅ {} projects after ranking", session.projects.len());

        Ok(session)
    }

    /// 依序補上完工日期估計；失敗只影響單一項目
    pub async fn enrich(&self, session: &mut SearchSession) {
        if session.projects.is_empty() {
            return;
        }
        self.pipeline.enrich(&mut session.projects).await;
    }
}
