//! Proximity queries against an Overpass (OpenStreetMap) endpoint.

use crate::adapters::http::build_client;
use crate::config::toml_config::{OverpassConfig, TagFilter};
use crate::domain::model::{Candidate, GeoPoint};
use crate::domain::ports::FeatureSource;
use crate::domain::services::geo::km_to_meters;
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    /// `out center` 為 way 與 relation 提供的中心點
    center: Option<LatLon>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    /// Direct coordinates first, then the area centroid. Neither → dropped.
    fn into_candidate(self) -> Option<Candidate> {
        let location = match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => GeoPoint::new(lat, lon),
            (_, _, Some(c)) => GeoPoint::new(c.lat, c.lon),
            _ => None,
        }?;
        let name = self.tags.get("name").cloned();
        Some(Candidate {
            name,
            location,
            tags: self.tags,
        })
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds an Overpass QL union over nodes, ways and relations for every tag
/// filter.
pub fn build_query(origin: GeoPoint, radius_km: f64, tags: &[TagFilter], timeout_seconds: u64) -> String {
    let meters = km_to_meters(radius_km);
    let mut query = format!("[out:json][timeout:{}];\n(\n", timeout_seconds);
    for tag in tags {
        for kind in ["node", "way", "relation"] {
            let _ = writeln!(
                query,
                "  {}[\"{}\"=\"{}\"](around:{},{},{});",
                kind,
                escape(&tag.key),
                escape(&tag.value),
                meters,
                origin.lat,
                origin.lon
            );
        }
    }
    query.push_str(");\nout center;\n");
    query
}

pub struct OverpassClient {
    client: Client,
    endpoint: String,
    tags: Vec<TagFilter>,
    timeout_seconds: u64,
}

impl OverpassClient {
    pub fn new(config: &OverpassConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(&config.user_agent, config.timeout_seconds, 0)?,
            endpoint: config.endpoint.clone(),
            tags: config.tags.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// 單次查詢；錯誤以 QueryUnavailable 回報給 `nearby`
    pub async fn fetch(&self, origin: GeoPoint, radius_km: f64) -> Result<Vec<Candidate>> {
        let query = build_query(origin, radius_km, &self.tags, self.timeout_seconds);
        tracing::debug!("Overpass query:\n{}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| ScoutError::QueryUnavailable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScoutError::QueryUnavailable {
                reason: "rate limited".to_string(),
            });
        }
        if !status.is_success() {
            return Err(ScoutError::QueryUnavailable {
                reason: format!("status {}", status),
            });
        }

        let body: OverpassResponse =
            response
                .json()
                .await
                .map_err(|e| ScoutError::QueryUnavailable {
                    reason: format!("malformed response: {}", e),
                })?;

        let total = body.elements.len();
        let candidates: Vec<Candidate> = body
            .elements
            .into_iter()
            .filter_map(OverpassElement::into_candidate)
            .collect();
        if candidates.len() < total {
            tracing::debug!("Dropped {} elements without coordinates", total - candidates.len());
        }
        Ok(candidates)
    }
}

#[async_trait]
impl FeatureSource for OverpassClient {
    async fn nearby(&self, origin: GeoPoint, radius_km: f64) -> Vec<Candidate> {
        tracing::info!("🗺️ Querying features within {} km of {}", radius_km, origin);
        match self.fetch(origin, radius_km).await {
            Ok(candidates) => {
                tracing::info!("Received {} candidate features", candidates.len());
                candidates
            }
            Err(e) => {
                tracing::warn!("⚠️ {}; continuing with no candidates", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn origin() -> GeoPoint {
        GeoPoint::new(18.5521, 73.7383).unwrap()
    }

    fn client_for(server: &MockServer) -> OverpassClient {
        let config = OverpassConfig {
            endpoint: server.url("/api/interpreter"),
            timeout_seconds: 5,
            ..OverpassConfig::default()
        };
        OverpassClient::new(&config).unwrap()
    }

    #[test]
    fn test_build_query() {
        let tags = vec![TagFilter::new("building", "apartments")];
        let query = build_query(origin(), 2.5, &tags, 25);

        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains("node[\"building\"=\"apartments\"](around:2500,18.5521,73.7383);"));
        assert!(query.contains("way[\"building\"=\"apartments\"](around:2500,18.5521,73.7383);"));
        assert!(query.contains("relation[\"building\"=\"apartments\"](around:2500,18.5521,73.7383);"));
        assert!(query.trim_end().ends_with("out center;"));
    }

    #[tokio::test]
    async fn test_parses_nodes_and_way_centroids() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/interpreter").body_contains("data=");
            then.status(200).json_body(serde_json::json!({
                "elements": [
                    {"type": "node", "id": 1, "lat": 18.56, "lon": 73.74,
                     "tags": {"name": "Kolte Patil Life Republic", "building": "apartments"}},
                    {"type": "way", "id": 2, "center": {"lat": 18.55, "lon": 73.73},
                     "tags": {"landuse": "construction"}},
                    {"type": "relation", "id": 4, "center": {"lat": 18.54, "lon": 73.75},
                     "tags": {"name": "Multipolygon Site", "landuse": "construction"}},
                    {"type": "way", "id": 3, "tags": {"name": "No Geometry"}}
                ]
            }));
        });

        let candidates = client_for(&server).nearby(origin(), 5.0).await;

        mock.assert();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].name.as_deref(), Some("Kolte Patil Life Republic"));
        assert_eq!(candidates[1].name, None);
        assert_eq!(candidates[1].location, GeoPoint::new(18.55, 73.73).unwrap());
        assert_eq!(
            candidates[1].tags.get("landuse").map(String::as_str),
            Some("construction")
        );
        assert_eq!(candidates[2].name.as_deref(), Some("Multipolygon Site"));
        assert_eq!(candidates[2].location, GeoPoint::new(18.54, 73.75).unwrap());
    }

    #[tokio::test]
    async fn test_rate_limit_degrades_to_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/interpreter");
            then.status(429).body("rate limited");
        });

        let client = client_for(&server);
        assert!(client.nearby(origin(), 5.0).await.is_empty());
        assert!(matches!(
            client.fetch(origin(), 5.0).await,
            Err(ScoutError::QueryUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_degrades_to_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/interpreter");
            then.status(200).body("<html>runtime error</html>");
        });

        assert!(client_for(&server).nearby(origin(), 5.0).await.is_empty());
    }
}
