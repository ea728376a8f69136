use anyhow::Result;
use httpmock::prelude::*;
use site_scout::core::Storage;
use site_scout::{
    CompletionEstimate, GeoPoint, HttpSiteSearchPipeline, LocalStorage, ScoutConfig, ScoutEngine,
    ScoutError,
};
use tempfile::TempDir;

fn config_for(server: &MockServer) -> ScoutConfig {
    let mut config = ScoutConfig::from_toml_str(&format!(
        r#"
[search]
radius_km = 5.0

[resolver]
timeout_seconds = 5

[overpass]
endpoint = "{}"
timeout_seconds = 5

[estimator]
endpoint = "{}"
locality = "Pune"
min_delay_ms = 10

[estimator.year_window]
start = 2025
end = 2031
"#,
        server.url("/api/interpreter"),
        server.url("/search")
    ))
    .unwrap();
    config.estimator.max_lookups = 5;
    config
}

fn mock_share_link(server: &MockServer) -> String {
    server.mock(|when, then| {
        when.method(GET).path("/share/xyz");
        then.status(301)
            .header("Location", server.url("/maps/place/Baner/@18.5521,73.7383,14z"));
    });
    server.mock(|when, then| {
        when.method(GET).path("/maps/place/Baner/@18.5521,73.7383,14z");
        then.status(200).body("<html>map</html>");
    });
    server.url("/share/xyz")
}

/// 端到端：1.2 km 的地物保留，6.0 km 的被過濾
#[tokio::test]
async fn test_end_to_end_radius_filter() -> Result<()> {
    let server = MockServer::start();
    let link = mock_share_link(&server);
    let overpass = server.mock(|when, then| {
        when.method(POST).path("/api/interpreter");
        then.status(200).json_body(serde_json::json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 18.562892, "lon": 73.7383,
                 "tags": {"name": "Near Heights", "building": "apartments"}},
                {"type": "way", "id": 2, "center": {"lat": 18.606059, "lon": 73.7383},
                 "tags": {"name": "Far Towers", "landuse": "construction"}}
            ]
        }));
    });

    let engine = ScoutEngine::new(HttpSiteSearchPipeline::from_config(&config_for(&server))?);
    let session = engine.search(&link, 5.0).await?;

    overpass.assert();
    assert_eq!(session.origin, GeoPoint::new(18.5521, 73.7383).unwrap());
    assert_eq!(session.projects.len(), 1);
    assert_eq!(session.projects[0].name, "Near Heights");
    assert_eq!(session.projects[0].distance_km, 1.2);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_dedup_and_enrich() -> Result<()> {
    let server = MockServer::start();
    let link = mock_share_link(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/interpreter");
        then.status(200).json_body(serde_json::json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 18.565590, "lon": 73.7383,
                 "tags": {"name": "Godrej Woodsville"}},
                {"type": "node", "id": 2, "lat": 18.561093, "lon": 73.7383,
                 "tags": {"name": "Godrej Woodsville"}},
                {"type": "way", "id": 3, "center": {"lat": 18.5530, "lon": 73.7383},
                 "tags": {"landuse": "construction"}}
            ]
        }));
    });
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("q", "Godrej Woodsville Pune possession date completion");
        then.status(200)
            .body("<div>Possession: Dec 2027</div><div>RERA possession Dec 2027, launched 2024</div>");
    });

    let engine = ScoutEngine::new(HttpSiteSearchPipeline::from_config(&config_for(&server))?);
    let mut session = engine.search(&link, 5.0).await?;

    assert_eq!(session.projects.len(), 2);
    assert_eq!(session.projects[0].name, "Godrej Woodsville");
    assert_eq!(session.projects[0].distance_km, 1.0);
    assert_eq!(session.projects[1].name, "Residential Complex/Site");

    engine.enrich(&mut session).await;

    search.assert_hits(1);
    assert_eq!(
        session.projects[0].completion_estimate,
        Some(CompletionEstimate::Estimated("Dec 2027".to_string()))
    );
    assert_eq!(
        session.projects[1].completion_estimate,
        Some(CompletionEstimate::Unknown)
    );
    Ok(())
}

#[tokio::test]
async fn test_spatial_outage_yields_empty_session() -> Result<()> {
    let server = MockServer::start();
    let link = mock_share_link(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/interpreter");
        then.status(504).body("Gateway Timeout");
    });

    let engine = ScoutEngine::new(HttpSiteSearchPipeline::from_config(&config_for(&server))?);
    let session = engine.search(&link, 5.0).await?;

    assert_eq!(session.origin, GeoPoint::new(18.5521, 73.7383).unwrap());
    assert!(session.projects.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unresolvable_link_skips_spatial_query() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/share/plain");
        then.status(200).body("no map here");
    });
    let overpass = server.mock(|when, then| {
        when.method(POST).path("/api/interpreter");
        then.status(200).json_body(serde_json::json!({"elements": []}));
    });

    let engine = ScoutEngine::new(HttpSiteSearchPipeline::from_config(&config_for(&server))?);
    let result = engine.search(&server.url("/share/plain"), 5.0).await;

    assert!(matches!(result, Err(ScoutError::LinkUnresolved { .. })));
    overpass.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_session_written_as_json() -> Result<()> {
    let server = MockServer::start();
    let link = mock_share_link(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/interpreter");
        then.status(200).json_body(serde_json::json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 18.562892, "lon": 73.7383,
                 "tags": {"name": "Near Heights"}}
            ]
        }));
    });

    let engine = ScoutEngine::new(HttpSiteSearchPipeline::from_config(&config_for(&server))?);
    let session = engine.search(&link, 5.0).await?;

    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());
    let json = site_scout::app::report::to_json(&session)?;
    storage.write_file("out/session.json", json.as_bytes()).await?;

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("out/session.json"))?)?;
    assert_eq!(written["projects"][0]["name"], "Near Heights");
    assert_eq!(written["radius_km"], 5.0);
    Ok(())
}
