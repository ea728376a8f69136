//! Coordinate extraction from resolved map URLs.
//!
//! Shared map links come in several dialects. Each dialect is handled by one
//! [`ExtractionStrategy`]; strategies run in a caller-supplied order and the
//! first one yielding an in-range pair wins.

use crate::domain::model::GeoPoint;
use crate::utils::error::{Result, ScoutError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CENTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[?&]center=(-?\d+(?:\.\d+)?)(?:%2C|,)(-?\d+(?:\.\d+)?)").unwrap()
});
static AT_SIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)").unwrap());
static MARKER_LAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!3d(-?\d+(?:\.\d+)?)").unwrap());
static MARKER_LON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!4d(-?\d+(?:\.\d+)?)").unwrap());
static QUERY_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[?&](?:q|ll|query)=(-?\d+(?:\.\d+)?)(?:%2C|,)(?:\+|%20)*(-?\d+(?:\.\d+)?)",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// `center=<lat>%2C<lon>` query parameter
    Center,
    /// `@<lat>,<lon>` path segment
    AtSign,
    /// paired `!3d<lat>` / `!4d<lon>` tokens
    Marker,
    /// `q=`, `ll=` or `query=` carrying a coordinate pair
    QueryParam,
}

impl ExtractionStrategy {
    pub fn default_order() -> Vec<ExtractionStrategy> {
        vec![
            ExtractionStrategy::Center,
            ExtractionStrategy::AtSign,
            ExtractionStrategy::Marker,
            ExtractionStrategy::QueryParam,
        ]
    }

    pub fn apply(&self, url: &str) -> Option<GeoPoint> {
        match self {
            ExtractionStrategy::Center => capture_pair(&CENTER_RE, url),
            ExtractionStrategy::AtSign => capture_pair(&AT_SIGN_RE, url),
            ExtractionStrategy::Marker => {
                // 兩個標記必須同時存在
                let lat = MARKER_LAT_RE.captures(url)?;
                let lon = MARKER_LON_RE.captures(url)?;
                parse_pair(&lat[1], &lon[1])
            }
            ExtractionStrategy::QueryParam => capture_pair(&QUERY_PARAM_RE, url),
        }
    }
}

fn capture_pair(re: &Regex, url: &str) -> Option<GeoPoint> {
    let caps = re.captures(url)?;
    parse_pair(&caps[1], &caps[2])
}

fn parse_pair(lat: &str, lon: &str) -> Option<GeoPoint> {
    let lat: f64 = lat.parse().ok()?;
    let lon: f64 = lon.parse().ok()?;
    GeoPoint::new(lat, lon)
}

/// Runs the strategies in order; the first in-range pair wins.
pub fn extract_coordinates(url: &str, strategies: &[ExtractionStrategy]) -> Option<GeoPoint> {
    strategies.iter().find_map(|strategy| {
        let point = strategy.apply(url);
        if let Some(p) = point {
            tracing::debug!("Strategy {:?} matched {}", strategy, p);
        }
        point
    })
}

/// Trims the raw input and adds a scheme when missing. Blank input is the
/// only link rejected before touching the network.
pub fn normalize_link(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScoutError::EmptyLink);
    }
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        trimmed
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    if has_scheme {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{}", trimmed))
    }
}
