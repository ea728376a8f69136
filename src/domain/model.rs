use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// 地理座標 (度)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Returns `None` when either component is outside the valid degree range.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// 空間資料庫回傳的原始地物，尚未計算距離或去重
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: Option<String>,
    pub location: GeoPoint,
    pub tags: HashMap<String, String>,
}

/// Outcome of a best-effort completion date lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEstimate {
    Estimated(String),
    /// Generic sentinel name; no lookup was attempted.
    Unknown,
    LookupFailed,
    NoSignal,
}

impl fmt::Display for CompletionEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionEstimate::Estimated(date) => f.write_str(date),
            CompletionEstimate::Unknown => f.write_str("unknown"),
            CompletionEstimate::LookupFailed => f.write_str("lookup failed"),
            CompletionEstimate::NoSignal => f.write_str("no signal"),
        }
    }
}

impl Serialize for CompletionEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub name: String,
    pub distance_km: f64,
    pub location: GeoPoint,
    pub completion_estimate: Option<CompletionEstimate>,
}

/// 單次搜尋的結果；下一次搜尋會建立新的 session
#[derive(Debug, Clone, Serialize)]
pub struct SearchSession {
    pub link: String,
    pub origin: GeoPoint,
    pub radius_km: f64,
    pub projects: Vec<Project>,
}

impl SearchSession {
    pub fn new(link: impl Into<String>, origin: GeoPoint, radius_km: f64) -> Self {
        Self {
            link: link.into(),
            origin,
            radius_km,
            projects: Vec::new(),
        }
    }

    pub fn named_projects(&self, generic_name: &str) -> impl Iterator<Item = &Project> {
        let generic_name = generic_name.to_string();
        self.projects.iter().filter(move |p| p.name != generic_name)
    }
}
