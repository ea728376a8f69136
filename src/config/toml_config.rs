use crate::domain::services::{ExtractionStrategy, YearWindow};
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_radius, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
pub const GENERIC_SITE_NAME: &str = "Residential Complex/Site";
pub const MAX_RADIUS_KM: f64 = 50.0;

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub search: SearchConfig,
    pub resolver: ResolverConfig,
    pub overpass: OverpassConfig,
    pub estimator: EstimatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_km: f64,
    pub generic_name: String,
    /// 沒有 name 標籤時依序嘗試的標籤
    pub fallback_name_tags: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_km: 5.0,
            generic_name: GENERIC_SITE_NAME.to_string(),
            fallback_name_tags: vec!["addr:housename".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub timeout_seconds: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    pub strategies: Vec<ExtractionStrategy>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 12,
            max_redirects: 10,
            user_agent: BROWSER_USER_AGENT.to_string(),
            strategies: ExtractionStrategy::default_order(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub tags: Vec<TagFilter>,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_seconds: 30,
            user_agent: concat!("site-scout/", env!("CARGO_PKG_VERSION")).to_string(),
            tags: vec![
                TagFilter::new("building", "residential"),
                TagFilter::new("building", "apartments"),
                TagFilter::new("building", "construction"),
                TagFilter::new("landuse", "construction"),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub keywords: Vec<String>,
    /// 地區提示，例如城市名稱
    pub locality: Option<String>,
    pub min_delay_ms: u64,
    pub max_lookups: usize,
    pub year_window: YearWindowConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.google.com/search".to_string(),
            timeout_seconds: 5,
            user_agent: BROWSER_USER_AGENT.to_string(),
            keywords: vec!["possession date".to_string(), "completion".to_string()],
            locality: None,
            min_delay_ms: 1500,
            max_lookups: 10,
            year_window: YearWindowConfig::default(),
        }
    }
}

/// Explicit bounds win; otherwise the window starts at the current year and
/// spans `span_years`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YearWindowConfig {
    pub start: Option<i32>,
    pub end: Option<i32>,
    pub span_years: i32,
}

impl Default for YearWindowConfig {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            span_years: 6,
        }
    }
}

impl YearWindowConfig {
    pub fn resolve(&self) -> YearWindow {
        let current = YearWindow::from_current_year(self.span_years);
        let start = self.start.unwrap_or(current.start);
        let end = self.end.unwrap_or(start + self.span_years);
        YearWindow::new(start, end)
    }
}

impl ScoutConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| ScoutError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SEARCH_ENDPOINT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn year_window(&self) -> YearWindow {
        self.estimator.year_window.resolve()
    }
}

impl Validate for ScoutConfig {
    fn validate(&self) -> Result<()> {
        validate_radius("search.radius_km", self.search.radius_km, MAX_RADIUS_KM)?;
        validate_non_empty_string("search.generic_name", &self.search.generic_name)?;

        validate_positive_number("resolver.timeout_seconds", self.resolver.timeout_seconds, 1)?;
        if self.resolver.strategies.is_empty() {
            return Err(ScoutError::MissingConfigError {
                field: "resolver.strategies".to_string(),
            });
        }

        validate_url("overpass.endpoint", &self.overpass.endpoint)?;
        validate_positive_number("overpass.timeout_seconds", self.overpass.timeout_seconds, 1)?;
        if self.overpass.tags.is_empty() {
            return Err(ScoutError::MissingConfigError {
                field: "overpass.tags".to_string(),
            });
        }

        validate_url("estimator.endpoint", &self.estimator.endpoint)?;
        validate_positive_number("estimator.timeout_seconds", self.estimator.timeout_seconds, 1)?;

        let window = self.year_window();
        if window.start > window.end {
            return Err(ScoutError::InvalidConfigValueError {
                field: "estimator.year_window".to_string(),
                value: format!("{}..{}", window.start, window.end),
                reason: "start year must not be after end year".to_string(),
            });
        }

        Ok(())
    }
}
