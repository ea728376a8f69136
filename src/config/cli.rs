use crate::config::toml_config::{ScoutConfig, MAX_RADIUS_KM};
use crate::utils::error::Result;
use crate::utils::validation::{validate_output_path, validate_radius, Validate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "site-scout")]
#[command(about = "Find residential construction sites near a shared map link")]
pub struct CliConfig {
    /// Shared map link (full, redirecting or shortened)
    pub link: String,

    /// Search radius in kilometers (overrides the config file)
    #[arg(long, short)]
    pub radius: Option<f64>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Look up completion dates for the found sites (slow)")]
    pub estimate: bool,

    #[arg(long, help = "Maximum number of sites to look up dates for")]
    pub max_lookups: Option<usize>,

    #[arg(long, help = "Write the result set to this file")]
    pub output: Option<String>,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 以命令列參數覆寫檔案配置
    pub fn apply_overrides(&self, config: &mut ScoutConfig) {
        if let Some(radius) = self.radius {
            config.search.radius_km = radius;
        }
        if let Some(max_lookups) = self.max_lookups {
            config.estimator.max_lookups = max_lookups;
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(radius) = self.radius {
            validate_radius("--radius", radius, MAX_RADIUS_KM)?;
        }
        if let Some(output) = &self.output {
            validate_output_path("--output", output)?;
        }
        Ok(())
    }
}
