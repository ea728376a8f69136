pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::LocalStorage;
pub use crate::app::pipelines::{HttpSiteSearchPipeline, SiteSearchPipeline};
pub use crate::config::ScoutConfig;
pub use crate::core::engine::ScoutEngine;
pub use crate::domain::model::{Candidate, CompletionEstimate, GeoPoint, Project, SearchSession};
pub use crate::utils::error::{Result, ScoutError};
