pub mod engine;

pub use crate::domain::model::{Candidate, GeoPoint, Project, SearchSession};
pub use crate::domain::ports::{CompletionLookup, FeatureSource, LinkResolver, SearchPipeline, Storage};
pub use crate::utils::error::Result;
pub use engine::ScoutEngine;
