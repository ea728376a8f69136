pub mod site_search;

pub use site_search::{HttpSiteSearchPipeline, SiteSearchPipeline};
