// Adapters layer: concrete implementations of the domain ports (http, storage).

pub mod http;
pub mod link_resolver;
pub mod overpass;
pub mod storage;
pub mod web_search;

pub use link_resolver::HttpLinkResolver;
pub use overpass::OverpassClient;
pub use storage::LocalStorage;
pub use web_search::WebSearchEstimator;
