pub mod aggregator;
pub mod date_inference;
pub mod geo;
pub mod link_parser;

pub use aggregator::{aggregate, AggregationRules};
pub use date_inference::{build_search_query, infer_completion_date, YearWindow};
pub use geo::haversine_km;
pub use link_parser::{extract_coordinates, normalize_link, ExtractionStrategy};
