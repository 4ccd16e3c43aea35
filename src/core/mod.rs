// Core algorithm exports
pub mod density;
pub mod engine;
pub mod filters;
pub mod scoring;

pub use density::canonicalize_density;
pub use engine::{score_record, Engine, EngineError, QueryResult};
pub use filters::{
    plan_filters, point_radius_predicate, price_range, proximity_predicate, FilterDefaults,
    FilterPlan, PointRadius, Predicate, PriceRange,
};
pub use scoring::{calculate_composite_score, sunshine_sub_score};
