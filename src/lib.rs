//! Retraite Algo - commune filtering and scoring service
//!
//! This library filters the French commune catalogue on density, price and
//! distance criteria, and scores each commune on a 0-20 scale from
//! user-weighted health, commerce, association and sunshine indicators.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_composite_score, canonicalize_density, plan_filters, Engine, FilterPlan};
pub use models::{FeatureCollection, FilterRequest, MunicipalityRecord, ScoreWeights, ScoredFeature};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let plan = plan_filters(&FilterRequest::default(), &core::FilterDefaults::default());
        assert!(plan.predicates.is_empty());
        assert!(canonicalize_density("bourg").is_some());
    }
}
