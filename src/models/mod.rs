// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CommuneSummary, DensityClass, FeatureCollection, FeatureProperties, FilterRequest,
    MunicipalityRecord, PointFilter, ProximityFilter, ScoreWeights, ScoredFeature,
    DISPLAY_SRID, PROJECTED_SRID,
};
pub use requests::{GeoJsonQuery, SampleQuery, WeightBounds};
pub use responses::{CountResponse, ErrorResponse, HealthResponse, PingResponse, SampleResponse};
