use geo::Point;
use crate::core::density::canonicalize_density;
use crate::models::{DensityClass, FilterRequest, MunicipalityRecord, DISPLAY_SRID, PROJECTED_SRID};

/// Radius applied to an enabled sea/mountain filter without explicit radius
pub const DEFAULT_PROXIMITY_RADIUS_KM: f64 = 10.0;

/// Result cap used when the request does not set one
pub const DEFAULT_RESULT_LIMIT: usize = 5000;

/// Planner defaults, loaded once at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDefaults {
    pub proximity_radius_km: f64,
    pub result_limit: usize,
    pub max_result_limit: usize,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            proximity_radius_km: DEFAULT_PROXIMITY_RADIUS_KM,
            result_limit: DEFAULT_RESULT_LIMIT,
            max_result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Distance-from-point predicate, evaluated by the spatial store
///
/// The point is held as `x = longitude`, `y = latitude` in the display CRS;
/// the store transforms it to the projected CRS before comparing against
/// the commune polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRadius {
    pub point: Point<f64>,
    pub radius_m: f64,
    pub source_srid: i32,
    pub target_srid: i32,
}

impl PointRadius {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            point: Point::new(longitude, latitude),
            radius_m: radius_km * 1000.0,
            source_srid: DISPLAY_SRID,
            target_srid: PROJECTED_SRID,
        }
    }

    /// Arguments for a `ST_MakePoint(x, y)` call, in that order
    pub fn make_point_args(&self) -> [f64; 2] {
        [self.point.x(), self.point.y()]
    }
}

/// Inclusive price bounds, each optional
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// A single condition the store must apply
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    /// Excludes every commune (unknown density label)
    MatchNone,
    DensityEquals(DensityClass),
    PriceAtLeast(f64),
    PriceAtMost(f64),
    SeaWithin { threshold_km: f64 },
    MountainWithin { threshold_km: f64 },
    PointWithin(PointRadius),
}

impl Predicate {
    /// Evaluate against a record's attributes
    ///
    /// Returns `None` for spatial predicates, which only the store can
    /// evaluate. Missing values never satisfy a comparison, as in SQL.
    pub fn evaluate(&self, record: &MunicipalityRecord) -> Option<bool> {
        match self {
            Predicate::MatchNone => Some(false),
            Predicate::DensityEquals(class) => Some(record.density == Some(*class)),
            Predicate::PriceAtLeast(min) => Some(record.price_per_m2.is_some_and(|p| p >= *min)),
            Predicate::PriceAtMost(max) => Some(record.price_per_m2.is_some_and(|p| p <= *max)),
            Predicate::SeaWithin { threshold_km } => {
                Some(record.sea_distance_km.is_some_and(|d| d <= *threshold_km))
            }
            Predicate::MountainWithin { threshold_km } => {
                Some(record.mountain_distance_km.is_some_and(|d| d <= *threshold_km))
            }
            Predicate::PointWithin(_) => None,
        }
    }

    pub fn is_spatial(&self) -> bool {
        matches!(self, Predicate::PointWithin(_))
    }
}

/// Conjunction of predicates plus the result cap
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    pub predicates: Vec<Predicate>,
    pub limit: usize,
}

impl FilterPlan {
    /// True when the plan can never yield a commune
    pub fn matches_nothing(&self) -> bool {
        self.predicates.contains(&Predicate::MatchNone)
    }

    pub fn has_spatial_predicates(&self) -> bool {
        self.predicates.iter().any(Predicate::is_spatial)
    }

    /// Check every attribute predicate; `None` if a spatial one is present
    pub fn admits(&self, record: &MunicipalityRecord) -> Option<bool> {
        let mut admitted = true;
        for predicate in &self.predicates {
            admitted &= predicate.evaluate(record)?;
        }
        Some(admitted)
    }
}

/// Threshold of an active sea/mountain filter
///
/// Only an explicit `true` activates the filter. `false` is neutral and
/// never excludes communes near the sea or mountains.
#[inline]
pub fn proximity_predicate(
    enabled: Option<bool>,
    radius_km: Option<f64>,
    default_radius_km: f64,
) -> Option<f64> {
    match enabled {
        Some(true) => Some(radius_km.unwrap_or(default_radius_km)),
        _ => None,
    }
}

/// Point filter, active only when latitude, longitude and radius are all set
#[inline]
pub fn point_radius_predicate(
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius_km: Option<f64>,
) -> Option<PointRadius> {
    match (latitude, longitude, radius_km) {
        (Some(lat), Some(lon), Some(radius)) => Some(PointRadius::new(lat, lon, radius)),
        _ => None,
    }
}

#[inline]
pub fn price_range(min: Option<f64>, max: Option<f64>) -> PriceRange {
    PriceRange {
        lower: min,
        upper: max,
    }
}

/// Translate a filter request into the predicate set sent to the store
///
/// All active predicates are ANDed. An unknown density label short-circuits
/// to a plan that matches nothing.
pub fn plan_filters(request: &FilterRequest, defaults: &FilterDefaults) -> FilterPlan {
    let limit = request
        .limit
        .unwrap_or(defaults.result_limit)
        .min(defaults.max_result_limit);
    let mut predicates = Vec::new();

    if let Some(label) = request.density.as_deref() {
        match canonicalize_density(label) {
            Some(class) => predicates.push(Predicate::DensityEquals(class)),
            None => {
                tracing::debug!("Unknown density label {:?}, plan matches nothing", label);
                return FilterPlan {
                    predicates: vec![Predicate::MatchNone],
                    limit,
                };
            }
        }
    }

    let prices = price_range(request.price_min, request.price_max);
    if let Some(lower) = prices.lower {
        predicates.push(Predicate::PriceAtLeast(lower));
    }
    if let Some(upper) = prices.upper {
        predicates.push(Predicate::PriceAtMost(upper));
    }

    if let Some(threshold_km) = proximity_predicate(
        request.sea.enabled,
        request.sea.radius_km,
        defaults.proximity_radius_km,
    ) {
        predicates.push(Predicate::SeaWithin { threshold_km });
    }

    if let Some(threshold_km) = proximity_predicate(
        request.mountain.enabled,
        request.mountain.radius_km,
        defaults.proximity_radius_km,
    ) {
        predicates.push(Predicate::MountainWithin { threshold_km });
    }

    if let Some(point) = point_radius_predicate(
        request.point.latitude,
        request.point.longitude,
        request.point.radius_km,
    ) {
        predicates.push(Predicate::PointWithin(point));
    }

    FilterPlan { predicates, limit }
}
