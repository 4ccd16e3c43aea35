use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};
use crate::models::domain::{FilterRequest, PointFilter, ProximityFilter, ScoreWeights};

/// Query string of the geojson endpoint
///
/// Parameter names follow the map frontend (`?littoral=1&rayon_km=20&w_sante=2`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_finite_numbers"))]
pub struct GeoJsonQuery {
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub littoral: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub montagne: Option<bool>,
    /// Shared radius for the sea, mountain and point filters
    #[validate(range(min = 0.0, max = 200.0))]
    pub rayon_km: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: Option<f64>,
    pub densite: Option<String>,
    #[validate(range(min = 0.0))]
    pub prix_min: Option<f64>,
    #[validate(range(min = 0.0))]
    pub prix_max: Option<f64>,
    pub w_sante: Option<i32>,
    pub w_mag: Option<i32>,
    pub w_asso: Option<i32>,
    pub w_sun: Option<i32>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub sun_pref: Option<f64>,
}

/// `NaN` and infinities parse as `f64` but slip through range checks
fn validate_finite_numbers(query: &GeoJsonQuery) -> Result<(), ValidationError> {
    let numbers = [
        ("rayon_km", query.rayon_km),
        ("lat", query.lat),
        ("lon", query.lon),
        ("prix_min", query.prix_min),
        ("prix_max", query.prix_max),
        ("sun_pref", query.sun_pref),
    ];

    for (name, value) in numbers {
        if value.is_some_and(|v| !v.is_finite()) {
            let mut error = ValidationError::new("non_finite");
            error.message = Some(Cow::Owned(format!("{} must be a finite number", name)));
            return Err(error);
        }
    }
    Ok(())
}

/// Inclusive bounds applied to request weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for WeightBounds {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}

impl GeoJsonQuery {
    /// Build the engine-facing filter request
    pub fn filter_request(&self) -> FilterRequest {
        FilterRequest {
            density: self.densite.clone(),
            price_min: self.prix_min,
            price_max: self.prix_max,
            sea: ProximityFilter {
                enabled: self.littoral,
                radius_km: self.rayon_km,
            },
            mountain: ProximityFilter {
                enabled: self.montagne,
                radius_km: self.rayon_km,
            },
            point: PointFilter {
                latitude: self.lat,
                longitude: self.lon,
                radius_km: self.rayon_km,
            },
            limit: self.limit,
        }
    }

    /// Resolve weights against configured defaults and check their bounds
    pub fn score_weights(
        &self,
        defaults: &ScoreWeights,
        bounds: WeightBounds,
    ) -> Result<ScoreWeights, String> {
        let pick = |name: &str, value: Option<i32>, default: i32| -> Result<i32, String> {
            let weight = value.unwrap_or(default);
            if weight < bounds.min || weight > bounds.max {
                return Err(format!(
                    "{} must be between {} and {}, got {}",
                    name, bounds.min, bounds.max, weight
                ));
            }
            Ok(weight)
        };

        Ok(ScoreWeights {
            health: pick("w_sante", self.w_sante, defaults.health)?,
            commerce: pick("w_mag", self.w_mag, defaults.commerce)?,
            association: pick("w_asso", self.w_asso, defaults.association)?,
            sunshine: pick("w_sun", self.w_sun, defaults.sunshine)?,
            sunshine_preference: self.sun_pref.or(defaults.sunshine_preference),
        })
    }
}

/// Query string of the sample endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SampleQuery {
    #[serde(default = "default_sample_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u16,
}

fn default_sample_limit() -> u16 {
    10
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`; an empty value means absent
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean flag: {}",
                other
            ))),
        },
    }
}
