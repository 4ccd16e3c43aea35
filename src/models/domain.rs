use serde::{Deserialize, Serialize};

/// EPSG code of the geographic CRS used for rendering (WGS84)
pub const DISPLAY_SRID: i32 = 4326;

/// EPSG code of the projected CRS used for metric distances (Lambert-93)
pub const PROJECTED_SRID: i32 = 2154;

/// Population-density classification of a commune
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DensityClass {
    #[serde(rename = "Village")]
    Village,
    #[serde(rename = "Bourg")]
    Bourg,
    #[serde(rename = "Ville")]
    Ville,
    #[serde(rename = "Grande Ville")]
    GrandeVille,
}

impl DensityClass {
    /// Label stored in the catalogue and shown to users
    pub fn display_label(&self) -> &'static str {
        match self {
            DensityClass::Village => "Village",
            DensityClass::Bourg => "Bourg",
            DensityClass::Ville => "Ville",
            DensityClass::GrandeVille => "Grande Ville",
        }
    }

    /// Parse the display label as stored in the `densite_cat` column
    pub fn from_display_label(label: &str) -> Option<Self> {
        match label {
            "Village" => Some(DensityClass::Village),
            "Bourg" => Some(DensityClass::Bourg),
            "Ville" => Some(DensityClass::Ville),
            "Grande Ville" => Some(DensityClass::GrandeVille),
            _ => None,
        }
    }
}

/// One commune of the catalogue with its precomputed indicators
///
/// Every `*_scaled` field is expected in [0, 1] when present. Values are
/// passed through as-is, nothing here clamps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityRecord {
    pub insee: String,
    pub name: String,
    pub department_code: Option<String>,
    pub price_per_m2: Option<f64>,
    pub density: Option<DensityClass>,
    pub health_score: Option<f64>,
    pub commerce_scaled: Option<f64>,
    pub association_scaled: Option<f64>,
    pub temperature_scaled: Option<f64>,
    pub sunshine_scaled: Option<f64>,
    pub sunshine_raw: Option<f64>,
    #[serde(default)]
    pub coastal: Option<bool>,
    pub sea_distance_km: Option<f64>,
    #[serde(default)]
    pub mountainous: Option<bool>,
    pub mountain_distance_km: Option<f64>,
    /// Polygon in the display CRS, GeoJSON-encoded by the store
    #[serde(default)]
    pub geometry: Option<String>,
}

impl MunicipalityRecord {
    /// Helper to get the sea flag as a bool, defaulting to false
    pub fn is_coastal(&self) -> bool {
        self.coastal.unwrap_or(false)
    }

    /// Helper to get the mountain flag as a bool, defaulting to false
    pub fn is_mountainous(&self) -> bool {
        self.mountainous.unwrap_or(false)
    }
}

/// Light projection of a commune used by the sample endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuneSummary {
    #[serde(rename = "insee")]
    pub insee: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "code_departement")]
    pub department_code: Option<String>,
    #[serde(rename = "prix_m2")]
    pub price_per_m2: Option<f64>,
    #[serde(rename = "densite")]
    pub density: Option<DensityClass>,
    #[serde(rename = "score_sante")]
    pub health_score: Option<f64>,
}

/// Proximity filter on one axis (sea or mountain)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProximityFilter {
    pub enabled: Option<bool>,
    pub radius_km: Option<f64>,
}

/// Arbitrary point + radius filter, inactive unless all three are set
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointFilter {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
}

/// Typed filter request handed to the engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterRequest {
    pub density: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub sea: ProximityFilter,
    pub mountain: ProximityFilter,
    pub point: PointFilter,
    pub limit: Option<usize>,
}

/// Per-request scoring weights and sunshine preference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub health: i32,
    pub commerce: i32,
    pub association: i32,
    pub sunshine: i32,
    /// Desired sunshine level in [0, 1]
    pub sunshine_preference: Option<f64>,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            health: 1,
            commerce: 1,
            association: 1,
            sunshine: 3,
            sunshine_preference: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    FeatureCollection,
}

/// Flat property bag of a scored commune
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(rename = "insee")]
    pub insee: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "code_departement")]
    pub department_code: Option<String>,
    #[serde(rename = "score_global")]
    pub score: f64,
    #[serde(rename = "prix_m2")]
    pub price_per_m2: Option<f64>,
    #[serde(rename = "densite")]
    pub density: Option<DensityClass>,
    #[serde(rename = "score_sante")]
    pub health_score: Option<f64>,
    #[serde(rename = "mag_scaled")]
    pub commerce_scaled: Option<f64>,
    #[serde(rename = "asso_scaled")]
    pub association_scaled: Option<f64>,
    #[serde(rename = "temp_scaled")]
    pub temperature_scaled: Option<f64>,
    #[serde(rename = "sun_scaled")]
    pub sunshine_scaled: Option<f64>,
    #[serde(rename = "sun_raw")]
    pub sunshine_raw: Option<f64>,
    #[serde(rename = "littoral")]
    pub coastal: bool,
    #[serde(rename = "montagne")]
    pub mountainous: bool,
    #[serde(rename = "distance_mer_km")]
    pub sea_distance_km: Option<f64>,
    #[serde(rename = "distance_montagne_km")]
    pub mountain_distance_km: Option<f64>,
}

/// Scored commune as a GeoJSON feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFeature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: Option<serde_json::Value>,
    pub properties: FeatureProperties,
}

/// GeoJSON feature collection returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: FeatureCollectionType,
    pub features: Vec<ScoredFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<ScoredFeature>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}
