use crate::models::{MunicipalityRecord, ScoreWeights};

/// Upper bound of the reported score
pub const SCORE_SCALE: f64 = 20.0;

/// Sunshine sub-score used when a commune has no sunshine data
pub const NEUTRAL_SUNSHINE: f64 = 0.5;

/// Calculate the composite score (0-20) of a commune
///
/// Scoring formula:
/// score = round(20 * sum(value_i * w_i) / sum(w_i), 2)
///
/// Health, commerce and association only count when the commune has a
/// value and the weight is positive; a missing value is skipped, not
/// treated as zero. Sunshine always counts when its weight is positive,
/// see [`sunshine_sub_score`]. A zero total weight scores 0.
pub fn calculate_composite_score(record: &MunicipalityRecord, weights: &ScoreWeights) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    let dimensions = [
        (record.health_score, weights.health),
        (record.commerce_scaled, weights.commerce),
        (record.association_scaled, weights.association),
        (
            Some(sunshine_sub_score(record.sunshine_scaled, weights.sunshine_preference)),
            weights.sunshine,
        ),
    ];

    for (value, weight) in dimensions {
        if let Some(value) = value {
            if weight > 0 {
                let weight = f64::from(weight);
                weighted_sum += value * weight;
                total_weight += weight;
            }
        }
    }

    let composite = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    round_to(composite * SCORE_SCALE, 2)
}

/// Sunshine sub-score (0-1)
///
/// With a preference the score is the closeness to it, `1 - |s - p|`
/// clamped to [0, 1], so a sunnier commune is not always better. Without
/// a preference the scaled value is used directly.
#[inline]
pub fn sunshine_sub_score(sunshine_scaled: Option<f64>, preference: Option<f64>) -> f64 {
    let Some(sunshine) = sunshine_scaled else {
        return NEUTRAL_SUNSHINE;
    };

    match preference {
        Some(preference) => (1.0 - (sunshine - preference).abs()).clamp(0.0, 1.0),
        None => sunshine,
    }
}

/// Round half away from zero to `decimals` places
#[inline]
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
