use crate::models::DensityClass;

/// Accepted request labels, lower-case
const DENSITY_LABELS: [(&str, DensityClass); 5] = [
    ("village", DensityClass::Village),
    ("bourg", DensityClass::Bourg),
    ("ville", DensityClass::Ville),
    ("grande_ville", DensityClass::GrandeVille),
    ("grande ville", DensityClass::GrandeVille),
];

/// Map a user-supplied density label onto its catalogue class
///
/// Matching ignores case and surrounding whitespace. `None` means the label
/// is unknown; callers must turn that into a filter excluding every commune
/// rather than dropping the filter.
pub fn canonicalize_density(label: &str) -> Option<DensityClass> {
    let normalized = label.trim().to_lowercase();

    DENSITY_LABELS
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, class)| *class)
}
