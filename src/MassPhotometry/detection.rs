//! Detection-limit censoring.

/// Drops every mass strictly below `detection_limit` (kDa), keeping the order of the rest.
pub fn apply_detection_limit(masses: Vec<f64>, detection_limit: f64) -> Vec<f64> {
    let mut masses = masses;
    masses.retain(|&m| m >= detection_limit);
    masses
}
