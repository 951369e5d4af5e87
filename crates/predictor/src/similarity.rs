//! Cosine similarity between item rating vectors.

/// Cosine of the angle between two equal-length rating vectors.
///
/// Returns `0.0` when either vector has zero magnitude, i.e. nobody rated
/// that item (or every rating recorded for it is `0.0`).
///
/// Both vectors must have the same length. Vectors coming out of one
/// `RatingIndex` always do.
pub fn cosine_similarity(v1: &[f64], v2: &[f64]) -> f64 {
    debug_assert_eq!(v1.len(), v2.len(), "item vectors must have equal length");

    let (dot, mag1, mag2) = v1
        .iter()
        .zip(v2)
        .fold((0.0, 0.0, 0.0), |(dot, mag1, mag2), (&a, &b)| {
            (dot + a * b, mag1 + a * a, mag2 + b * b)
        });

    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }
    dot / (mag1.sqrt() * mag2.sqrt())
}
