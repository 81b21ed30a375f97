//! This is the vector math module
//! Provide L2 normalization and L2 (Euclidean) distance

use crate::error::{CatalogError, CatalogResult};

/// L2 Normalization
/// norm_vec = vec / ||vec||
/// Zero vector cannot be normalized
pub fn l2_norm(vector: &[f32]) -> CatalogResult<Vec<f32>> {
    if vector.is_empty() {
        return Err(CatalogError::InvalidInput("Cannot normalize an empty vector".to_string()));
    }

    let norm = vector.iter()
        .map(|x| x * x)
        .sum::<f32>()
        .sqrt();

    if norm == 0.0 {
        return Err(CatalogError::InvalidInput("Cannot normalize a zero vector".to_string()));
    }

    let normed_vec = vector.iter()
        .map(|x| x / norm)
        .collect();

    Ok(normed_vec)
}

/// Squared L2 distance
/// dist = sum((a[i] - b[i])^2) for i = 0..a.len()
/// Ordering by squared distance equals ordering by distance, so search skips the sqrt
pub fn l2_distance_squared(left: &[f32], right: &[f32]) -> CatalogResult<f32> {
    if left.len() != right.len() {
        return Err(CatalogError::DimensionMismatch { expected: left.len(), actual: right.len() });
    }

    let dist = left.iter()
        .zip(right.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();

    Ok(dist)
}

/// L2 distance
/// dist = sqrt(sum((a[i] - b[i])^2))
pub fn l2_distance(left: &[f32], right: &[f32]) -> CatalogResult<f32> {
    l2_distance_squared(left, right).map(f32::sqrt)
}
