use crate::error::{MatchError, Result};

/// Cosine similarity between two embeddings, in `[-1, 1]`.
///
/// Returns `0.0` when either vector has zero magnitude. Vectors of different
/// length, or containing NaN/infinite components, are rejected: they can only
/// come from mixing embedding models and are never silently corrected.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if !x.is_finite() || !y.is_finite() {
            return Err(MatchError::InvalidInput(format!(
                "non-finite component at index {i}"
            )));
        }
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
