//! Consensus scoring
//!
//! Blends three views of how far apart a round's positions are: direct
//! pairwise agreement, closeness to the group centroid, and per-dimension
//! convergence. The blend weights default to 0.4 / 0.4 / 0.2.

use super::encoder::PositionVector;
use super::similarity::SimilarityMatrix;
use super::stats;
use serde::{Deserialize, Serialize};

/// Blend weights for the three consensus components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub agreement: f64,
    pub centroid: f64,
    pub convergence: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            agreement: 0.4,
            centroid: 0.4,
            convergence: 0.2,
        }
    }
}

/// Combines pairwise similarity into one scalar consensus measure.
///
/// The score is always in `[0, 1]`; empty input scores 0.0 and the
/// computation never fails.
#[derive(Debug, Clone, Default)]
pub struct ConsensusScorer {
    weights: ScoreWeights,
}

impl ConsensusScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Overall consensus score for one round's positions
    pub fn score(&self, vectors: &[PositionVector]) -> f64 {
        if vectors.is_empty() {
            return 0.0;
        }
        let w = self.weights;
        let blended = w.agreement * Self::agreement(vectors)
            + w.centroid * Self::centroid_similarity(vectors)
            + w.convergence * Self::convergence(vectors);
        blended.clamp(0.0, 1.0)
    }

    /// Mean off-diagonal pairwise similarity. 0.0 for fewer than two
    /// participants.
    pub fn agreement(vectors: &[PositionVector]) -> f64 {
        SimilarityMatrix::from_vectors(vectors).mean_off_diagonal()
    }

    /// Mean similarity to the elementwise-mean centroid.
    ///
    /// Each position's distance to the centroid is scaled by the largest
    /// such distance; when every position sits on the centroid, all
    /// similarities are 1.0.
    pub fn centroid_similarity(vectors: &[PositionVector]) -> f64 {
        if vectors.is_empty() {
            return 0.0;
        }
        let centroid = Self::centroid(vectors);
        let distances: Vec<f64> = vectors.iter().map(|v| v.distance(&centroid)).collect();
        let max_distance = distances.iter().copied().fold(0.0_f64, f64::max);
        if max_distance <= 0.0 {
            return 1.0;
        }
        stats::mean(
            &distances
                .iter()
                .map(|d| 1.0 - d / max_distance)
                .collect::<Vec<_>>(),
        )
    }

    /// Dimension-wise convergence: 1 minus the mean per-dimension
    /// population variance (capped at 1).
    pub fn convergence(vectors: &[PositionVector]) -> f64 {
        if vectors.is_empty() {
            return 0.0;
        }
        let dims = vectors[0].len();
        if dims == 0 {
            return 1.0;
        }
        let mut variances = Vec::with_capacity(dims);
        for d in 0..dims {
            let column: Vec<f64> = vectors.iter().map(|v| v.values()[d]).collect();
            variances.push(stats::variance(&column));
        }
        1.0 - stats::mean(&variances).min(1.0)
    }

    fn centroid(vectors: &[PositionVector]) -> PositionVector {
        let dims = vectors[0].len();
        let mut values = vec![0.0; dims];
        for vector in vectors {
            for (acc, v) in values.iter_mut().zip(vector.values()) {
                *acc += v;
            }
        }
        for v in &mut values {
            *v /= vectors.len() as f64;
        }
        PositionVector::new(values)
    }
}
