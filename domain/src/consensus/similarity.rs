//! Pairwise similarity
//!
//! Computes the symmetric matrix of cosine similarities between encoded
//! positions. Degenerate vectors are incomparable by convention: their
//! similarity is 0.0 against everything, themselves included.

use super::encoder::PositionVector;
use serde::{Deserialize, Serialize};

/// Cosine similarity between two positions.
///
/// Defined as 0.0 when either operand is degenerate or has zero norm.
pub fn cosine(a: &PositionVector, b: &PositionVector) -> f64 {
    if !a.is_comparable() || !b.is_comparable() {
        return 0.0;
    }
    a.dot(b) / (a.norm() * b.norm())
}

/// Symmetric P×P matrix of pairwise position similarities.
///
/// The diagonal is 1.0 for comparable vectors and 0.0 for degenerate
/// ones. Cost is O(P²·N); the computation has no side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute the pairwise similarity matrix for a set of positions
    pub fn from_vectors(vectors: &[PositionVector]) -> Self {
        let size = vectors.len();
        let mut matrix = Self {
            size,
            data: vec![0.0; size * size],
        };

        for i in 0..size {
            matrix.set(i, i, if vectors[i].is_comparable() { 1.0 } else { 0.0 });
            for j in (i + 1)..size {
                let s = cosine(&vectors[i], &vectors[j]);
                matrix.set(i, j, s);
                matrix.set(j, i, s);
            }
        }
        matrix
    }

    /// Number of participants (matrix is size × size)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Similarity between participants `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.size + j] = value;
    }

    /// Mean of all off-diagonal entries (direct pairwise agreement).
    /// 0.0 when fewer than two participants.
    pub fn mean_off_diagonal(&self) -> f64 {
        if self.size < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                sum += self.get(i, j);
                count += 1;
            }
        }
        sum / count as f64
    }

    /// Mean pairwise similarity among a subset of participants.
    /// 0.0 when the subset has no pairs.
    pub fn mean_among(&self, indices: &[usize]) -> f64 {
        if indices.len() < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for (k, &i) in indices.iter().enumerate() {
            for &j in &indices[(k + 1)..] {
                sum += self.get(i, j);
                count += 1;
            }
        }
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(values: Vec<f64>) -> PositionVector {
        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        PositionVector::new(values.into_iter().map(|v| v / norm).collect())
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let vectors = vec![
            unit(vec![0.9, 0.1, 0.3]),
            unit(vec![0.2, 0.8, 0.1]),
            unit(vec![0.5, 0.5, 0.5]),
        ];
        let matrix = SimilarityMatrix::from_vectors(&vectors);

        for i in 0..3 {
            assert!((matrix.get(i, i) - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_identical_vectors_have_similarity_one() {
        let a = unit(vec![0.4, 0.6]);
        let b = a.clone();
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal_vectors_have_similarity_zero() {
        let a = PositionVector::new(vec![1.0, 0.0]);
        let b = PositionVector::new(vec![0.0, 1.0]);
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn test_degenerate_vector_is_incomparable_even_to_itself() {
        let d = PositionVector::degenerate(vec![0.5, 0.5]);
        let regular = unit(vec![0.5, 0.5]);

        assert_eq!(cosine(&d, &d), 0.0);
        assert_eq!(cosine(&d, &regular), 0.0);

        let matrix = SimilarityMatrix::from_vectors(&[d, regular]);
        assert_eq!(matrix.get(0, 0), 0.0);
        assert!((matrix.get(1, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_norm_vector_is_incomparable() {
        let zero = PositionVector::new(vec![0.0, 0.0]);
        let one = PositionVector::new(vec![1.0, 0.0]);
        assert_eq!(cosine(&zero, &one), 0.0);
        assert_eq!(cosine(&zero, &zero), 0.0);
    }

    #[test]
    fn test_mean_off_diagonal() {
        let vectors = vec![unit(vec![1.0, 0.0]), unit(vec![1.0, 0.0]), unit(vec![0.0, 1.0])];
        let matrix = SimilarityMatrix::from_vectors(&vectors);
        // pairs: (0,1)=1, (0,2)=0, (1,2)=0
        assert!((matrix.mean_off_diagonal() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(SimilarityMatrix::from_vectors(&[]).mean_off_diagonal(), 0.0);
    }

    #[test]
    fn test_mean_among_subset() {
        let vectors = vec![unit(vec![1.0, 0.0]), unit(vec![1.0, 0.0]), unit(vec![0.0, 1.0])];
        let matrix = SimilarityMatrix::from_vectors(&vectors);
        assert!((matrix.mean_among(&[0, 1]) - 1.0).abs() < 1e-12);
        assert_eq!(matrix.mean_among(&[2]), 0.0);
    }
}
