//! Position encoding
//!
//! Converts one participant's evaluation record into a fixed-dimension
//! numeric vector so that heterogeneous nested evaluations become
//! comparable points in one space.

use crate::evaluation::{AspectCatalog, EvaluationRecord, NEUTRAL_SCORE};
use serde::{Deserialize, Serialize};

/// A participant's stance across the canonical aspects.
///
/// Fixed length N (the catalog size), every element in `[0, 1]`,
/// unit-normalized unless degenerate. A vector is *degenerate* when the
/// source record yielded no valid value for any aspect; such a vector is
/// incomparable, including to itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionVector {
    values: Vec<f64>,
    degenerate: bool,
}

impl PositionVector {
    /// Wrap already-encoded values as a regular (comparable) vector
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            degenerate: false,
        }
    }

    /// Wrap values as a degenerate (incomparable) vector
    pub fn degenerate(values: Vec<f64>) -> Self {
        Self {
            values,
            degenerate: true,
        }
    }

    /// Vector dimension
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector has no dimensions
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The encoded elements
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether this vector came from a record with no usable data
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Whether this vector participates in similarity comparisons
    pub fn is_comparable(&self) -> bool {
        !self.degenerate && self.norm() > 0.0
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product with another vector of the same dimension
    pub fn dot(&self, other: &PositionVector) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Euclidean distance to another vector of the same dimension
    pub fn distance(&self, other: &PositionVector) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// The scalar stance a record takes on a single aspect.
///
/// Mean of the valid unit scores, or the neutral default when the aspect
/// is absent or yielded nothing usable. This is the one extraction rule
/// shared by position encoding and disagreement analysis.
pub fn aspect_scalar(record: &EvaluationRecord, aspect: &str) -> f64 {
    record.aspect_mean(aspect).unwrap_or(NEUTRAL_SCORE)
}

/// Encodes evaluation records into position vectors over a fixed catalog.
///
/// Pure and deterministic: the same record always encodes to the same
/// vector, and malformed input degrades to neutral defaults rather than
/// failing.
#[derive(Debug, Clone)]
pub struct PositionEncoder {
    catalog: AspectCatalog,
}

impl PositionEncoder {
    pub fn new(catalog: AspectCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this encoder measures against
    pub fn catalog(&self) -> &AspectCatalog {
        &self.catalog
    }

    /// Encode one record into a position vector.
    ///
    /// Aspects with no usable data fall back to the neutral default. When
    /// *every* aspect fell back, the raw all-default vector is returned
    /// marked degenerate; otherwise the vector is normalized to unit
    /// Euclidean length.
    pub fn encode(&self, record: &EvaluationRecord) -> PositionVector {
        let mut values = Vec::with_capacity(self.catalog.len());
        let mut observed = false;

        for aspect in self.catalog.iter() {
            match record.aspect_mean(aspect) {
                Some(mean) => {
                    observed = true;
                    values.push(mean);
                }
                None => values.push(NEUTRAL_SCORE),
            }
        }

        if !observed {
            return PositionVector::degenerate(values);
        }

        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut values {
                *v /= norm;
            }
        }
        PositionVector::new(values)
    }

    /// Encode a batch of records in order
    pub fn encode_all(&self, records: &[EvaluationRecord]) -> Vec<PositionVector> {
        records.iter().map(|r| self.encode(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoder() -> PositionEncoder {
        PositionEncoder::new(AspectCatalog::default())
    }

    #[test]
    fn test_encode_has_fixed_length_and_unit_range() {
        let record = EvaluationRecord::new("dean", 1)
            .with_aspect("academic_quality", json!({"rigor": 0.9}))
            .with_aspect("budget_analysis", json!([0.2, 0.4]));

        let vector = encoder().encode(&record);
        assert_eq!(vector.len(), 8);
        assert!(vector.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_encode_normalizes_to_unit_length() {
        let record =
            EvaluationRecord::new("dean", 1).with_aspect("academic_quality", json!(0.9));
        let vector = encoder().encode(&record);
        assert!((vector.norm() - 1.0).abs() < 1e-9);
        assert!(!vector.is_degenerate());
    }

    #[test]
    fn test_empty_record_is_degenerate_all_neutral() {
        let vector = encoder().encode(&EvaluationRecord::new("ghost", 1));
        assert!(vector.is_degenerate());
        assert!(!vector.is_comparable());
        assert!(vector.values().iter().all(|v| *v == NEUTRAL_SCORE));
    }

    #[test]
    fn test_out_of_range_only_payload_is_degenerate() {
        let record =
            EvaluationRecord::new("ghost", 1).with_aspect("budget_analysis", json!([2.0, -1.0]));
        assert!(encoder().encode(&record).is_degenerate());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let record = EvaluationRecord::new("dean", 1)
            .with_aspect("academic_quality", json!({"a": 0.7, "b": 0.3}));
        let e = encoder();
        assert_eq!(e.encode(&record), e.encode(&record));
    }

    #[test]
    fn test_aspect_scalar_falls_back_to_neutral() {
        let record =
            EvaluationRecord::new("dean", 1).with_aspect("academic_quality", json!(0.8));
        assert!((aspect_scalar(&record, "academic_quality") - 0.8).abs() < 1e-12);
        assert_eq!(aspect_scalar(&record, "budget_analysis"), NEUTRAL_SCORE);
    }

    #[test]
    fn test_distance_and_dot() {
        let a = PositionVector::new(vec![1.0, 0.0]);
        let b = PositionVector::new(vec![0.0, 1.0]);
        assert_eq!(a.dot(&b), 0.0);
        assert!((a.distance(&b) - 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
