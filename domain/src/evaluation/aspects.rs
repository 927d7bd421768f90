//! Canonical aspect catalog

use serde::{Deserialize, Serialize};

/// The fixed, ordered list of canonical evaluation aspects.
///
/// Configured once per deployment. The catalog determines the dimension
/// and ordering of every position vector, so it must stay unchanged for
/// the lifetime of a discussion session; vectors encoded against
/// different catalogs are not comparable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectCatalog {
    aspects: Vec<String>,
}

impl AspectCatalog {
    /// Create a catalog from an ordered list of aspect names
    pub fn new(aspects: Vec<String>) -> Self {
        Self { aspects }
    }

    /// Number of canonical aspects (the position vector dimension)
    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    /// Iterate over aspect names in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.aspects.iter().map(String::as_str)
    }

    /// Aspect names in canonical order
    pub fn names(&self) -> &[String] {
        &self.aspects
    }

    /// Index of an aspect in the canonical ordering
    pub fn position(&self, name: &str) -> Option<usize> {
        self.aspects.iter().position(|a| a == name)
    }

    /// Whether the catalog contains the named aspect
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

impl Default for AspectCatalog {
    /// The standard board-review catalog: one aspect per area of concern
    /// a full board covers.
    fn default() -> Self {
        Self::new(
            [
                "academic_quality",
                "budget_analysis",
                "research_potential",
                "innovation_impact",
                "infrastructure_impact",
                "student_experience",
                "community_impact",
                "sustainability_impact",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }
}

impl FromIterator<String> for AspectCatalog {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
