//! Proposal value object

use serde::{Deserialize, Serialize};

/// A decision proposal placed before the board (Value Object)
///
/// The engine never interprets the proposal text; it is passed verbatim to
/// the evaluator collaborators and carried along for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    title: String,
    description: String,
}

impl Proposal {
    /// Create a new proposal
    ///
    /// # Panics
    /// Panics if the title is empty or only whitespace
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let title = title.into();
        assert!(!title.trim().is_empty(), "Proposal title cannot be empty");
        Self {
            title,
            description: description.into(),
        }
    }

    /// Try to create a new proposal, returning None if the title is blank
    pub fn try_new(title: impl Into<String>, description: impl Into<String>) -> Option<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            None
        } else {
            Some(Self {
                title,
                description: description.into(),
            })
        }
    }

    /// Get the proposal title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the proposal description
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Display for Proposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}
