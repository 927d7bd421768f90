//! Vote types for board decisions
//!
//! This module defines the categorical voting primitives. Rationale text
//! is carried verbatim for the minutes and never analyzed.

use serde::{Deserialize, Serialize};

/// Categorical decision a participant can cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    /// In favour of the proposal
    Support,
    /// Against the proposal
    Oppose,
    /// Deliberately taking no side
    Abstain,
}

impl VoteChoice {
    /// All choices in a fixed, deterministic order
    pub const ALL: [VoteChoice; 3] = [VoteChoice::Support, VoteChoice::Oppose, VoteChoice::Abstain];

    /// Lowercase label as used in records and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Support => "support",
            VoteChoice::Oppose => "oppose",
            VoteChoice::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = String;

    /// Parse a choice, accepting the common synonyms evaluators produce
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "support" | "approve" | "yes" => Ok(VoteChoice::Support),
            "oppose" | "reject" | "no" => Ok(VoteChoice::Oppose),
            "abstain" => Ok(VoteChoice::Abstain),
            other => Err(format!(
                "Unknown vote choice: {}. Valid: support, oppose, abstain",
                other
            )),
        }
    }
}

/// A single categorical vote with its free-text rationale
///
/// # Example
///
/// ```
/// use consilium_domain::evaluation::VoteRecord;
///
/// let vote = VoteRecord::support("academic_affairs", "Strengthens the core curriculum");
/// assert!(vote.is_support());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Participant identifier, matching the evaluation record
    pub participant: String,
    /// The categorical decision
    pub choice: VoteChoice,
    /// Opaque rationale text (kept for the minutes, never analyzed)
    pub rationale: String,
}

impl VoteRecord {
    /// Create a new vote
    pub fn new(
        participant: impl Into<String>,
        choice: VoteChoice,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            participant: participant.into(),
            choice,
            rationale: rationale.into(),
        }
    }

    /// Create a supporting vote
    pub fn support(participant: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self::new(participant, VoteChoice::Support, rationale)
    }

    /// Create an opposing vote
    pub fn oppose(participant: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self::new(participant, VoteChoice::Oppose, rationale)
    }

    /// Create an abstention
    pub fn abstain(participant: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self::new(participant, VoteChoice::Abstain, rationale)
    }

    /// Whether this vote supports the proposal
    pub fn is_support(&self) -> bool {
        self.choice == VoteChoice::Support
    }
}

/// Raw (unweighted) per-choice vote counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub support: usize,
    pub oppose: usize,
    pub abstain: usize,
}

impl VoteTally {
    /// Count the choices in a set of votes
    pub fn from_votes(votes: &[VoteRecord]) -> Self {
        let mut tally = Self::default();
        for vote in votes {
            match vote.choice {
                VoteChoice::Support => tally.support += 1,
                VoteChoice::Oppose => tally.oppose += 1,
                VoteChoice::Abstain => tally.abstain += 1,
            }
        }
        tally
    }

    /// Total number of votes counted
    pub fn total(&self) -> usize {
        self.support + self.oppose + self.abstain
    }

    /// Whether every counted vote fell on a single choice
    pub fn is_unanimous(&self) -> bool {
        let total = self.total();
        total > 0 && (self.support == total || self.oppose == total || self.abstain == total)
    }

    /// Generate a visual tally summary (e.g., "[●●○◐]")
    pub fn summary(votes: &[VoteRecord]) -> String {
        let mut summary = String::from("[");
        for vote in votes {
            summary.push(match vote.choice {
                VoteChoice::Support => '●',
                VoteChoice::Oppose => '○',
                VoteChoice::Abstain => '◐',
            });
        }
        summary.push(']');
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_constructors() {
        let vote = VoteRecord::oppose("financial", "Budget risk too high");
        assert_eq!(vote.choice, VoteChoice::Oppose);
        assert_eq!(vote.participant, "financial");
        assert!(!vote.is_support());
    }

    #[test]
    fn test_choice_parse_synonyms() {
        assert_eq!("support".parse::<VoteChoice>().ok(), Some(VoteChoice::Support));
        assert_eq!("Approve".parse::<VoteChoice>().ok(), Some(VoteChoice::Support));
        assert_eq!("reject".parse::<VoteChoice>().ok(), Some(VoteChoice::Oppose));
        assert_eq!("abstain".parse::<VoteChoice>().ok(), Some(VoteChoice::Abstain));
        assert!("maybe".parse::<VoteChoice>().is_err());
    }

    #[test]
    fn test_choice_display() {
        assert_eq!(VoteChoice::Support.to_string(), "support");
        assert_eq!(VoteChoice::Abstain.to_string(), "abstain");
    }

    #[test]
    fn test_tally_counts() {
        let votes = vec![
            VoteRecord::support("a", ""),
            VoteRecord::support("b", ""),
            VoteRecord::oppose("c", ""),
            VoteRecord::abstain("d", ""),
        ];
        let tally = VoteTally::from_votes(&votes);

        assert_eq!(tally.support, 2);
        assert_eq!(tally.oppose, 1);
        assert_eq!(tally.abstain, 1);
        assert_eq!(tally.total(), 4);
        assert!(!tally.is_unanimous());
    }

    #[test]
    fn test_tally_unanimous() {
        let votes = vec![VoteRecord::support("a", ""), VoteRecord::support("b", "")];
        assert!(VoteTally::from_votes(&votes).is_unanimous());
        assert!(!VoteTally::from_votes(&[]).is_unanimous());
    }

    #[test]
    fn test_tally_summary() {
        let votes = vec![
            VoteRecord::support("a", ""),
            VoteRecord::oppose("b", ""),
            VoteRecord::abstain("c", ""),
        ];
        assert_eq!(VoteTally::summary(&votes), "[●○◐]");
    }
}
