//! Scripted session replay
//!
//! A session script captures a whole deliberation up front: the proposal
//! and, per participant, the evaluation payload and ballot for each
//! round. [`ScriptedEvaluator`] adapts one participant's script entries
//! to the [`Evaluator`] port, so the engine sees scripted seats exactly
//! the way it would see live ones.

use async_trait::async_trait;
use consilium_application::{Evaluator, EvaluatorError};
use consilium_domain::{
    DiscussionAnalysis, EvaluationRecord, Proposal, VoteChoice, VoteRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// One participant's scripted behaviour for one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedRound {
    /// Aspect payloads for the evaluation record
    #[serde(default)]
    pub aspects: BTreeMap<String, Value>,
    /// The ballot to cast
    pub vote: VoteChoice,
    /// Rationale carried into the minutes
    #[serde(default)]
    pub rationale: String,
}

/// One participant's full script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedParticipant {
    /// Participant identifier (the board role)
    pub role: String,
    /// Entries in round order; a participant with fewer entries than the
    /// session has rounds simply sits the later rounds out
    pub rounds: Vec<ScriptedRound>,
}

/// A complete scripted deliberation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScript {
    pub proposal: Proposal,
    pub participants: Vec<ScriptedParticipant>,
}

impl SessionScript {
    /// Load a script from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse a script from JSON text
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Number of rounds the script covers (the longest participant script)
    pub fn round_count(&self) -> u32 {
        self.participants
            .iter()
            .map(|p| p.rounds.len())
            .max()
            .unwrap_or(0) as u32
    }

    /// Build one scripted evaluator per participant
    pub fn evaluators(&self) -> Vec<Arc<dyn Evaluator>> {
        self.participants
            .iter()
            .map(|p| Arc::new(ScriptedEvaluator::new(p.clone())) as Arc<dyn Evaluator>)
            .collect()
    }
}

/// Adapter: a scripted participant behind the [`Evaluator`] port
pub struct ScriptedEvaluator {
    script: ScriptedParticipant,
}

impl ScriptedEvaluator {
    pub fn new(script: ScriptedParticipant) -> Self {
        Self { script }
    }

    fn entry(&self, round: u32) -> Result<&ScriptedRound, EvaluatorError> {
        self.script
            .rounds
            .get(round.saturating_sub(1) as usize)
            .ok_or_else(|| {
                EvaluatorError::Unavailable(format!(
                    "{} has no script entry for round {}",
                    self.script.role, round
                ))
            })
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    fn role(&self) -> &str {
        &self.script.role
    }

    async fn evaluate(
        &self,
        _proposal: &Proposal,
        round: u32,
    ) -> Result<EvaluationRecord, EvaluatorError> {
        let entry = self.entry(round)?;
        let mut record = EvaluationRecord::new(&self.script.role, round);
        for (aspect, payload) in &entry.aspects {
            record = record.with_aspect(aspect.clone(), payload.clone());
        }
        Ok(record)
    }

    async fn vote(
        &self,
        _proposal: &Proposal,
        round: u32,
        _analysis: &DiscussionAnalysis,
    ) -> Result<VoteRecord, EvaluatorError> {
        let entry = self.entry(round)?;
        Ok(VoteRecord::new(
            &self.script.role,
            entry.vote,
            entry.rationale.clone(),
        ))
    }
}
