//! Pattern comparison front end.
//!
//! One matcher, three strategies selected by configuration:
//! - `SequenceAlignment`: gap-penalized alignment over the pair-score matrix
//! - `Dtw`: dynamic time warping over pair costs
//! - `CyclicShift`: rule-based error counting with rotation search
//!
//! Empty patterns never reach a strategy: two empty patterns are identical
//! (1.0) and an empty pattern against a non-empty one is unrelated (0.0).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alignment::{alignment_similarity, dtw_similarity, similarity_matrix, ScoreWeights};
use crate::cyclic::{self, CyclicConfig, CyclicReport};
use crate::error::{ensure_non_negative, ensure_unit_interval, GestureError, Result};
use crate::types::Pattern;

/// Comparison algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    #[default]
    SequenceAlignment,
    Dtw,
    CyclicShift,
}

/// Configuration for pattern matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub strategy: MatchStrategy,

    /// Weight of direction agreement in a pair score.
    pub direction_weight: f32,
    /// Weight of segment-weight agreement in a pair score.
    pub magnitude_weight: f32,

    /// Cost of skipping a segment in sequence alignment. Typical: 0.1.
    pub gap_penalty: f32,

    /// Score at or above which alignment/DTW report a match.
    pub acceptance_threshold: f32,

    /// Rule thresholds for the cyclic-shift strategy.
    pub cyclic: CyclicConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::SequenceAlignment,
            direction_weight: 0.7,
            magnitude_weight: 0.3,
            gap_penalty: 0.1,
            acceptance_threshold: 0.7,
            cyclic: CyclicConfig::default(),
        }
    }
}

impl MatcherConfig {
    pub fn with_strategy(strategy: MatchStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("direction_weight", self.direction_weight)?;
        ensure_non_negative("magnitude_weight", self.magnitude_weight)?;
        if self.direction_weight + self.magnitude_weight <= 0.0 {
            return Err(GestureError::invalid(
                "direction_weight",
                "direction_weight + magnitude_weight must be positive",
            ));
        }
        ensure_non_negative("gap_penalty", self.gap_penalty)?;
        ensure_unit_interval("acceptance_threshold", self.acceptance_threshold)?;
        self.cyclic.validate()
    }

    fn score_weights(&self) -> ScoreWeights {
        ScoreWeights {
            direction: self.direction_weight,
            magnitude: self.magnitude_weight,
        }
    }
}

/// Result of comparing two patterns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    /// Similarity in [0, 1]; 1.0 means identical.
    pub similarity: f32,
    /// Accept/reject decision under the active strategy.
    pub is_match: bool,
    /// Error breakdown, present for the cyclic-shift strategy.
    pub cyclic: Option<CyclicReport>,
}

impl MatchOutcome {
    fn degenerate(similarity: f32) -> Self {
        Self {
            similarity,
            is_match: similarity >= 1.0,
            cyclic: None,
        }
    }
}

/// Compares patterns under a fixed configuration.
///
/// Stateless apart from the read-only config; share freely across threads.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    config: MatcherConfig,
}

impl PatternMatcher {
    pub fn new(config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.config.strategy
    }

    /// Similarity score of `candidate` against `stored`, in [0, 1].
    pub fn similarity(&self, candidate: &Pattern, stored: &Pattern) -> f32 {
        self.compare(candidate, stored).similarity
    }

    /// Accept/reject decision for `candidate` against `stored`.
    pub fn is_match(&self, candidate: &Pattern, stored: &Pattern) -> bool {
        self.compare(candidate, stored).is_match
    }

    /// Full comparison under the configured strategy.
    pub fn compare(&self, candidate: &Pattern, stored: &Pattern) -> MatchOutcome {
        match (candidate.is_empty(), stored.is_empty()) {
            (true, true) => return MatchOutcome::degenerate(1.0),
            (true, false) | (false, true) => return MatchOutcome::degenerate(0.0),
            (false, false) => {}
        }

        let outcome = match self.config.strategy {
            MatchStrategy::SequenceAlignment => {
                let matrix = similarity_matrix(candidate, stored, self.config.score_weights());
                self.scored(alignment_similarity(&matrix, self.config.gap_penalty))
            }
            MatchStrategy::Dtw => {
                let matrix = similarity_matrix(candidate, stored, self.config.score_weights());
                self.scored(dtw_similarity(&matrix))
            }
            MatchStrategy::CyclicShift => {
                let report = cyclic::evaluate(candidate, stored, &self.config.cyclic);
                MatchOutcome {
                    similarity: report.similarity,
                    is_match: report.is_match,
                    cyclic: Some(report),
                }
            }
        };

        debug!(
            strategy = ?self.config.strategy,
            candidate_len = candidate.len(),
            stored_len = stored.len(),
            similarity = outcome.similarity,
            is_match = outcome.is_match,
            "compared patterns"
        );
        outcome
    }

    fn scored(&self, similarity: f32) -> MatchOutcome {
        MatchOutcome {
            similarity,
            is_match: similarity >= self.config.acceptance_threshold,
            cyclic: None,
        }
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self {
            config: MatcherConfig::default(),
        }
    }
}
