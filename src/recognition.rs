//! Best-match selection against a library of stored patterns.
//!
//! Every stored pattern is scored independently, so with the `parallel`
//! feature the scoring fans out over rayon. Selection is always done
//! afterwards on the ordered score list. A stored pattern is a candidate
//! only when the matcher accepts it under its own strategy rules and its
//! score reaches the recognition threshold. The highest candidate wins,
//! and the earliest library entry wins a tie.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ensure_unit_interval, Result};
use crate::matcher::{MatchOutcome, PatternMatcher};
use crate::types::{NamedPattern, Pattern};

/// Configuration for recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Minimum similarity for a stored pattern to count as recognized.
    pub similarity_threshold: f32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
        }
    }
}

impl RecognitionConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_unit_interval("similarity_threshold", self.similarity_threshold)
    }
}

/// Scores of one candidate against a library.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    /// (name, similarity) for every stored pattern, in library order.
    pub scores: Vec<(String, f32)>,
    /// Best accepted (name, similarity) at or above the threshold.
    pub best_match: Option<(String, f32)>,
    pub threshold: f32,
}

impl RecognitionResult {
    pub fn is_recognized(&self) -> bool {
        self.best_match.is_some()
    }

    pub fn recognized_name(&self) -> Option<&str> {
        self.best_match.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn similarity(&self) -> Option<f32> {
        self.best_match.as_ref().map(|(_, score)| *score)
    }
}

/// Matches candidates against stored patterns.
#[derive(Debug, Clone)]
pub struct Recognizer {
    matcher: PatternMatcher,
    config: RecognitionConfig,
}

impl Recognizer {
    pub fn new(matcher: PatternMatcher, config: RecognitionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { matcher, config })
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    pub fn threshold(&self) -> f32 {
        self.config.similarity_threshold
    }

    /// Score `candidate` against every entry of `library` and pick the best.
    pub fn recognize(&self, candidate: &Pattern, library: &[NamedPattern]) -> RecognitionResult {
        let outcomes = self.score_all(candidate, library);
        let threshold = self.config.similarity_threshold;

        let best_match = library
            .iter()
            .zip(&outcomes)
            .filter(|(_, outcome)| outcome.is_match && outcome.similarity >= threshold)
            .fold(None::<(&str, f32)>, |best, (entry, outcome)| match best {
                Some(current) if current.1 >= outcome.similarity => Some(current),
                _ => Some((entry.name.as_str(), outcome.similarity)),
            })
            .map(|(name, score)| (name.to_string(), score));

        match &best_match {
            Some((name, score)) => info!(name = %name, score, "gesture recognized"),
            None => info!(candidates = library.len(), threshold, "gesture not recognized"),
        }

        let scores = library
            .iter()
            .zip(&outcomes)
            .map(|(entry, outcome)| (entry.name.clone(), outcome.similarity))
            .collect();

        RecognitionResult {
            scores,
            best_match,
            threshold,
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all(&self, candidate: &Pattern, library: &[NamedPattern]) -> Vec<MatchOutcome> {
        library
            .iter()
            .map(|entry| self.score_one(candidate, entry))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn score_all(&self, candidate: &Pattern, library: &[NamedPattern]) -> Vec<MatchOutcome> {
        library
            .par_iter()
            .map(|entry| self.score_one(candidate, entry))
            .collect()
    }

    fn score_one(&self, candidate: &Pattern, entry: &NamedPattern) -> MatchOutcome {
        let outcome = self.matcher.compare(candidate, entry.pattern());
        debug!(
            name = %entry.name,
            score = outcome.similarity,
            accepted = outcome.is_match,
            "scored stored pattern"
        );
        outcome
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self {
            matcher: PatternMatcher::default(),
            config: RecognitionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{MatchStrategy, MatcherConfig};
    use crate::types::{Direction, PatternSegment};

    fn pattern(raw: &[(u32, f32)]) -> Pattern {
        Pattern::new(
            raw.iter()
                .map(|&(i, w)| PatternSegment::new(Direction::new(i, 8), w))
                .collect(),
        )
    }

    fn library() -> Vec<NamedPattern> {
        vec![
            NamedPattern::new("right", pattern(&[(1, 1.0)])),
            NamedPattern::new("ell", pattern(&[(1, 1.0), (3, 0.5)])),
            NamedPattern::new("zig", pattern(&[(2, 1.0), (8, 1.0), (2, 1.0)])),
        ]
    }

    #[test]
    fn test_recognizes_exact_entry() {
        let recognizer = Recognizer::default();
        let result = recognizer.recognize(&pattern(&[(1, 1.0), (3, 0.5)]), &library());

        assert_eq!(result.scores.len(), 3);
        assert_eq!(result.recognized_name(), Some("ell"));
        assert_eq!(result.similarity(), Some(1.0));
        assert_eq!(result.threshold, 0.7);
    }

    #[test]
    fn test_scores_follow_library_order() {
        let result = Recognizer::default().recognize(&pattern(&[(5, 1.0)]), &library());
        let names: Vec<&str> = result.scores.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["right", "ell", "zig"]);
    }

    #[test]
    fn test_below_threshold_is_unrecognized() {
        let result = Recognizer::default().recognize(&pattern(&[(5, 1.0), (7, 1.0)]), &library());
        assert!(!result.is_recognized());
        assert!(result.recognized_name().is_none());
    }

    #[test]
    fn test_empty_candidate_is_unrecognized() {
        let result = Recognizer::default().recognize(&Pattern::empty(), &library());
        assert!(result.scores.iter().all(|(_, s)| *s == 0.0));
        assert!(!result.is_recognized());
    }

    #[test]
    fn test_tie_keeps_earliest_entry() {
        let same = pattern(&[(1, 1.0), (3, 0.5)]);
        let library = vec![
            NamedPattern::new("first", same.clone()),
            NamedPattern::new("second", same.clone()),
        ];
        let result = Recognizer::default().recognize(&same, &library);
        assert_eq!(result.recognized_name(), Some("first"));
    }

    #[test]
    fn test_empty_library() {
        let result = Recognizer::default().recognize(&pattern(&[(1, 1.0)]), &[]);
        assert!(result.scores.is_empty());
        assert!(!result.is_recognized());
    }

    #[test]
    fn test_works_with_cyclic_strategy() {
        let matcher =
            PatternMatcher::new(MatcherConfig::with_strategy(MatchStrategy::CyclicShift)).unwrap();
        let recognizer = Recognizer::new(matcher, RecognitionConfig::default()).unwrap();
        let result = recognizer.recognize(&pattern(&[(8, 1.0), (2, 1.0), (2, 1.0)]), &library());
        // zig rotated by one: every position agrees, similarity 1.0
        assert_eq!(result.recognized_name(), Some("zig"));
    }

    #[test]
    fn test_cyclic_size_floor_blocks_recognition() {
        let mut config = MatcherConfig::with_strategy(MatchStrategy::CyclicShift);
        config.cyclic.min_pattern_size = 3;
        let matcher = PatternMatcher::new(config).unwrap();
        let line = pattern(&[(1, 1.0)]);
        assert!(!matcher.is_match(&line, &line));

        let recognizer = Recognizer::new(matcher, RecognitionConfig::default()).unwrap();
        let result = recognizer.recognize(&line, &[NamedPattern::new("line", line.clone())]);
        assert_eq!(result.scores, vec![("line".to_string(), 1.0)]);
        assert!(!result.is_recognized());
    }

    #[test]
    fn test_cyclic_error_ceiling_blocks_recognition() {
        let mut config = MatcherConfig::with_strategy(MatchStrategy::CyclicShift);
        config.cyclic.max_total_error_score = 0.1;
        let matcher = PatternMatcher::new(config).unwrap();
        let recognizer = Recognizer::new(matcher, RecognitionConfig::default()).unwrap();

        // zig rotated by one: full similarity but one order error (1.5 / 3).
        let result = recognizer.recognize(&pattern(&[(8, 1.0), (2, 1.0), (2, 1.0)]), &library());
        assert_eq!(result.scores[2].1, 1.0);
        assert!(!result.is_recognized());
    }

    #[test]
    fn test_acceptance_threshold_blocks_recognition() {
        let matcher = PatternMatcher::new(MatcherConfig {
            acceptance_threshold: 0.95,
            ..Default::default()
        })
        .unwrap();
        let recognizer = Recognizer::new(matcher, RecognitionConfig::default()).unwrap();

        // L-shape against a lone rightward segment: 0.9 clears 0.7 but not 0.95.
        let result = recognizer.recognize(&pattern(&[(1, 1.0), (3, 0.5)]), &library()[..1]);
        assert!(result.scores[0].1 >= 0.7 && result.scores[0].1 < 0.95);
        assert!(!result.is_recognized());
    }

    #[test]
    fn test_threshold_validation() {
        let config = RecognitionConfig {
            similarity_threshold: -0.1,
        };
        assert!(Recognizer::new(PatternMatcher::default(), config).is_err());
    }
}
