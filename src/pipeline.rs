/// Gesture engine wiring the processing stages to a pattern library.
///
/// # Architecture
///
/// Every use case runs the same front half:
/// 1. **Noise filtering**: drop jitter and magnitude spikes
/// 2. **Segmentation**: bucket, aggregate, merge, normalize into a `Pattern`
///
/// and then diverges:
/// - **record**: persist the pattern under a name
/// - **recognize**: score it against every stored pattern and pick the best
///
/// The engine holds no gesture state between calls. Capturing the samples
/// of one gesture (button press to release) is the caller's job.

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::discretizer::Discretizer;
use crate::error::{GestureError, Result};
use crate::matcher::PatternMatcher;
use crate::recognition::{RecognitionResult, Recognizer};
use crate::segmentation::PatternBuilder;
use crate::store::PatternStore;
use crate::types::{NamedPattern, Pattern, ShiftSample};

/// Build, store and recognize gestures against a `PatternStore`.
pub struct GestureEngine<S: PatternStore> {
    config: EngineConfig,

    // Processing stages
    builder: PatternBuilder,
    recognizer: Recognizer,

    store: S,
}

impl<S: PatternStore> GestureEngine<S> {
    /// Creates an engine, validating every configuration section.
    pub fn new(config: EngineConfig, store: S) -> Result<Self> {
        config.validate()?;

        let discretizer = Discretizer::new(config.discretization)?;
        let builder = PatternBuilder::new(discretizer, config.builder.clone())?;
        let matcher = PatternMatcher::new(config.matcher.clone())?;
        let recognizer = Recognizer::new(matcher, config.recognition.clone())?;

        Ok(Self {
            config,
            builder,
            recognizer,
            store,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn builder(&self) -> &PatternBuilder {
        &self.builder
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Turn one gesture's samples into a pattern without touching the store.
    pub fn make_pattern(&self, shifts: &[ShiftSample]) -> Pattern {
        self.builder.build(shifts)
    }

    /// Build a pattern and save it under `name`.
    ///
    /// Gestures that reduce to nothing are rejected with `EmptyPattern`.
    pub fn record(&mut self, name: &str, shifts: &[ShiftSample]) -> Result<Pattern> {
        let pattern = self.make_pattern(shifts);
        if pattern.is_empty() {
            warn!(name, samples = shifts.len(), "gesture produced an empty pattern");
            return Err(GestureError::EmptyPattern);
        }

        self.store.save(NamedPattern::new(name, pattern.clone()))?;
        info!(name, segments = pattern.len(), "recorded gesture");
        Ok(pattern)
    }

    /// Build a candidate pattern and match it against the library.
    pub fn recognize(&self, shifts: &[ShiftSample]) -> Result<RecognitionResult> {
        let candidate = self.make_pattern(shifts);
        if candidate.is_empty() {
            warn!(samples = shifts.len(), "candidate gesture produced an empty pattern");
        }
        self.recognize_pattern(&candidate)
    }

    /// Match an already-built pattern against the library.
    pub fn recognize_pattern(&self, candidate: &Pattern) -> Result<RecognitionResult> {
        let library = self.store.all()?;
        Ok(self.recognizer.recognize(candidate, &library))
    }

    /// Names of every stored pattern, in insertion order.
    pub fn list(&self) -> Result<Vec<String>> {
        self.store.names()
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.store.delete(name)?;
        info!(name, "deleted gesture");
        Ok(())
    }
}
