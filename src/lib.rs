//! Air Gesture Engine Library
//!
//! Turns the 2D motion deltas of one "air mouse" gesture into a compact
//! symbolic pattern, and scores how alike two patterns are, so gestures can
//! be recorded under a name and recognized later.
//!
//! # Design Philosophy
//!
//! - **Symbols, not samples**: a gesture is reduced to an ordered list of
//!   (direction bucket, normalized weight) segments before anything is compared.
//! - **Noise is dropped early**: jitter and magnitude spikes never reach segmentation.
//! - **Total after construction**: configuration is validated once; building
//!   and matching never fail afterwards.
//! - **Stateless core**: builders and matchers hold read-only configuration
//!   and are safe to share across threads.
//!
//! # Example
//!
//! ```
//! use air_gesture::{EngineConfig, GestureEngine, MemoryPatternStore, ShiftSample};
//!
//! let mut engine = GestureEngine::new(EngineConfig::default(), MemoryPatternStore::new())?;
//!
//! let swipe_right = vec![ShiftSample::new(1.0, 0.0); 10];
//! engine.record("swipe-right", &swipe_right)?;
//!
//! let result = engine.recognize(&swipe_right)?;
//! assert_eq!(result.recognized_name(), Some("swipe-right"));
//! # Ok::<(), air_gesture::GestureError>(())
//! ```

pub mod alignment;
pub mod config;
pub mod cyclic;
pub mod discretizer;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod recognition;
pub mod segmentation;
pub mod signal;
pub mod store;
pub mod types;


// Re-export commonly used types
pub use config::EngineConfig;
pub use cyclic::{CyclicConfig, CyclicReport, MatchErrors};
pub use discretizer::Discretizer;
pub use error::{GestureError, Result};
pub use matcher::{MatchOutcome, MatchStrategy, MatcherConfig, PatternMatcher};
pub use pipeline::GestureEngine;
pub use recognition::{RecognitionConfig, RecognitionResult, Recognizer};
pub use segmentation::{BuilderConfig, PatternBuilder};
pub use signal::NoiseFilter;
pub use store::{JsonPatternStore, MemoryPatternStore, PatternStore};
pub use types::{Direction, NamedPattern, Pattern, PatternSegment, ShiftSample};
