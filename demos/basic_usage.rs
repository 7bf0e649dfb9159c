/// Basic usage example: feed motion deltas, get a pattern, compare two gestures
use air_gesture::{
    BuilderConfig, Discretizer, MatchStrategy, MatcherConfig, Pattern, PatternBuilder,
    PatternMatcher, ShiftSample,
};

fn main() -> air_gesture::Result<()> {
    println!("=== Air Gesture Engine: Basic Example ===\n");

    // 8 direction buckets, default noise and merge thresholds
    let builder = PatternBuilder::new(Discretizer::new(8)?, BuilderConfig::default())?;

    // Simulated motion deltas: a rightward stroke then an upward stroke,
    // with some hand tremor mixed in.
    let first_attempt = vec![
        // Right
        (1.00, 0.02), (0.98, -0.03), (1.05, 0.01), (1.02, 0.00),
        (0.97, 0.04), (1.01, -0.02), (0.99, 0.01), (1.03, 0.02),
        // Tremor at the corner
        (0.001, 0.001), (-0.001, 0.0015),
        // Up
        (0.02, 0.99), (-0.03, 1.01), (0.01, 1.02), (0.00, 0.98),
    ];
    let second_attempt = vec![
        (0.95, 0.05), (1.10, -0.04), (1.00, 0.02), (1.04, 0.01),
        (0.96, 0.00), (1.02, -0.01), (0.99, 0.03),
        (0.03, 1.04), (-0.02, 0.97), (0.01, 1.00), (0.02, 1.01), (0.00, 0.99),
    ];

    let a = build(&builder, &first_attempt);
    let b = build(&builder, &second_attempt);
    print_pattern("First attempt", &a);
    print_pattern("Second attempt", &b);

    println!("\n=== Comparison ===");
    for strategy in [
        MatchStrategy::SequenceAlignment,
        MatchStrategy::Dtw,
        MatchStrategy::CyclicShift,
    ] {
        let matcher = PatternMatcher::new(MatcherConfig::with_strategy(strategy))?;
        let outcome = matcher.compare(&a, &b);
        println!(
            "{:<18} similarity {:.3}  match: {}",
            format!("{strategy:?}"),
            outcome.similarity,
            outcome.is_match
        );
    }

    Ok(())
}

fn build(builder: &PatternBuilder, raw: &[(f32, f32)]) -> Pattern {
    let samples: Vec<ShiftSample> = raw.iter().copied().map(ShiftSample::from).collect();
    builder.build(&samples)
}

fn print_pattern(label: &str, pattern: &Pattern) {
    println!("--- {label} ---");
    println!("Segments: {}", pattern.len());
    for (i, segment) in pattern.segments().iter().enumerate() {
        println!(
            "  [{i}] direction {}/{}  weight {:.3}",
            segment.direction.index, segment.direction.discretization, segment.weight
        );
    }
}
