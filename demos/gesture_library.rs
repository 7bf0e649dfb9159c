/// Gesture library example: record named gestures to a JSON file, then recognize
use air_gesture::{EngineConfig, GestureEngine, JsonPatternStore, ShiftSample};

fn stroke(dx: f32, dy: f32, count: usize) -> Vec<ShiftSample> {
    vec![ShiftSample::new(dx, dy); count]
}

fn concat(strokes: &[Vec<ShiftSample>]) -> Vec<ShiftSample> {
    strokes.concat()
}

fn main() -> air_gesture::Result<()> {
    println!("=== Air Gesture Engine: Gesture Library ===\n");

    let path = std::env::temp_dir().join("air-gesture-demo-library.json");
    if path.exists() {
        std::fs::remove_file(&path)?;
    }

    let store = JsonPatternStore::open(&path)?;
    let mut engine = GestureEngine::new(EngineConfig::default(), store)?;

    let gestures = [
        ("swipe-right", stroke(1.0, 0.0, 10)),
        ("swipe-up", stroke(0.0, 1.0, 10)),
        ("ell", concat(&[stroke(1.0, 0.0, 10), stroke(0.0, 1.0, 5)])),
        (
            "check",
            concat(&[stroke(0.5, -0.5, 4), stroke(1.0, 1.0, 8)]),
        ),
    ];

    for (name, samples) in &gestures {
        let pattern = engine.record(name, samples)?;
        println!("Recorded {name:<12} {} segments", pattern.len());
    }
    println!("Library at {}", path.display());

    // A hand never repeats itself exactly.
    let attempt: Vec<ShiftSample> = (0..15)
        .map(|i| {
            let tremor = if i % 2 == 0 { 0.04 } else { -0.04 };
            if i < 10 {
                ShiftSample::new(1.0, tremor)
            } else {
                ShiftSample::new(tremor, 1.0)
            }
        })
        .collect();

    let result = engine.recognize(&attempt)?;
    println!("\n=== Scores ===");
    for (name, score) in &result.scores {
        println!("  {name:<12} {score:.3}");
    }
    match result.best_match {
        Some((name, score)) => println!("\nRecognized: {name} ({score:.3})"),
        None => println!("\nNot recognized (threshold {:.2})", result.threshold),
    }

    engine.delete("swipe-up")?;
    println!("\nAfter delete: {:?}", engine.list()?);

    std::fs::remove_file(&path)?;
    Ok(())
}
