//! Air Gesture command-line tool
//!
//! Builds, compares, records and recognizes gestures from sample files.
//! A sample file is a JSON array of `{"dx": .., "dy": ..}` motion deltas.
//!
//! This is the entry point for standalone use. For library use, see lib.rs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use air_gesture::{
    EngineConfig, GestureEngine, JsonPatternStore, MatchOutcome, MatchStrategy,
    MemoryPatternStore, Pattern, ShiftSample,
};

/// Air Gesture - record and recognize 2D motion gestures
#[derive(Parser, Debug)]
#[command(name = "air-gesture")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a pattern from a sample file and print it as JSON
    Build {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Compare the gestures in two sample files
    Compare {
        #[arg(short, long)]
        left: PathBuf,

        #[arg(short, long)]
        right: PathBuf,

        /// Override the configured strategy
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Record a gesture into a library
    Record {
        #[arg(short, long)]
        library: PathBuf,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        input: PathBuf,
    },

    /// Recognize a gesture against a library
    Recognize {
        #[arg(short, long)]
        library: PathBuf,

        #[arg(short, long)]
        input: PathBuf,
    },

    /// List the patterns in a library
    List {
        #[arg(short, long)]
        library: PathBuf,
    },

    /// Delete a pattern from a library
    Delete {
        #[arg(short, long)]
        library: PathBuf,

        #[arg(short, long)]
        name: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Alignment,
    Dtw,
    Cyclic,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Alignment => MatchStrategy::SequenceAlignment,
            StrategyArg::Dtw => MatchStrategy::Dtw,
            StrategyArg::Cyclic => MatchStrategy::CyclicShift,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Build { input } => {
            let engine = GestureEngine::new(config, MemoryPatternStore::new())?;
            let pattern = engine.make_pattern(&read_samples(&input)?);
            println!("{}", serde_json::to_string_pretty(&pattern)?);
        }
        Commands::Compare {
            left,
            right,
            strategy,
        } => {
            let mut config = config;
            if let Some(strategy) = strategy {
                config.matcher.strategy = strategy.into();
            }
            let engine = GestureEngine::new(config, MemoryPatternStore::new())?;
            let a = engine.make_pattern(&read_samples(&left)?);
            let b = engine.make_pattern(&read_samples(&right)?);

            let matcher = engine.recognizer().matcher();
            let outcome = matcher.compare(&a, &b);
            print!("{}", comparison_report(matcher.strategy(), &a, &b, &outcome));
        }
        Commands::Record {
            library,
            name,
            input,
        } => {
            let mut engine = open_engine(config, &library)?;
            let pattern = engine
                .record(&name, &read_samples(&input)?)
                .with_context(|| format!("failed to record `{name}`"))?;
            println!("recorded `{name}` with {} segments", pattern.len());
        }
        Commands::Recognize { library, input } => {
            let engine = open_engine(config, &library)?;
            let result = engine.recognize(&read_samples(&input)?)?;
            for (name, score) in &result.scores {
                println!("{name:<24} {score:.4}");
            }
            match &result.best_match {
                Some((name, score)) => println!("recognized: {name} ({score:.4})"),
                None => println!("not recognized (threshold {:.2})", result.threshold),
            }
        }
        Commands::List { library } => {
            let engine = open_engine(config, &library)?;
            for name in engine.list()? {
                println!("{name}");
            }
        }
        Commands::Delete { library, name } => {
            let mut engine = open_engine(config, &library)?;
            engine
                .delete(&name)
                .with_context(|| format!("failed to delete `{name}`"))?;
            println!("deleted `{name}`");
        }
    }

    Ok(())
}

/// Text block printed by `compare`.
fn comparison_report(
    strategy: MatchStrategy,
    a: &Pattern,
    b: &Pattern,
    outcome: &MatchOutcome,
) -> String {
    let mut lines = vec![
        format!("strategy:   {strategy:?}"),
        format!("segments:   {} vs {}", a.len(), b.len()),
        format!("similarity: {:.4}", outcome.similarity),
        format!("match:      {}", outcome.is_match),
    ];
    if let Some(report) = &outcome.cyclic {
        let errors = &report.errors;
        lines.push(format!("shift:      {}", report.shift));
        lines.push(format!("error:      {:.4}", report.error_score));
        lines.push(format!(
            "errors:     {} (weight {}, direction {}, order {}, missing {}{})",
            errors.total(),
            errors.weight_errors,
            errors.direction_errors,
            errors.order_errors,
            errors.missing_segments,
            if errors.length_mismatch { ", length mismatch" } else { "" },
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_engine(config: EngineConfig, library: &Path) -> Result<GestureEngine<JsonPatternStore>> {
    let store = JsonPatternStore::open(library)
        .with_context(|| format!("failed to open library {}", library.display()))?;
    Ok(GestureEngine::new(config, store)?)
}

fn read_samples(path: &Path) -> Result<Vec<ShiftSample>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}
