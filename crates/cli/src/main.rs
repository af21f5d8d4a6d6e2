//! Pinned PTE inner cache CLI.
//!
//! This binary replays recorded translation traces through the host TLB model. It performs:
//! 1. **Replay:** Load a trace, build the TLB from defaults, a JSON config, and flag overrides, then report statistics.
//! 2. **Config dump:** Print the default configuration as JSON, a starting point for `--config`.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ptecache_core::config::{Config, PhasePolicyKind};
use ptecache_core::sim;
use ptecache_core::stats::STATS_SECTIONS;
use ptecache_core::Tlb;

#[derive(Parser, Debug)]
#[command(
    name = "ptecache",
    author,
    version,
    about = "Pinned PTE inner cache model",
    long_about = "Replay a translation trace through a direct-mapped TLB backed by a pinned PTE inner cache.\n\nTrace lines are '<vaddr> <paddr> [r|w|x]'. Set RUST_LOG=debug to follow pins, evictions and phase changes.\n\nExamples:\n  ptecache replay trace.txt\n  ptecache replay trace.txt --cache-size 128 --max-pinned 32 --pin-threshold 8\n  ptecache config > cfg.json && ptecache replay trace.txt --config cfg.json --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print statistics.
    Replay {
        /// Trace file.
        trace: PathBuf,

        /// JSON configuration file (defaults apply to missing fields).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Inner cache capacity in entries.
        #[arg(long)]
        cache_size: Option<u64>,

        /// Maximum pinned entries.
        #[arg(long)]
        max_pinned: Option<u64>,

        /// Initial pin threshold.
        #[arg(long)]
        pin_threshold: Option<u64>,

        /// Observations per phase (0 disables threshold re-evaluation).
        #[arg(long)]
        phase_length: Option<u64>,

        /// Threshold adjustment policy.
        #[arg(long, value_enum)]
        phase_policy: Option<PolicyArg>,

        /// Statistics sections to print (primary, inner_cache, phase). All if omitted.
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,

        /// Print statistics as JSON instead of a text report.
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON.
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Fixed,
    Feedback,
}

impl From<PolicyArg> for PhasePolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Fixed => Self::Fixed,
            PolicyArg::Feedback => Self::Feedback,
        }
    }
}

/// Flag values that override the loaded configuration.
#[derive(Debug, Default)]
struct Overrides {
    cache_size: Option<u64>,
    max_pinned: Option<u64>,
    pin_threshold: Option<u64>,
    phase_length: Option<u64>,
    phase_policy: Option<PolicyArg>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        let inner = &mut config.tlb.inner_cache;
        if let Some(v) = self.cache_size {
            inner.cache_size = v;
        }
        if let Some(v) = self.max_pinned {
            inner.max_pinned = v;
        }
        if let Some(v) = self.pin_threshold {
            inner.pin_threshold = v;
        }
        if let Some(v) = self.phase_length {
            inner.phase.length = v;
        }
        if let Some(p) = self.phase_policy {
            inner.phase.policy = p.into();
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            trace,
            config,
            cache_size,
            max_pinned,
            pin_threshold,
            phase_length,
            phase_policy,
            sections,
            json,
        } => {
            let overrides = Overrides {
                cache_size,
                max_pinned,
                pin_threshold,
                phase_length,
                phase_policy,
            };
            cmd_replay(&trace, config.as_deref(), overrides, &sections, json);
        }
        Commands::Config => cmd_config(),
    }
}

/// Builds the TLB, replays the trace and prints the statistics.
///
/// Exits with code 1 on any configuration or trace error.
fn cmd_replay(
    trace: &std::path::Path,
    config_path: Option<&std::path::Path>,
    overrides: Overrides,
    sections: &[String],
    json: bool,
) {
    let mut config = match config_path {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| fail(&e)),
        None => Config::default(),
    };
    overrides.apply(&mut config);

    if let Some(bad) = sections
        .iter()
        .find(|s| !STATS_SECTIONS.contains(&s.as_str()))
    {
        eprintln!(
            "Error: unknown stats section '{bad}' (expected one of: {})",
            STATS_SECTIONS.join(", ")
        );
        process::exit(1);
    }

    let mut tlb = Tlb::new(&config.tlb).unwrap_or_else(|e| fail(&e));
    let records = sim::load_trace(trace).unwrap_or_else(|e| fail(&e));
    info!(path = %trace.display(), records = records.len(), "trace loaded");

    let run = sim::replay(&mut tlb, &records);

    if json {
        match serde_json::to_string_pretty(&run.stats) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(&e),
        }
    } else {
        println!("[*] Replayed {} translations from {}", run.records, trace.display());
        println!(
            "    pins during run: {}  threshold changes: {}",
            run.pins, run.threshold_changes
        );
        run.stats.print_sections(sections);
    }
}

/// Prints the default configuration as pretty JSON.
fn cmd_config() {
    match serde_json::to_string_pretty(&Config::default()) {
        Ok(text) => println!("{text}"),
        Err(e) => fail(&e),
    }
}

/// Reports a fatal error and exits with code 1.
fn fail(err: &dyn std::fmt::Display) -> ! {
    eprintln!("Error: {err}");
    process::exit(1);
}
