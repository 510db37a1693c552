//! loot-survey: itemize a batch of items per tier and print the reports.
//!
//! Reads `config/loot.json` (or `--config`) when present, otherwise runs with
//! retail defaults. `RUST_LOG` overrides the log filter built from the flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use loot_core::config::{LootConfig, DEFAULT_CONFIG_PATH};
use loot_core::constants::{MAX_TIER, MIN_TIER};
use loot_core::logging::{self, LogLevel, TracingConfig};
use loot_core::magic::LootContext;
use loot_core::survey::{self, SurveyConfig, SurveyMode};

/// Monte-Carlo survey of magic itemization across treasure tiers
#[derive(Parser, Debug)]
#[command(name = "loot-survey")]
#[command(version, about, long_about = None)]
struct Args {
    /// Loot config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Items to itemize per tier
    #[arg(short = 'n', long, default_value_t = 10_000)]
    items: u64,

    /// Base seed for per-item seeds
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Use the profile-only pipeline instead of treasure rolls
    #[arg(long)]
    legacy: bool,

    /// Default log level (trace, debug, info, warn, error)
    #[arg(short, long, value_parser = parse_level)]
    log_level: Option<LogLevel>,

    /// Per-module log level, e.g. loot_core::survey=debug (repeatable)
    #[arg(short = 'm', long = "module-level", value_parser = logging::parse_module_filter)]
    module_levels: Vec<(String, LogLevel)>,

    /// Tracing config as JSON, applied before the level flags
    #[arg(long)]
    log_config: Option<PathBuf>,
}

fn parse_level(arg: &str) -> Result<LogLevel, String> {
    LogLevel::parse(arg).ok_or_else(|| format!("unknown log level '{}'", arg))
}

fn tracing_config(args: &Args) -> anyhow::Result<TracingConfig> {
    let mut config = match &args.log_config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            TracingConfig::from_json(&json)
                .with_context(|| format!("parsing tracing config {}", path.display()))?
        }
        None => TracingConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.default_level = level;
    }
    for (module, level) in &args.module_levels {
        config.set_module_level(module, *level);
    }
    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<LootConfig> {
    if path.exists() {
        LootConfig::load(path).with_context(|| format!("loading {}", path.display()))
    } else {
        tracing::info!(path = %path.display(), "no loot config found, using defaults");
        Ok(LootConfig::default())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(&tracing_config(&args)?);

    let config = load_config(&args.config)?;
    let ctx = LootContext::with_defaults(&config);
    let mode = if args.legacy {
        SurveyMode::Legacy
    } else {
        SurveyMode::TreasureRoll
    };

    let mut reports = Vec::new();
    for tier in MIN_TIER..=MAX_TIER {
        let survey_config = SurveyConfig {
            tier,
            item_count: args.items,
            base_seed: args.seed,
            mode,
            ..SurveyConfig::default()
        };
        let report = survey::run_survey(&ctx, &survey_config)
            .with_context(|| format!("survey for tier {}", tier))?;
        reports.push(report);
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
