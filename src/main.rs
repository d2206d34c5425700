use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};

use edit_director::{
    config::{Config, Mood},
    pipeline::{CancelFlag, PipelineEngine},
    plan::EditPlan,
    signal::SignalLoader,
};

#[derive(Parser)]
#[command(
    name = "edit-director",
    version,
    about = "Turn media signal data into explainable, duration-constrained edit plans",
    long_about = "Edit-Director reads the audio energy, speech and scene-change data extracted from a video, \
                  picks the strongest segments to fill a target duration and writes an edit plan whose \
                  decision trace explains every choice."
)]
struct Cli {
    /// Signal JSON files produced by the extractor
    #[arg(short, long = "signal", num_args = 1.., required_unless_present = "dump_config")]
    signals: Vec<PathBuf>,

    /// Output plan file, or directory when several signals are given (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target edit duration in seconds
    #[arg(short, long)]
    target: Option<f64>,

    /// Pacing mood (energetic, calm, neutral)
    #[arg(short, long)]
    mood: Option<Mood>,

    /// Keyword to favour; repeat for several
    #[arg(short, long = "keyword")]
    keywords: Vec<String>,

    /// Scoring rule set (director, template)
    #[arg(long)]
    scorer: Option<String>,

    /// Selection strategy (greedy, threshold)
    #[arg(long)]
    selector: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => {
                info!("Loading configuration from {:?}", config_path);
                Config::from_file(config_path)?
            }
            None => {
                info!("Using default configuration");
                Config::default()
            }
        };

        if let Some(target) = self.target {
            config.edit.target_duration = target;
        }
        if let Some(mood) = self.mood {
            config.edit.mood = mood;
        }
        if !self.keywords.is_empty() {
            config.edit.keywords = self.keywords.clone();
        }
        if let Some(scorer) = &self.scorer {
            config.strategy.scorer = scorer.clone();
        }
        if let Some(selector) = &self.selector {
            config.strategy.selector = selector.clone();
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Plans go to stdout, logs to stderr
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Edit-Director v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.load_config()?;

    if cli.dump_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let engine = Arc::new(PipelineEngine::from_config(config)?);
    info!(
        "Using {} scorer and {} selector",
        engine.scorer().name(),
        engine.selector().name()
    );

    let signals = SignalLoader::load_all(&cli.signals).await?;
    info!("Loaded {} signal file(s)", signals.len());

    if signals.len() == 1 {
        let worker = Arc::clone(&engine);
        let plan = tokio::task::spawn_blocking(move || worker.run(&signals[0])).await??;
        write_plan(&plan, cli.output.as_deref()).await?;
        return Ok(());
    }

    let cancel = CancelFlag::new();
    let worker = Arc::clone(&engine);
    let outcomes = tokio::task::spawn_blocking(move || worker.run_batch(&signals, &cancel)).await??;

    if let Some(dir) = &cli.output {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Cannot create output directory {:?}", dir))?;
    }

    let mut failures = 0;
    for outcome in outcomes {
        match outcome.result {
            Ok(plan) => {
                let target = cli
                    .output
                    .as_ref()
                    .map(|dir| dir.join(format!("{}.plan.json", outcome.source_id)));
                write_plan(&plan, target.as_deref()).await?;
            }
            Err(e) => {
                failures += 1;
                error!("'{}': {}", outcome.source_id, e.user_message());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} signal(s) failed to plan", failures);
    }

    info!("Batch complete");
    Ok(())
}

async fn write_plan(plan: &EditPlan, output: Option<&Path>) -> Result<()> {
    let json = plan.to_json_pretty()?;

    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Cannot write plan to {:?}", path))?;
            info!(
                "Plan saved to {:?}: {} clips, {:.1}s",
                path,
                plan.clips.len(),
                plan.metadata.total_duration
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
