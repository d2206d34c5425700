use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{DirectorError, Result},
    plan::{EditPlan, PlanBuilder},
    scoring::{ScoredSegment, Scorer, ScorerRegistry},
    segmentation::{Segment, Segmenter},
    selection::{Selection, Selector, SelectorRegistry},
    signal::{NormalizedTimeline, RawSignal, SignalLoader, SignalNormalizer},
};

/// Shared cancellation switch for one or more pipeline runs
///
/// Runs check it between stages; a cancelled run returns
/// [`DirectorError::Cancelled`] and its partial outputs are dropped.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one run inside a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub source_id: String,
    pub result: Result<EditPlan>,
}

/// Main pipeline engine that turns one raw signal into an edit plan
///
/// The engine follows a clear pipeline:
/// 1. Normalization - Resample the raw signal onto a fixed-step timeline
/// 2. Segmentation - Cut the timeline into candidate segments
/// 3. Scoring - Rate every candidate with the configured scorer
/// 4. Selection - Pick the subset that fills the target duration
/// 5. Plan Building - Emit clips, transitions and the decision trace
///
/// Every run owns its intermediate values, so independent runs can execute
/// in parallel against the same engine.
pub struct PipelineEngine {
    config: Config,
    scorer: Box<dyn Scorer>,
    selector: Box<dyn Selector>,
}

impl PipelineEngine {
    /// Create an engine with explicit strategies
    pub fn new(config: Config, scorer: Box<dyn Scorer>, selector: Box<dyn Selector>) -> Self {
        Self {
            config,
            scorer,
            selector,
        }
    }

    /// Validate `config` and resolve its scorer and selector by name
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        let scorer = ScorerRegistry::new().resolve(&config.strategy.scorer)?;
        let selector = SelectorRegistry::new().resolve(&config.strategy.selector)?;

        Ok(Self::new(config, scorer, selector))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    pub fn selector(&self) -> &dyn Selector {
        self.selector.as_ref()
    }

    /// Run the full pipeline on one signal
    pub fn run(&self, signal: &RawSignal) -> Result<EditPlan> {
        self.run_cancellable(signal, &CancelFlag::new())
    }

    /// Run the full pipeline, giving up between stages once `cancel` is set
    pub fn run_cancellable(&self, signal: &RawSignal, cancel: &CancelFlag) -> Result<EditPlan> {
        let source_id = signal.source_id.as_str();

        info!("🎬 Planning edit for '{}'", source_id);
        info!("   Target: {:.1}s ({} mood)", self.config.edit.target_duration, self.config.edit.mood);
        info!("   Scorer: {}, selector: {}", self.scorer.name(), self.selector.name());

        self.config.validate()?;
        Self::checkpoint(cancel, source_id)?;

        // Pipeline Step 1: Normalization
        let timeline = self.normalize(signal)?;
        Self::checkpoint(cancel, source_id)?;

        // Pipeline Step 2: Segmentation
        let segments = self.segment(&timeline, source_id)?;
        Self::checkpoint(cancel, source_id)?;

        // Pipeline Step 3: Scoring
        let scored = self.score(segments, &timeline)?;
        Self::checkpoint(cancel, source_id)?;

        // Pipeline Step 4: Selection
        let selection = self.select(&scored);
        Self::checkpoint(cancel, source_id)?;

        // Pipeline Step 5: Plan Building
        let plan = self.build_plan(&selection)?;

        info!(
            "🎉 Plan ready for '{}': {} clips, {:.1}s",
            source_id,
            plan.clips.len(),
            plan.metadata.total_duration
        );
        Ok(plan)
    }

    /// Run independent signals in parallel, preserving input order
    ///
    /// One failing or cancelled run does not affect the others.
    pub fn run_batch(&self, signals: &[RawSignal], cancel: &CancelFlag) -> Result<Vec<BatchOutcome>> {
        let threads = self.config.batch.processing_threads.max(1).min(signals.len().max(1));
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| DirectorError::generic(format!("Failed to start batch workers: {}", e)))?;

        info!("📦 Running batch of {} signals on {} threads", signals.len(), threads);

        let outcomes: Vec<BatchOutcome> = pool.install(|| {
            signals
                .par_iter()
                .map(|signal| BatchOutcome {
                    source_id: signal.source_id.clone(),
                    result: self.run_cancellable(signal, cancel),
                })
                .collect()
        });

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            warn!("{} of {} batch runs failed", failed, outcomes.len());
        }

        Ok(outcomes)
    }

    /// Load a signal file, then run the pipeline on it
    pub async fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<EditPlan> {
        let signal = SignalLoader::load(path).await?;
        self.run(&signal)
    }

    fn checkpoint(cancel: &CancelFlag, source_id: &str) -> Result<()> {
        if cancel.is_cancelled() {
            warn!("Run for '{}' cancelled; discarding partial results", source_id);
            return Err(DirectorError::Cancelled {
                source_id: source_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // PIPELINE STEP 1: NORMALIZATION
    // ==========================================

    fn normalize(&self, signal: &RawSignal) -> Result<NormalizedTimeline> {
        info!("🎵 Step 1: Normalizing signal...");

        let timeline = SignalNormalizer::with_config(&self.config.tuning).normalize(signal)?;

        info!("   ✅ {} time points over {:.1}s", timeline.len(), timeline.total_duration);
        Ok(timeline)
    }

    // ==========================================
    // PIPELINE STEP 2: SEGMENTATION
    // ==========================================

    fn segment(&self, timeline: &NormalizedTimeline, source_id: &str) -> Result<Vec<Segment>> {
        info!("✂️  Step 2: Segmenting timeline...");

        let segments = Segmenter::with_config(&self.config).segment(timeline, source_id)?;

        info!("   ✅ {} candidate segments", segments.len());
        for segment in &segments {
            debug!(
                "      {} [{:.1}s, {:.1}s) {:.1}s",
                segment.id, segment.start_time, segment.end_time, segment.duration
            );
        }
        Ok(segments)
    }

    // ==========================================
    // PIPELINE STEP 3: SCORING
    // ==========================================

    fn score(&self, segments: Vec<Segment>, timeline: &NormalizedTimeline) -> Result<Vec<ScoredSegment>> {
        info!("⭐ Step 3: Scoring with {} rules...", self.scorer.name());

        let segments = self.scorer.prepare(segments, &self.config)?;
        let scored = segments
            .iter()
            .map(|segment| self.scorer.score_segment(segment, timeline, &self.config))
            .collect::<Result<Vec<_>>>()?;

        for candidate in &scored {
            debug!("      {} scored {:.1}", candidate.id(), candidate.score);
        }
        if let Some(best) = scored.iter().max_by(|a, b| a.score.total_cmp(&b.score)) {
            info!("   ✅ {} segments scored, best {} at {:.1}", scored.len(), best.id(), best.score);
        }
        Ok(scored)
    }

    // ==========================================
    // PIPELINE STEP 4: SELECTION
    // ==========================================

    fn select(&self, scored: &[ScoredSegment]) -> Selection {
        info!("🎯 Step 4: Selecting with {} strategy...", self.selector.name());

        let selection = self.selector.select(scored, &self.config);

        if selection.is_empty() {
            warn!("   No segment fits the {:.1}s target", self.config.edit.target_duration);
        } else {
            info!(
                "   ✅ {} of {} segments selected, {:.1}s",
                selection.selected.len(),
                scored.len(),
                selection.total_duration()
            );
        }
        selection
    }

    // ==========================================
    // PIPELINE STEP 5: PLAN BUILDING
    // ==========================================

    fn build_plan(&self, selection: &Selection) -> Result<EditPlan> {
        info!("🎞️  Step 5: Building edit plan...");

        let plan = PlanBuilder::build(selection, &self.config)?;

        info!("   ✅ {} clips, {} traces", plan.clips.len(), plan.decision_trace.len());
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::scoring::DirectorScorer;
    use crate::selection::GreedySelector;
    use tempfile::tempdir;

    fn signal(source_id: &str) -> RawSignal {
        RawSignal::new(source_id, 30.0)
            .with_audio(
                (0..30).map(|t| t as f64).collect(),
                (0..30).map(|t| if t % 10 == 9 { 0.02 } else { 0.7 }).collect(),
            )
            .with_scene_changes(vec![15.0])
    }

    fn config(target: f64) -> Config {
        let mut config = Config::default();
        config.edit.target_duration = target;
        config.batch.processing_threads = 2;
        config
    }

    #[test]
    fn test_run_produces_plan_within_target() {
        let engine = PipelineEngine::from_config(config(15.0)).unwrap();
        let plan = engine.run(&signal("clip")).unwrap();

        assert!(!plan.is_empty());
        assert!(plan.metadata.total_duration <= 15.0 * 1.05 + 1e-9);
        for pair in plan.clips.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
        assert!(plan.decision_trace.keys().all(|id| id.starts_with("clip-")));
    }

    #[test]
    fn test_run_is_deterministic() {
        let engine = PipelineEngine::from_config(config(15.0)).unwrap();
        let first = engine.run(&signal("clip")).unwrap();
        let second = engine.run(&signal("clip")).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let mut config = config(15.0);
        config.strategy.selector = "random".to_string();

        assert!(matches!(
            PipelineEngine::from_config(config),
            Err(DirectorError::Config(ConfigError::UnknownStrategy { .. }))
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_run() {
        let mut config = config(15.0);
        config.edit.min_segment_duration = 20.0;
        let engine = PipelineEngine::new(config, Box::new(DirectorScorer::new()), Box::new(GreedySelector::new()));

        assert!(matches!(engine.run(&signal("clip")), Err(DirectorError::Config(_))));
    }

    #[test]
    fn test_cancelled_run_returns_no_plan() {
        let engine = PipelineEngine::from_config(config(15.0)).unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();

        match engine.run_cancellable(&signal("clip"), &cancel) {
            Err(DirectorError::Cancelled { source_id }) => assert_eq!(source_id, "clip"),
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let engine = PipelineEngine::from_config(config(15.0)).unwrap();
        let signals = vec![signal("a"), RawSignal::new("broken", -1.0), signal("c")];

        let outcomes = engine.run_batch(&signals, &CancelFlag::new()).unwrap();
        let ids: Vec<&str> = outcomes.iter().map(|o| o.source_id.as_str()).collect();

        assert_eq!(ids, vec!["a", "broken", "c"]);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(DirectorError::Signal(_))));
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let engine = PipelineEngine::from_config(config(12.0)).unwrap();
        let signals = vec![signal("a"), signal("b")];

        let outcomes = engine.run_batch(&signals, &CancelFlag::new()).unwrap();
        for (signal, outcome) in signals.iter().zip(outcomes) {
            assert_eq!(outcome.result.unwrap(), engine.run(signal).unwrap());
        }
    }

    #[tokio::test]
    async fn test_run_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.json");
        std::fs::write(&path, serde_json::to_string(&signal("clip")).unwrap()).unwrap();

        let engine = PipelineEngine::from_config(config(15.0)).unwrap();
        let plan = engine.run_file(&path).await.unwrap();
        assert_eq!(plan.clips[0].source_id, "clip");
    }

    #[tokio::test]
    async fn test_run_file_missing() {
        let engine = PipelineEngine::from_config(config(15.0)).unwrap();
        let result = engine.run_file("/nonexistent/clip.json").await;

        assert!(result.unwrap_err().is_recoverable());
    }
}
