use tracing::debug;

use crate::{
    config::Config,
    error::{PlanError, Result},
    plan::types::{Clip, EditPlan, PlanMetadata},
    selection::Selection,
};

/// Tolerance for the clip-duration sum check
const DURATION_TOLERANCE: f64 = 1e-6;

/// Assembles an [`EditPlan`] from a selection
pub struct PlanBuilder;

impl PlanBuilder {
    /// Map selected segments 1:1 to clips and attach metadata and traces
    ///
    /// An empty selection yields an empty plan whose traces explain every
    /// rejection.
    pub fn build(selection: &Selection, config: &Config) -> Result<EditPlan> {
        let transition = config.output.transitions.for_mood(config.edit.mood);
        let count = selection.selected.len();

        let clips: Vec<Clip> = selection
            .selected
            .iter()
            .enumerate()
            .map(|(index, scored)| Clip {
                source_id: scored.segment.source_id.clone(),
                start: scored.segment.start_time,
                end: scored.segment.end_time,
                volume: config.output.volume,
                transition_after: (index + 1 < count).then_some(transition),
            })
            .collect();

        let total_duration = selection.total_duration();
        let branding = Some(config.output.branding.clone()).filter(|b| !b.is_empty());

        let plan = EditPlan {
            clips,
            metadata: PlanMetadata {
                total_duration,
                fps: config.output.fps,
                resolution: config.output.resolution,
            },
            branding,
            decision_trace: selection.traces(),
        };

        Self::check(&plan)?;

        debug!(
            "Built plan: {} clips, {:.1}s, {} traces, {} transitions",
            plan.clips.len(),
            plan.metadata.total_duration,
            plan.decision_trace.len(),
            transition.kind
        );

        Ok(plan)
    }

    /// Clips must be chronological and their bounds must add up to the
    /// selected segments' reported durations
    fn check(plan: &EditPlan) -> Result<()> {
        for (index, pair) in plan.clips.windows(2).enumerate() {
            if pair[1].start < pair[0].start {
                return Err(PlanError::UnorderedClips { index: index + 1 }.into());
            }
        }

        let actual = plan.clip_duration();
        if (actual - plan.metadata.total_duration).abs() > DURATION_TOLERANCE {
            return Err(PlanError::InconsistentDuration {
                expected: plan.metadata.total_duration,
                actual,
            }
            .into());
        }

        Ok(())
    }
}
