use crate::plugin::NodeNames;
use crate::types::{SchedulingContext, ScoreResult, MAX_NODE_SCORE, MIN_RAW_SCORE};
use crate::{Result, SchedulerError};
use tracing::{debug, warn};

/// Scoring function trait
pub trait ScoreFunction: Send + Sync {
    /// Raw score of a node for the given pod
    fn score(&self, context: &SchedulingContext, node_name: &str) -> Result<ScoreResult>;

    /// Name of the scoring function
    fn name(&self) -> &str;

    /// Normalization hook, if the raw scores need rescaling
    fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
        None
    }
}

/// Optional post-processing of a whole cycle's scores
pub trait ScoreExtensions: Send + Sync {
    /// Rescale every score of the batch into `0..=MAX_NODE_SCORE`
    ///
    /// Called once per cycle, after every node has been scored.
    fn normalize_scores(
        &self,
        context: &SchedulingContext,
        scores: &mut [ScoreResult],
    ) -> Result<()>;
}

impl ScoreFunction for NodeNames {
    fn score(&self, context: &SchedulingContext, node_name: &str) -> Result<ScoreResult> {
        let score = self.draw_raw_score();

        debug!(
            "Node {} raw score for pod {}: {}",
            node_name,
            context.pod_name(),
            score
        );

        Ok(ScoreResult::new(node_name.to_string(), score))
    }

    fn name(&self) -> &str {
        NodeNames::NAME
    }

    fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
        Some(self)
    }
}

impl ScoreExtensions for NodeNames {
    fn normalize_scores(
        &self,
        context: &SchedulingContext,
        scores: &mut [ScoreResult],
    ) -> Result<()> {
        normalize(scores, self.args().max_raw_score, self.args().uniform_score);

        debug!(
            "Normalized {} scores for pod {}",
            scores.len(),
            context.pod_name()
        );

        Ok(())
    }
}

/// Reject a raw score outside `MIN_RAW_SCORE..=max_raw_score`
pub fn check_raw_score(score: i64, max_raw_score: i64) -> Result<()> {
    if (MIN_RAW_SCORE..=max_raw_score).contains(&score) {
        return Ok(());
    }
    Err(SchedulerError::invalid_config(
        format!(
            "raw score {} is outside {}..={} (maxRawScore)",
            score, MIN_RAW_SCORE, max_raw_score
        ),
        "Raw scores must lie between 0 and the configured maxRawScore",
    ))
}

/// Min-max rescale `scores` in place
///
/// Scores outside `MIN_RAW_SCORE..=max_raw_score` are clamped into it first.
/// The bounds start at the opposite ends of that range so the first observed
/// value moves both. When every score is equal there is no spread to divide
/// by and every entry becomes `uniform_score`. An empty batch is left alone.
pub fn normalize(scores: &mut [ScoreResult], max_raw_score: i64, uniform_score: i64) {
    if scores.is_empty() {
        return;
    }

    let max_raw_score = max_raw_score.max(MIN_RAW_SCORE);
    for s in scores.iter_mut() {
        if !(MIN_RAW_SCORE..=max_raw_score).contains(&s.score) {
            warn!(
                "Node {} raw score {} outside 0..={}, clamping",
                s.node_name, s.score, max_raw_score
            );
            s.score = s.score.clamp(MIN_RAW_SCORE, max_raw_score);
        }
    }

    let mut min_raw = max_raw_score;
    let mut max_raw = MIN_RAW_SCORE;
    for s in scores.iter() {
        min_raw = min_raw.min(s.score);
        max_raw = max_raw.max(s.score);
    }

    if max_raw == min_raw {
        debug!(
            "All {} scores equal {}, assigning uniform score {}",
            scores.len(),
            min_raw,
            uniform_score
        );
        for s in scores.iter_mut() {
            s.score = uniform_score;
        }
        return;
    }

    // Widened so a large maxRawScore cannot overflow the multiplication
    let spread = i128::from(max_raw - min_raw);
    for s in scores.iter_mut() {
        let scaled = i128::from(s.score - min_raw) * i128::from(MAX_NODE_SCORE) / spread;
        s.score = scaled as i64;
    }
}

/// Calculate weighted score from multiple scoring functions
pub fn calculate_weighted_score(scores: &[ScoreResult]) -> i64 {
    if scores.is_empty() {
        return 0;
    }

    let total: i64 = scores.iter().map(|s| s.score).sum();
    total / scores.len() as i64
}
