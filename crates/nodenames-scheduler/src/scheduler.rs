use crate::config::SchedulerConfig;
use crate::filter::FilterPredicate;
use crate::plugin::NodeNames;
use crate::score::{calculate_weighted_score, ScoreFunction};
use crate::types::{node_name, FilterResult, SchedulingContext, ScoreResult};
use crate::{Result, SchedulerError};
use k8s_openapi::api::core::v1::{Node, Pod};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Result of one scheduling cycle
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// `namespace/name` of the scheduled pod
    pub pod_name: String,
    /// Node with the highest final score
    pub selected_node: String,
    /// Feasible nodes by final score, best first
    pub ranking: Vec<ScoreResult>,
    /// Filter verdict for every candidate, in input order
    pub filtered: Vec<FilterResult>,
}

/// Runs scheduling cycles over a fixed set of plugins
///
/// Binding is left to the caller; a cycle only decides.
pub struct Scheduler {
    config: SchedulerConfig,
    filters: Vec<Arc<dyn FilterPredicate>>,
    scorers: Vec<Arc<dyn ScoreFunction>>,
}

impl Scheduler {
    /// Create a scheduler running the NodeNames plugin
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        let plugin = Arc::new(NodeNames::new(config.plugin_args.clone())?);
        Self::with_plugins(config, vec![plugin.clone()], vec![plugin])
    }

    /// Create a scheduler with an explicit plugin set
    pub fn with_plugins(
        config: SchedulerConfig,
        filters: Vec<Arc<dyn FilterPredicate>>,
        scorers: Vec<Arc<dyn ScoreFunction>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            filters,
            scorers,
        })
    }

    /// Run one scheduling cycle for `pod` over `nodes`
    pub async fn schedule_pod(&self, pod: &Pod, nodes: &[Node]) -> Result<ScheduleOutcome> {
        let context = Arc::new(SchedulingContext::new(pod.clone()));
        let pod_name = context.pod_name();

        // Phase 1: Filter nodes
        let filtered = self.filter_nodes(&context, nodes).await?;
        let feasible: Vec<String> = filtered
            .iter()
            .filter(|r| r.passed)
            .map(|r| r.node_name.clone())
            .collect();

        if feasible.is_empty() {
            let reasons: Vec<String> = filtered
                .iter()
                .map(|r| r.reason.clone().unwrap_or_else(|| "filtered out".to_string()))
                .collect();
            let reason = if reasons.is_empty() {
                "no candidate nodes".to_string()
            } else {
                reasons.join("; ")
            };
            return Err(SchedulerError::no_suitable_nodes(pod_name, reason));
        }

        info!(
            "Pod {} has {} feasible nodes out of {}",
            pod_name,
            feasible.len(),
            nodes.len()
        );

        // Phase 2: Score nodes, one batch per scorer
        let mut per_node: Vec<Vec<ScoreResult>> = vec![Vec::new(); feasible.len()];

        for scorer in &self.scorers {
            let mut batch = self.score_nodes(scorer, &context, &feasible).await?;

            // Every score of the cycle is in; safe to rescale
            if let Some(extensions) = scorer.score_extensions() {
                extensions.normalize_scores(&context, &mut batch)?;
            }

            for (slot, score) in per_node.iter_mut().zip(batch) {
                slot.push(score);
            }
        }

        // Phase 3: Rank nodes
        let mut ranking: Vec<ScoreResult> = feasible
            .into_iter()
            .zip(per_node)
            .map(|(name, scores)| ScoreResult::new(name, calculate_weighted_score(&scores)))
            .collect();

        // Stable, so ties keep candidate order
        ranking.sort_by(|a, b| b.score.cmp(&a.score));

        let best = ranking
            .first()
            .ok_or_else(|| SchedulerError::internal_error("No nodes scored"))?;

        info!(
            "Selected node {} for pod {} with score {}",
            best.node_name, pod_name, best.score
        );

        Ok(ScheduleOutcome {
            pod_name,
            selected_node: best.node_name.clone(),
            ranking,
            filtered,
        })
    }

    /// Run every filter against every node, nodes in parallel
    async fn filter_nodes(
        &self,
        context: &Arc<SchedulingContext>,
        nodes: &[Node],
    ) -> Result<Vec<FilterResult>> {
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let mut tasks = JoinSet::new();

        for (index, node) in nodes.iter().enumerate() {
            let semaphore = semaphore.clone();
            let context = context.clone();
            let filters = self.filters.clone();
            let node = node.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| {
                    SchedulerError::internal_error(format!("Filter semaphore closed: {}", e))
                })?;

                let Some(name) = node_name(&node).map(str::to_string) else {
                    debug!("Skipping node without a name");
                    let result = FilterResult::fail(String::new(), "node has no name".to_string());
                    return Ok((index, result));
                };

                for filter in &filters {
                    let result = filter.filter(&context, &node);
                    if !result.passed {
                        debug!(
                            "Node {} filtered out by {}: {}",
                            name,
                            filter.name(),
                            result.reason.as_deref().unwrap_or_default()
                        );
                        return Ok((index, result));
                    }
                }

                Ok::<_, SchedulerError>((index, FilterResult::pass(name)))
            });
        }

        let mut results = collect(tasks).await?;
        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, r)| r).collect())
    }

    /// Score every feasible node with one scorer, nodes in parallel
    async fn score_nodes(
        &self,
        scorer: &Arc<dyn ScoreFunction>,
        context: &Arc<SchedulingContext>,
        feasible: &[String],
    ) -> Result<Vec<ScoreResult>> {
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let mut tasks = JoinSet::new();

        for (index, name) in feasible.iter().enumerate() {
            let semaphore = semaphore.clone();
            let context = context.clone();
            let scorer = scorer.clone();
            let name = name.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| {
                    SchedulerError::internal_error(format!("Score semaphore closed: {}", e))
                })?;
                let result = scorer.score(&context, &name)?;
                Ok::<_, SchedulerError>((index, result))
            });
        }

        let mut results = collect(tasks).await?;
        results.sort_by_key(|(index, _)| *index);
        debug!("Scorer {} produced {} scores", scorer.name(), results.len());
        Ok(results.into_iter().map(|(_, r)| r).collect())
    }
}

/// Wait for every task of the set
async fn collect<T: 'static>(mut tasks: JoinSet<Result<T>>) -> Result<Vec<T>> {
    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let result = joined
            .map_err(|e| SchedulerError::internal_error(format!("Scheduling task failed: {}", e)))?;
        results.push(result?);
    }
    Ok(results)
}
