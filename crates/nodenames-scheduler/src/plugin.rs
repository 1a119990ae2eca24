use crate::allow_list::AllowList;
use crate::config::{PluginArgs, DEFAULT_ANNOTATION_KEY};
use crate::types::MIN_RAW_SCORE;
use crate::Result;
use k8s_openapi::api::core::v1::Pod;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Where raw scores come from
enum Entropy {
    /// `rand::rng()`: a generator per thread, seeded from the OS
    ThreadLocal,
    /// One seeded generator shared by every caller
    Seeded(Mutex<StdRng>),
}

/// Pins pods to the nodes listed in their `nodeNames` annotation
///
/// Implements [`FilterPredicate`](crate::filter::FilterPredicate),
/// [`ScoreFunction`](crate::score::ScoreFunction) and
/// [`ScoreExtensions`](crate::score::ScoreExtensions). The only shared
/// mutable state is the entropy source, so one instance can serve every
/// worker of a cycle.
pub struct NodeNames {
    args: PluginArgs,
    entropy: Entropy,
}

impl NodeNames {
    /// Name of the plugin, used in logs and configuration
    pub const NAME: &'static str = "NodeNames";

    /// Default pod annotation carrying the allow-list
    pub const ANNOTATION_KEY: &'static str = DEFAULT_ANNOTATION_KEY;

    /// Create the plugin from validated arguments
    pub fn new(args: PluginArgs) -> Result<Self> {
        args.validate()?;

        let entropy = match args.seed {
            Some(seed) => {
                debug!("{} using seeded generator (seed {})", Self::NAME, seed);
                Entropy::Seeded(Mutex::new(StdRng::seed_from_u64(seed)))
            }
            None => Entropy::ThreadLocal,
        };

        Ok(Self { args, entropy })
    }

    /// Plugin arguments in effect
    pub fn args(&self) -> &PluginArgs {
        &self.args
    }

    /// Allow-list declared by `pod`, if any
    pub fn allow_list(&self, pod: &Pod) -> Option<AllowList> {
        AllowList::from_pod(pod, &self.args.annotation_key)
    }

    /// Draw a raw score uniformly from `MIN_RAW_SCORE..=max_raw_score`
    pub(crate) fn draw_raw_score(&self) -> i64 {
        let range = MIN_RAW_SCORE..=self.args.max_raw_score;
        match &self.entropy {
            Entropy::ThreadLocal => rand::rng().random_range(range),
            Entropy::Seeded(rng) => rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .random_range(range),
        }
    }
}

impl std::fmt::Debug for NodeNames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeNames")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchedulerError;

    #[test]
    fn test_new_rejects_invalid_args() {
        let args = PluginArgs {
            max_raw_score: -1,
            ..Default::default()
        };
        let err = NodeNames::new(args).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidConfig { .. }));
    }

    #[test]
    fn test_custom_annotation_key() {
        let plugin = NodeNames::new(PluginArgs {
            annotation_key: "example.com/node-names".to_string(),
            ..Default::default()
        })
        .unwrap();

        let mut pod = Pod::default();
        let mut annotations = std::collections::BTreeMap::new();
        annotations.insert("nodeNames".to_string(), "nodeA".to_string());
        pod.metadata.annotations = Some(annotations.clone());
        assert!(plugin.allow_list(&pod).is_none());

        annotations.insert("example.com/node-names".to_string(), "nodeB".to_string());
        pod.metadata.annotations = Some(annotations);
        let list = plugin.allow_list(&pod).unwrap();
        assert!(list.contains("nodeB"));
        assert!(!list.contains("nodeA"));
    }

    #[test]
    fn test_draw_within_range() {
        let plugin = NodeNames::new(PluginArgs::default()).unwrap();
        for _ in 0..1000 {
            let score = plugin.draw_raw_score();
            assert!((0..=10).contains(&score), "score {} out of range", score);
        }
    }

    #[test]
    fn test_draw_covers_both_bounds() {
        let plugin = NodeNames::new(PluginArgs {
            max_raw_score: 1,
            seed: Some(42),
            ..Default::default()
        })
        .unwrap();

        let draws: Vec<i64> = (0..200).map(|_| plugin.draw_raw_score()).collect();
        assert!(draws.contains(&0));
        assert!(draws.contains(&1));
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let args = PluginArgs {
            seed: Some(1234),
            ..Default::default()
        };
        let a = NodeNames::new(args.clone()).unwrap();
        let b = NodeNames::new(args).unwrap();

        let first: Vec<i64> = (0..32).map(|_| a.draw_raw_score()).collect();
        let second: Vec<i64> = (0..32).map(|_| b.draw_raw_score()).collect();
        assert_eq!(first, second);
    }
}
