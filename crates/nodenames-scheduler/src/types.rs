use k8s_openapi::api::core::v1::{Node, Pod};

/// Highest score a node can hold after normalization
pub const MAX_NODE_SCORE: i64 = 100;

/// Lowest score a node can hold after normalization
pub const MIN_NODE_SCORE: i64 = 0;

/// Lowest raw score the scorer hands out
pub const MIN_RAW_SCORE: i64 = 0;

/// Default inclusive upper bound of raw scores
pub const MAX_RAW_SCORE: i64 = 10;

/// Scheduling context for one pod in one cycle
///
/// Candidates are passed to filters and scorers one at a time, so the
/// context deliberately carries nothing but the workload.
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    /// Pod to be scheduled
    pub pod: Pod,
}

impl SchedulingContext {
    /// Create a new scheduling context
    pub fn new(pod: Pod) -> Self {
        Self { pod }
    }

    /// `namespace/name` of the pod, for logs and errors
    pub fn pod_name(&self) -> String {
        let name = self.pod.metadata.name.as_deref().unwrap_or("unknown");
        match self.pod.metadata.namespace.as_deref() {
            Some(ns) => format!("{}/{}", ns, name),
            None => name.to_string(),
        }
    }
}

/// Name of a node, if it has one
pub fn node_name(node: &Node) -> Option<&str> {
    node.metadata.name.as_deref()
}

/// Result of filtering a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// Node name
    pub node_name: String,
    /// Whether the node passed the filter
    pub passed: bool,
    /// Reason for failure (if any)
    pub reason: Option<String>,
}

impl FilterResult {
    /// Create a passing filter result
    pub fn pass(node_name: String) -> Self {
        Self {
            node_name,
            passed: true,
            reason: None,
        }
    }

    /// Create a failing filter result
    pub fn fail(node_name: String, reason: String) -> Self {
        Self {
            node_name,
            passed: false,
            reason: Some(reason),
        }
    }
}

/// Score of one node for one pod
///
/// Holds a raw score straight out of a scorer and the normalized score
/// (0-100, higher is better) once the batch has been normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    /// Node name
    pub node_name: String,
    /// Score
    pub score: i64,
}

impl ScoreResult {
    /// Create a new score result
    pub fn new(node_name: String, score: i64) -> Self {
        Self { node_name, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_result() {
        let pass = FilterResult::pass("node1".to_string());
        assert!(pass.passed);
        assert!(pass.reason.is_none());

        let fail = FilterResult::fail("node2".to_string(), "not allowed".to_string());
        assert!(!fail.passed);
        assert_eq!(fail.reason, Some("not allowed".to_string()));
    }

    #[test]
    fn test_pod_name() {
        let mut pod = Pod::default();
        assert_eq!(SchedulingContext::new(pod.clone()).pod_name(), "unknown");

        pod.metadata.name = Some("web".to_string());
        assert_eq!(SchedulingContext::new(pod.clone()).pod_name(), "web");

        pod.metadata.namespace = Some("default".to_string());
        assert_eq!(SchedulingContext::new(pod).pod_name(), "default/web");
    }

    #[test]
    fn test_node_name() {
        let mut node = Node::default();
        assert_eq!(node_name(&node), None);

        node.metadata.name = Some("node1".to_string());
        assert_eq!(node_name(&node), Some("node1"));
    }
}
