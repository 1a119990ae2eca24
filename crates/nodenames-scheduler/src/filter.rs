use crate::plugin::NodeNames;
use crate::types::{node_name, FilterResult, SchedulingContext};
use k8s_openapi::api::core::v1::Node;
use tracing::debug;

/// Filter predicate trait
pub trait FilterPredicate: Send + Sync {
    /// Filter a node for the given pod
    fn filter(&self, context: &SchedulingContext, node: &Node) -> FilterResult;

    /// Name of the filter
    fn name(&self) -> &str;
}

impl FilterPredicate for NodeNames {
    fn filter(&self, context: &SchedulingContext, node: &Node) -> FilterResult {
        let name = node_name(node);

        let allow_list = match self.allow_list(&context.pod) {
            Some(list) => list,
            None => {
                // No annotation = no constraint
                debug!(
                    "Node {} accepted for pod {}: no {} annotation",
                    name.unwrap_or("unknown"),
                    context.pod_name(),
                    self.args().annotation_key
                );
                return FilterResult::pass(name.unwrap_or_default().to_string());
            }
        };

        let Some(name) = name else {
            return FilterResult::fail(String::new(), "node has no name".to_string());
        };

        if allow_list.contains(name) {
            debug!(
                "Node {} matches expected {} for pod {}",
                name,
                allow_list,
                context.pod_name()
            );
            return FilterResult::pass(name.to_string());
        }

        debug!(
            "Node {} does not match expected {} for pod {}",
            name,
            allow_list,
            context.pod_name()
        );
        FilterResult::fail(
            name.to_string(),
            format!("node {} does not match expected {}", name, allow_list),
        )
    }

    fn name(&self) -> &str {
        NodeNames::NAME
    }
}
