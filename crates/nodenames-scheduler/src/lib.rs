//! Nodenames Scheduler - pin pods to an explicit list of nodes
//!
//! This crate provides:
//! - `nodeNames` annotation parsing
//! - The NodeNames filter (node must appear in the pod's allow-list)
//! - Raw scoring and per-cycle score normalization
//! - A scheduling cycle driver running filters and scorers in parallel

pub mod allow_list;
pub mod config;
pub mod error;
pub mod filter;
pub mod plugin;
pub mod scheduler;
pub mod score;
pub mod types;

// Re-export commonly used types
pub use allow_list::AllowList;
pub use config::{PluginArgs, SchedulerConfig};
pub use error::{Result, SchedulerError};
pub use filter::FilterPredicate;
pub use plugin::NodeNames;
pub use scheduler::{ScheduleOutcome, Scheduler};
pub use score::{ScoreExtensions, ScoreFunction};
pub use types::{FilterResult, SchedulingContext, ScoreResult};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::core::v1::{Node, Pod};
