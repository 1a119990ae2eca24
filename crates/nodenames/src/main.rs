mod manifest;

use clap::{Parser, Subcommand};
use nodenames_scheduler::score::{check_raw_score, normalize};
use nodenames_scheduler::{
    FilterPredicate, NodeNames, PluginArgs, SchedulerConfig, Scheduler, SchedulingContext,
    ScoreResult,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "nodenames", about = "NodeNames scheduling plugin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check which nodes a pod may be placed on
    Filter {
        /// Pod manifest (YAML or JSON)
        #[arg(long)]
        pod: PathBuf,
        /// Candidate node name (repeatable)
        #[arg(long = "node", required = true)]
        nodes: Vec<String>,
        /// Plugin arguments file (YAML or JSON)
        #[arg(long, env = "NODENAMES_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Run one scheduling cycle and print the ranking
    Schedule {
        /// Pod manifest (YAML or JSON)
        #[arg(long)]
        pod: PathBuf,
        /// Candidate node name (repeatable)
        #[arg(long = "node")]
        nodes: Vec<String>,
        /// File holding a list of Node manifests
        #[arg(long)]
        nodes_file: Option<PathBuf>,
        /// Plugin arguments file (YAML or JSON)
        #[arg(long, env = "NODENAMES_CONFIG")]
        config: Option<PathBuf>,
        /// Maximum number of nodes evaluated at once
        #[arg(long, default_value_t = 16)]
        parallelism: usize,
    },
    /// Normalize a batch of raw scores into 0-100
    Normalize {
        /// Raw scores, in candidate order
        #[arg(required = true)]
        scores: Vec<i64>,
        /// Plugin arguments file (YAML or JSON)
        #[arg(long, env = "NODENAMES_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filter { pod, nodes, config } => run_filter(&pod, &nodes, config.as_deref()),
        Commands::Schedule {
            pod,
            nodes,
            nodes_file,
            config,
            parallelism,
        } => {
            run_schedule(
                &pod,
                &nodes,
                nodes_file.as_deref(),
                config.as_deref(),
                parallelism,
            )
            .await
        }
        Commands::Normalize { scores, config } => run_normalize(&scores, config.as_deref()),
    }
}

/// Print the filter verdict for every node
fn run_filter(
    pod: &std::path::Path,
    names: &[String],
    config: Option<&std::path::Path>,
) -> miette::Result<()> {
    let plugin = NodeNames::new(manifest::load_plugin_args(config)?)?;
    let context = SchedulingContext::new(manifest::load_pod(pod)?);
    let nodes = manifest::load_nodes(names, None)?;

    info!("Filtering {} nodes for pod {}", nodes.len(), context.pod_name());

    for node in &nodes {
        let result = plugin.filter(&context, node);
        match result.reason {
            None => println!("ACCEPT {}", result.node_name),
            Some(reason) => println!("REJECT {}: {}", result.node_name, reason),
        }
    }

    Ok(())
}

/// Run a full cycle and print the ranking, best first
async fn run_schedule(
    pod: &std::path::Path,
    names: &[String],
    nodes_file: Option<&std::path::Path>,
    config: Option<&std::path::Path>,
    parallelism: usize,
) -> miette::Result<()> {
    let config = SchedulerConfig {
        plugin_args: manifest::load_plugin_args(config)?,
        parallelism,
    };
    let scheduler = Scheduler::new(config)?;
    let pod = manifest::load_pod(pod)?;
    let nodes = manifest::load_nodes(names, nodes_file)?;

    let outcome = scheduler.schedule_pod(&pod, &nodes).await?;

    for result in outcome.filtered.iter().filter(|r| !r.passed) {
        println!(
            "REJECT {}: {}",
            result.node_name,
            result.reason.as_deref().unwrap_or_default()
        );
    }
    for (rank, score) in outcome.ranking.iter().enumerate() {
        println!("{:>3}. {} {}", rank + 1, score.node_name, score.score);
    }
    println!("selected: {}", outcome.selected_node);

    Ok(())
}

/// Normalize literal raw scores the way a cycle would
fn run_normalize(raw: &[i64], config: Option<&std::path::Path>) -> miette::Result<()> {
    let args = manifest::load_plugin_args(config)?;
    let normalized = normalize_raw(raw, &args)?;

    let rendered: Vec<String> = normalized.iter().map(i64::to_string).collect();
    println!("{}", rendered.join(" "));

    Ok(())
}

/// Check every raw score against `maxRawScore`, then normalize the batch
fn normalize_raw(raw: &[i64], args: &PluginArgs) -> miette::Result<Vec<i64>> {
    for score in raw {
        check_raw_score(*score, args.max_raw_score)?;
    }

    let mut batch: Vec<ScoreResult> = raw
        .iter()
        .enumerate()
        .map(|(i, score)| ScoreResult::new(i.to_string(), *score))
        .collect();
    normalize(&mut batch, args.max_raw_score, args.uniform_score);

    Ok(batch.into_iter().map(|s| s.score).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_schedule() {
        let cli = Cli::try_parse_from([
            "nodenames",
            "schedule",
            "--pod",
            "pod.yaml",
            "--node",
            "nodeA",
            "--node",
            "nodeB",
        ])
        .unwrap();

        match cli.command {
            Commands::Schedule {
                nodes, parallelism, ..
            } => {
                assert_eq!(nodes, vec!["nodeA", "nodeB"]);
                assert_eq!(parallelism, 16);
            }
            _ => panic!("expected schedule"),
        }
    }

    #[test]
    fn test_filter_requires_nodes() {
        assert!(Cli::try_parse_from(["nodenames", "filter", "--pod", "pod.yaml"]).is_err());
    }

    #[test]
    fn test_normalize_raw() {
        let args = PluginArgs::default();
        assert_eq!(normalize_raw(&[3, 7, 10], &args).unwrap(), vec![0, 57, 100]);
        assert_eq!(normalize_raw(&[5, 5, 5], &args).unwrap(), vec![100, 100, 100]);
    }

    #[test]
    fn test_normalize_raw_rejects_out_of_range() {
        let args = PluginArgs::default();

        let err = normalize_raw(&[3, 11], &args).unwrap_err();
        assert!(err.to_string().contains("raw score 11"));
        assert!(err.to_string().contains("10"));

        assert!(normalize_raw(&[-1, 4], &args).is_err());
        assert!(normalize_raw(&[0, i64::MAX / 10], &args).is_err());

        let wide = PluginArgs {
            max_raw_score: 50,
            ..Default::default()
        };
        assert_eq!(normalize_raw(&[20, 30], &wide).unwrap(), vec![0, 100]);
    }

    #[test]
    fn test_parse_normalize() {
        let cli = Cli::try_parse_from(["nodenames", "normalize", "3", "7", "10"]).unwrap();
        match cli.command {
            Commands::Normalize { scores, .. } => assert_eq!(scores, vec![3, 7, 10]),
            _ => panic!("expected normalize"),
        }
    }
}
