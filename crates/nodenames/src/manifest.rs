use nodenames_scheduler::{Node, Pod, PluginArgs};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse a YAML or JSON manifest (JSON is valid YAML)
fn load<T: DeserializeOwned>(path: &Path) -> miette::Result<T> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("Failed to read '{}': {}", path.display(), e))?;

    serde_yaml::from_str(&data)
        .map_err(|e| miette::miette!("Failed to parse '{}': {}", path.display(), e))
}

/// Load the pod to schedule
pub fn load_pod(path: &Path) -> miette::Result<Pod> {
    load(path)
}

/// Build the candidate list from `--node` names and an optional nodes file
pub fn load_nodes(names: &[String], nodes_file: Option<&Path>) -> miette::Result<Vec<Node>> {
    let mut nodes: Vec<Node> = names
        .iter()
        .map(|name| {
            let mut node = Node::default();
            node.metadata.name = Some(name.clone());
            node
        })
        .collect();

    if let Some(path) = nodes_file {
        let listed: Vec<Node> = load(path)?;
        nodes.extend(listed);
    }

    Ok(nodes)
}

/// Plugin arguments from `--config`, defaults otherwise
pub fn load_plugin_args(path: Option<&Path>) -> miette::Result<PluginArgs> {
    match path {
        Some(path) => Ok(PluginArgs::from_file(path)?),
        None => Ok(PluginArgs::default()),
    }
}
