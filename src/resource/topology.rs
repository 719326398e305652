//! Topology view
//!
//! Walks clusters, node groups, nodes, departments, projects and workloads
//! and assembles them into one tree. Requests are issued one at a time; the
//! first failure aborts the whole view.

use crate::api::ApiClient;
use crate::error::CliError;
use crate::output::extract_path;
use serde_json::{json, Value};
use std::borrow::Cow;

/// Fetch a list endpoint. An empty body counts as an empty list.
async fn fetch_list(client: &ApiClient, path: &str) -> Result<Vec<Value>, CliError> {
    match client.get(path).await? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(CliError::Decode(format!(
            "expected a list from {}, got {}",
            path,
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn field<'a>(item: &'a Value, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or("-")
}

fn uid<'a>(item: &'a Value, what: &str) -> Result<&'a str, CliError> {
    item.get("uid").and_then(Value::as_str).ok_or_else(|| {
        CliError::Decode(format!("{} '{}' has no uid", what, field(item, "name")))
    })
}

/// Path segment for a uid returned by the API
fn segment(uid: &str) -> Cow<'_, str> {
    urlencoding::encode(uid)
}

fn hardware(node: &Value, path: &str) -> String {
    match extract_path(node, path) {
        Some(Value::String(s)) => s.clone(),
        Some(v) if !v.is_null() => v.to_string(),
        _ => "unknown".to_string(),
    }
}

fn node_summary(node: &Value) -> Value {
    json!({
        "Node": field(node, "name"),
        "CPU": format!("{} cores", hardware(node, "cpu.cores")),
        "Memory": format!("{} GB", hardware(node, "memory.total")),
        "Network": node.get("network").cloned().unwrap_or_else(|| json!("unknown")),
        "Storage": node.get("storage").cloned().unwrap_or_else(|| json!("unknown")),
        "GPUs": node.get("gpus").cloned().unwrap_or_else(|| json!("None")),
    })
}

async fn node_groups(client: &ApiClient, cluster_uid: &str) -> Result<Vec<Value>, CliError> {
    tracing::debug!("Fetching node groups for cluster {}", cluster_uid);
    let mut out = Vec::new();
    for group in fetch_list(client, &format!("clusters/{}/nodeGroups", segment(cluster_uid))).await? {
        let group_uid = uid(&group, "node group")?;
        let nodes = fetch_list(client, &format!("nodegroups/{}/nodes", segment(group_uid))).await?;
        out.push(json!({
            "NodeGroup": field(&group, "name"),
            "Nodes": nodes.iter().map(node_summary).collect::<Vec<_>>(),
        }));
    }
    Ok(out)
}

async fn departments(client: &ApiClient, cluster_uid: &str) -> Result<Vec<Value>, CliError> {
    tracing::debug!("Fetching departments for cluster {}", cluster_uid);
    let mut out = Vec::new();
    for department in fetch_list(client, &format!("clusters/{}/departments", segment(cluster_uid))).await? {
        let department_uid = uid(&department, "department")?;
        let mut projects = Vec::new();
        for project in fetch_list(client, &format!("departments/{}/projects", segment(department_uid))).await? {
            let project_uid = uid(&project, "project")?;
            let workloads: Vec<Value> =
                fetch_list(client, &format!("projects/{}/workloads", segment(project_uid)))
                    .await?
                    .iter()
                    .map(|w| json!({ "Workload": field(w, "name") }))
                    .collect();
            projects.push(json!({
                "Project": field(&project, "name"),
                "Workloads": workloads,
            }));
        }
        out.push(json!({
            "Department": field(&department, "name"),
            "Projects": projects,
        }));
    }
    Ok(out)
}

/// Build the platform topology, optionally restricted to one cluster given
/// by name or uid.
pub async fn fetch_topology(client: &ApiClient, cluster: Option<&str>) -> Result<Value, CliError> {
    let mut clusters = fetch_list(client, "clusters").await?;

    if let Some(wanted) = cluster {
        clusters.retain(|c| field(c, "name") == wanted || field(c, "uid") == wanted);
        if clusters.is_empty() {
            return Err(CliError::NotFound(format!("cluster '{}' not found", wanted)));
        }
    } else if clusters.is_empty() {
        return Err(CliError::NotFound("no clusters found".to_string()));
    }

    let mut tree = Vec::with_capacity(clusters.len());
    for cluster in &clusters {
        let cluster_uid = uid(cluster, "cluster")?;
        tree.push(json!({
            "Cluster": field(cluster, "name"),
            "NodeGroups": node_groups(client, cluster_uid).await?,
            "Departments": departments(client, cluster_uid).await?,
        }));
    }

    Ok(json!({ "Clusters": tree }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_summary_formats_hardware() {
        let node = json!({
            "name": "n1",
            "cpu": {"cores": 64},
            "memory": {"total": 512},
            "network": "100GbE",
            "storage": {"nvme": "4TB"},
            "gpus": [{"model": "MI300X"}]
        });
        assert_eq!(
            node_summary(&node),
            json!({
                "Node": "n1",
                "CPU": "64 cores",
                "Memory": "512 GB",
                "Network": "100GbE",
                "Storage": {"nvme": "4TB"},
                "GPUs": [{"model": "MI300X"}]
            })
        );
    }

    #[test]
    fn node_summary_tolerates_missing_fields() {
        let summary = node_summary(&json!({"name": "bare"}));
        assert_eq!(summary["CPU"], "unknown cores");
        assert_eq!(summary["Memory"], "unknown GB");
        assert_eq!(summary["Network"], "unknown");
        assert_eq!(summary["GPUs"], "None");
    }

    #[test]
    fn uids_are_encoded_as_one_segment() {
        assert_eq!(segment("g/1{x}"), "g%2F1%7Bx%7D");
        assert_eq!(segment("plain-uid"), "plain-uid");
    }

    #[test]
    fn uid_is_required() {
        let err = uid(&json!({"name": "c1"}), "cluster").unwrap_err();
        assert_eq!(err.to_string(), "invalid response: cluster 'c1' has no uid");
    }
}
