//! Dispatcher
//!
//! Resolves an [`Invocation`] against the resource registry, performs the
//! resulting request(s) strictly in order, and renders the combined result.

use crate::api::ApiClient;
use crate::cli::Invocation;
use crate::config::Session;
use crate::error::CliError;
use crate::output::{filter_fields, render, write_lines, OutputMode};
use crate::resource::{build_requests, fetch_topology, get_resource, Action};
use serde_json::Value;
use std::io::Write;

/// Output mode used when `-o` is not given
pub fn default_mode(action: Action) -> OutputMode {
    match action {
        Action::List => OutputMode::Names,
        Action::Show => OutputMode::Tree,
        Action::Get | Action::Add | Action::Set | Action::Delete | Action::Resume | Action::Suspend => {
            OutputMode::Json
        }
    }
}

fn past_tense(action: Action) -> Option<&'static str> {
    match action {
        Action::Add => Some("created"),
        Action::Set => Some("updated"),
        Action::Delete => Some("deleted"),
        Action::Resume => Some("resumed"),
        Action::Suspend => Some("suspended"),
        Action::List | Action::Get | Action::Show => None,
    }
}

/// Perform the invocation and return the API result.
///
/// All request specs are built before the first network call, so usage
/// errors never reach the API. `get` with several identifiers returns a list
/// of results in input order; everything else returns the single response.
pub async fn execute(
    client: &ApiClient,
    session: &Session,
    invocation: &Invocation,
) -> Result<Value, CliError> {
    let resource = get_resource(invocation.resource)
        .ok_or_else(|| CliError::usage(format!("unknown resource '{}'", invocation.resource)))?;
    if !resource.supports(invocation.action) {
        return Err(CliError::usage(format!(
            "{} does not support '{}'",
            invocation.resource, invocation.action
        )));
    }

    if invocation.action == Action::Show {
        return fetch_topology(client, invocation.params.cluster.as_deref()).await;
    }

    let mut params = invocation.params.clone();
    if params.cluster.is_none() {
        params.cluster = session.default_cluster.clone();
    }

    let requests = build_requests(invocation.resource, resource, invocation.action, &params)?;
    tracing::debug!(
        "{} {}: {} request(s)",
        invocation.resource,
        invocation.action,
        requests.len()
    );

    let mut results = Vec::with_capacity(requests.len());
    for request in &requests {
        results.push(client.execute(request).await?);
    }

    if let Some(verb) = past_tense(invocation.action) {
        let target = params.identifiers().first().copied().unwrap_or("-").to_string();
        match &params.project {
            Some(project) if invocation.resource == "workload" => tracing::info!(
                "{} '{}' {} in project '{}'",
                resource.display_name,
                target,
                verb,
                project
            ),
            _ => tracing::info!("{} '{}' {}", resource.display_name, target, verb),
        }
    }

    Ok(match results.len() {
        1 => results.remove(0),
        _ => Value::Array(results),
    })
}

/// Run one invocation end to end, writing rendered output to `out`.
pub async fn run<W: Write>(
    session: &Session,
    invocation: &Invocation,
    out: &mut W,
) -> Result<(), CliError> {
    let client = ApiClient::new(session)?;
    let mut value = execute(&client, session, invocation).await?;

    if !invocation.filter.is_empty() {
        let fields: Vec<&str> = invocation.filter.iter().map(String::as_str).collect();
        value = filter_fields(&value, &fields);
    }

    let mode = invocation
        .output
        .unwrap_or_else(|| default_mode(invocation.action));
    write_lines(out, &render(&value, mode))?;
    out.flush()?;
    Ok(())
}
