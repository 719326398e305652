//! Request construction
//!
//! Turns a resource descriptor plus parsed flags into fully resolved
//! [`RequestSpec`]s. Everything here runs before any network call, so every
//! failure is a usage error.

use super::registry::{placeholders, Action, ActionDef, ResourceDef};
use crate::api::RequestSpec;
use crate::error::CliError;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Flags collected from the command line for one resource action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    /// `--name`, in the order given
    pub names: Vec<String>,
    /// `--uid`, in the order given
    pub uids: Vec<String>,
    pub cluster: Option<String>,
    pub project: Option<String>,
    pub department: Option<String>,
    pub nodegroup: Option<String>,
    pub new_name: Option<String>,
    pub description: Option<String>,
    /// Positional `key=value` pairs
    pub properties: Vec<String>,
}

impl Params {
    /// All identifiers: names first, then uids, each in input order
    pub fn identifiers(&self) -> Vec<&str> {
        self.names
            .iter()
            .chain(self.uids.iter())
            .map(String::as_str)
            .collect()
    }

    /// Values available for path placeholders (other than `{id}`)
    fn placeholder_values(&self) -> HashMap<&'static str, String> {
        let mut values = HashMap::new();
        let scopes = [
            ("cluster", &self.cluster),
            ("project", &self.project),
            ("department", &self.department),
            ("nodegroup", &self.nodegroup),
        ];
        for (key, value) in scopes {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                values.insert(key, v.to_string());
            }
        }
        values
    }
}

/// Parse positional `key=value` arguments, splitting on the first `=`.
pub fn parse_properties(args: &[String]) -> Result<Map<String, Value>, CliError> {
    let mut props = Map::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(CliError::usage(format!(
                "invalid property '{}': expected key=value",
                arg
            )));
        };
        if key.is_empty() {
            return Err(CliError::usage(format!(
                "invalid property '{}': empty key",
                arg
            )));
        }
        props.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(props)
}

/// Fill every placeholder in `template`, percent-encoding each value as one
/// path segment. Returns `None` if any placeholder has no value.
pub fn resolve_path(template: &str, values: &HashMap<&str, String>) -> Option<String> {
    let mut path = template.to_string();
    for name in placeholders(template) {
        let value = values.get(name)?;
        path = path.replace(&format!("{{{}}}", name), &urlencoding::encode(value));
    }
    Some(path)
}

fn flag_for(placeholder: &str) -> String {
    match placeholder {
        "id" => "--name or --uid".to_string(),
        other => format!("--{}", other),
    }
}

/// Pick the first template that resolves completely.
fn select_path(
    resource_key: &str,
    action: Action,
    def: &ActionDef,
    values: &HashMap<&str, String>,
) -> Result<String, CliError> {
    if let Some(path) = def.paths.iter().find_map(|t| resolve_path(t, values)) {
        return Ok(path);
    }

    // Report against the most general template: it needs the fewest flags.
    let fallback = def.paths.last().map(String::as_str).unwrap_or_default();
    let missing: Vec<String> = placeholders(fallback)
        .into_iter()
        .filter(|p| !values.contains_key(p))
        .map(flag_for)
        .collect();
    Err(CliError::usage(format!(
        "{} {} requires {}",
        resource_key,
        action,
        missing.join(", ")
    )))
}

fn query_for(def: &ActionDef, values: &HashMap<&str, String>) -> Vec<(String, String)> {
    def.query
        .iter()
        .filter_map(|q| {
            values
                .get(q.placeholder.as_str())
                .map(|v| (q.param.clone(), v.clone()))
        })
        .collect()
}

/// An empty identifier would resolve `{id}` to the collection endpoint.
fn non_empty<'a>(resource_key: &str, action: Action, id: &'a str) -> Result<&'a str, CliError> {
    if id.is_empty() {
        return Err(CliError::usage(format!(
            "{} {}: identifier must not be empty",
            resource_key, action
        )));
    }
    Ok(id)
}

fn single_identifier<'a>(
    resource_key: &str,
    action: Action,
    params: &'a Params,
) -> Result<&'a str, CliError> {
    match params.identifiers().as_slice() {
        [one] => non_empty(resource_key, action, *one),
        [] => Err(CliError::usage(format!(
            "{} {} requires --name or --uid",
            resource_key, action
        ))),
        _ => Err(CliError::usage(format!(
            "{} {} takes exactly one identifier",
            resource_key, action
        ))),
    }
}

/// Build the request(s) for one resource action.
///
/// `get` yields one request per identifier, in input order; every other
/// action yields exactly one.
pub fn build_requests(
    resource_key: &str,
    resource: &ResourceDef,
    action: Action,
    params: &Params,
) -> Result<Vec<RequestSpec>, CliError> {
    let def = resource.action(action).ok_or_else(|| {
        CliError::usage(format!(
            "{} does not support '{}'",
            resource_key, action
        ))
    })?;

    let mut values = params.placeholder_values();
    let query = query_for(def, &values);

    let spec = |path: String| RequestSpec {
        method: def.method,
        path,
        query: query.clone(),
        body: None,
    };

    match action {
        Action::List | Action::Show => {
            let path = select_path(resource_key, action, def, &values)?;
            Ok(vec![spec(path)])
        }
        Action::Get => {
            let ids = params.identifiers();
            if ids.is_empty() {
                return Err(CliError::usage(format!(
                    "{} get requires at least one --name or --uid",
                    resource_key
                )));
            }
            for id in &ids {
                non_empty(resource_key, action, id)?;
            }
            ids.into_iter()
                .map(|id| {
                    values.insert("id", id.to_string());
                    select_path(resource_key, action, def, &values).map(&spec)
                })
                .collect()
        }
        Action::Add => {
            let name = match params.names.as_slice() {
                [one] => non_empty(resource_key, action, one)?,
                _ => {
                    return Err(CliError::usage(format!(
                        "{} add requires exactly one --name",
                        resource_key
                    )))
                }
            };
            let mut body = Map::new();
            body.insert("name".to_string(), Value::String(name.to_string()));
            if let Some(description) = &params.description {
                body.insert("description".to_string(), Value::String(description.clone()));
            }
            body.extend(parse_properties(&params.properties)?);

            let path = select_path(resource_key, action, def, &values)?;
            Ok(vec![spec(path).with_body(Value::Object(body))])
        }
        Action::Set => {
            let mut body = parse_properties(&params.properties)?;
            if let Some(new_name) = &params.new_name {
                body.insert("name".to_string(), Value::String(new_name.clone()));
            }
            if let Some(description) = &params.description {
                body.insert("description".to_string(), Value::String(description.clone()));
            }
            if body.is_empty() {
                return Err(CliError::usage(format!(
                    "{} set requires at least one key=value property",
                    resource_key
                )));
            }

            let id = single_identifier(resource_key, action, params)?;
            values.insert("id", id.to_string());
            let path = select_path(resource_key, action, def, &values)?;
            Ok(vec![spec(path).with_body(Value::Object(body))])
        }
        Action::Delete | Action::Resume | Action::Suspend => {
            let id = single_identifier(resource_key, action, params)?;
            values.insert("id", id.to_string());
            let path = select_path(resource_key, action, def, &values)?;
            Ok(vec![spec(path)])
        }
    }
}
