//! Command-line argument parsing with clap.
//!
//! Each resource gets its own action enum, so an action a resource does not
//! support is rejected by the parser itself. All of them lower into a single
//! [`Invocation`] for the dispatcher.

use crate::config::{Config, Session};
use crate::output::OutputMode;
use crate::resource::{Action, Params};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// mmaictl: manage platform resources like clusters, departments and node groups.
#[derive(Parser, Debug)]
#[command(name = "mmaictl", version = crate::VERSION, about, long_about = None)]
pub struct Cli {
    /// Base URL for the API
    #[arg(long, global = true, env = "MMAICTL_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Authentication token
    #[arg(long, global = true, env = "MMAICTL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Config file (defaults to <config dir>/mmaictl/config.json)
    #[arg(long, global = true, env = "MMAICTL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Build the session from these options layered over `config`
    pub fn session(&self, config: &Config) -> Session {
        Session::resolve(
            self.api_url.as_deref(),
            self.token.as_deref(),
            self.verbose,
            self.quiet,
            config,
        )
    }
}

/// Resources managed by mmaictl
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage clusters
    #[command(subcommand)]
    Cluster(CrudAction),
    /// Manage departments
    #[command(subcommand)]
    Department(CrudAction),
    /// Manage node groups
    #[command(subcommand)]
    Nodegroup(CrudAction),
    /// Manage projects
    #[command(subcommand)]
    Project(CrudAction),
    /// Manage workloads
    #[command(subcommand)]
    Workload(WorkloadAction),
    /// Inspect nodes
    #[command(subcommand)]
    Node(ReadAction),
    /// Billing details for departments in a cluster
    #[command(subcommand)]
    Billing(BillingAction),
    /// Platform topology: clusters, node groups, nodes, departments, projects, workloads
    #[command(subcommand)]
    Topology(TopologyAction),
}

/// Full create/read/update/delete set
#[derive(Subcommand, Debug)]
pub enum CrudAction {
    /// List resources
    List(ListArgs),
    /// Show one or more resources by name or uid
    Get(GetArgs),
    /// Create a resource
    Add(AddArgs),
    /// Update properties of a resource
    #[command(visible_alias = "update")]
    Set(SetArgs),
    /// Delete a resource
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug)]
pub enum WorkloadAction {
    /// List workloads in a cluster, optionally within one project
    List(ListArgs),
    /// Show one or more workloads of a project
    Get(GetArgs),
    /// Delete a workload
    Delete(DeleteArgs),
    /// Resume a suspended workload
    Resume(WorkloadTargetArgs),
    /// Suspend a running workload
    Suspend(WorkloadTargetArgs),
}

#[derive(Subcommand, Debug)]
pub enum ReadAction {
    /// List resources
    List(ListArgs),
    /// Show one or more resources by name or uid
    Get(GetArgs),
}

#[derive(Subcommand, Debug)]
pub enum BillingAction {
    /// List billing details for the departments of a cluster
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum TopologyAction {
    /// Show the hardware/software topology as a tree
    Show(TopologyArgs),
}

/// Parent scope flags used to fill endpoint paths
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Cluster name or UID
    #[arg(long)]
    pub cluster: Option<String>,
    /// Project name or UID
    #[arg(long)]
    pub project: Option<String>,
    /// Department name or UID
    #[arg(long)]
    pub department: Option<String>,
    /// Node group name or UID
    #[arg(long)]
    pub nodegroup: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// Comma-separated list of fields to display (e.g. "name,cpu.cores")
    #[arg(long, value_delimiter = ',')]
    pub filter: Vec<String>,
}

/// Identifiers selecting resource instances
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Resource name (repeatable)
    #[arg(short = 'n', long = "name", value_name = "NAME", value_parser = NonEmptyStringValueParser::new())]
    pub names: Vec<String>,

    /// Resource UID (repeatable)
    #[arg(long = "uid", value_name = "UID", value_parser = NonEmptyStringValueParser::new())]
    pub uids: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("target").required(true).multiple(true).args(["names", "uids"])))]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Name of the new resource
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub name: String,
    /// Description of the new resource
    #[arg(long)]
    pub description: Option<String>,
    /// Additional properties
    #[arg(value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("target").required(true).multiple(true).args(["names", "uids"])))]
pub struct SetArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// New name for the resource
    #[arg(long)]
    pub new_name: Option<String>,
    /// New description for the resource
    #[arg(long)]
    pub description: Option<String>,
    /// Properties to change
    #[arg(value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("target").required(true).multiple(true).args(["names", "uids"])))]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WorkloadTargetArgs {
    /// Project name
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub project: String,
    /// Workload name
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub name: String,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct TopologyArgs {
    /// Only show this cluster (name or UID)
    #[arg(long)]
    pub cluster: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
}

/// A parsed command, independent of which resource enum it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub resource: &'static str,
    pub action: Action,
    pub params: Params,
    pub output: Option<OutputMode>,
    pub filter: Vec<String>,
}

impl Invocation {
    fn new(resource: &'static str, action: Action, params: Params, output: OutputArgs) -> Self {
        Self {
            resource,
            action,
            params,
            output: output.output,
            filter: output.filter,
        }
    }
}

fn scoped(scope: ScopeArgs) -> Params {
    Params {
        cluster: scope.cluster,
        project: scope.project,
        department: scope.department,
        nodegroup: scope.nodegroup,
        ..Default::default()
    }
}

fn targeted(target: TargetArgs, scope: ScopeArgs) -> Params {
    Params {
        names: target.names,
        uids: target.uids,
        ..scoped(scope)
    }
}

fn list(resource: &'static str, args: ListArgs) -> Invocation {
    Invocation::new(resource, Action::List, scoped(args.scope), args.output)
}

fn get(resource: &'static str, args: GetArgs) -> Invocation {
    Invocation::new(resource, Action::Get, targeted(args.target, args.scope), args.output)
}

fn delete(resource: &'static str, args: DeleteArgs) -> Invocation {
    Invocation::new(resource, Action::Delete, targeted(args.target, args.scope), args.output)
}

impl CrudAction {
    fn into_invocation(self, resource: &'static str) -> Invocation {
        match self {
            CrudAction::List(args) => list(resource, args),
            CrudAction::Get(args) => get(resource, args),
            CrudAction::Add(args) => {
                let params = Params {
                    names: vec![args.name],
                    description: args.description,
                    properties: args.properties,
                    ..scoped(args.scope)
                };
                Invocation::new(resource, Action::Add, params, args.output)
            }
            CrudAction::Set(args) => {
                let params = Params {
                    new_name: args.new_name,
                    description: args.description,
                    properties: args.properties,
                    ..targeted(args.target, args.scope)
                };
                Invocation::new(resource, Action::Set, params, args.output)
            }
            CrudAction::Delete(args) => delete(resource, args),
        }
    }
}

impl WorkloadAction {
    fn into_invocation(self) -> Invocation {
        const RESOURCE: &str = "workload";
        let toggle = |action: Action, args: WorkloadTargetArgs| {
            let params = Params {
                names: vec![args.name],
                project: Some(args.project),
                ..Default::default()
            };
            Invocation::new(RESOURCE, action, params, args.output)
        };

        match self {
            WorkloadAction::List(args) => list(RESOURCE, args),
            WorkloadAction::Get(args) => get(RESOURCE, args),
            WorkloadAction::Delete(args) => delete(RESOURCE, args),
            WorkloadAction::Resume(args) => toggle(Action::Resume, args),
            WorkloadAction::Suspend(args) => toggle(Action::Suspend, args),
        }
    }
}

impl Command {
    /// Lower the parsed subcommand into a resource-agnostic invocation
    pub fn into_invocation(self) -> Invocation {
        match self {
            Command::Cluster(action) => action.into_invocation("cluster"),
            Command::Department(action) => action.into_invocation("department"),
            Command::Nodegroup(action) => action.into_invocation("nodegroup"),
            Command::Project(action) => action.into_invocation("project"),
            Command::Workload(action) => action.into_invocation(),
            Command::Node(ReadAction::List(args)) => list("node", args),
            Command::Node(ReadAction::Get(args)) => get("node", args),
            Command::Billing(BillingAction::List(args)) => list("billing", args),
            Command::Topology(TopologyAction::Show(args)) => {
                let params = Params {
                    cluster: args.cluster,
                    ..Default::default()
                };
                Invocation::new("topology", Action::Show, params, args.output)
            }
        }
    }
}
