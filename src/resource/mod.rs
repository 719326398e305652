//! Resource abstraction layer
//!
//! A data-driven description of the platform's resources. Each resource
//! declares the actions it supports and the endpoint template each action
//! maps to; the templates are loaded from JSON embedded at compile time.
//!
//! # Architecture
//!
//! - [`registry`] - Loads resource descriptors from embedded JSON
//! - [`request`] - Resolves descriptors plus flags into concrete requests
//! - [`topology`] - The aggregate topology view, which spans many endpoints
//!
//! # Example
//!
//! ```ignore
//! use mmaictl::resource::{build_requests, get_resource, Action, Params};
//!
//! let nodegroup = get_resource("nodegroup").unwrap();
//! let params = Params { cluster: Some("c-1".into()), ..Default::default() };
//! let requests = build_requests("nodegroup", nodegroup, Action::List, &params)?;
//! assert_eq!(requests[0].path, "clusters/c-1/nodeGroups");
//! ```

mod registry;
pub mod request;
pub mod topology;

pub use registry::*;
pub use request::{build_requests, parse_properties, Params};
pub use topology::fetch_topology;
