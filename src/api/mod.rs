//! Platform API interaction module
//!
//! # Module Structure
//!
//! - [`http`] - HTTP adapter: one request, bearer auth, JSON in and out
//! - [`client`] - API client bound to a session's base URL and token
//!
//! # Example
//!
//! ```ignore
//! use mmaictl::api::ApiClient;
//!
//! async fn example() -> Result<(), mmaictl::CliError> {
//!     let client = ApiClient::with_base_url("http://localhost:32323/v1", Some("token"))?;
//!     let clusters = client.get("clusters").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;

pub use client::{ApiClient, RequestSpec};
pub use http::{HttpClient, Method};
