//! Jira Cloud REST client.
//!
//! - [`Connection`]: authenticated, cached access to the REST API
//! - `Transport`: the HTTP seam, implemented by `HttpTransport`
//! - [`SearchRequest`]: JQL search, answered in one of three result shapes
//! - [`Table`]: flattened view of an issue list

pub mod api_types;
mod cache;
mod client;
mod connection;
mod credentials;
mod error;
mod search;
mod table;
pub mod types;

#[cfg(test)]
pub use client::Transport;
pub use connection::{ConnectOptions, Connection};
pub use credentials::{ChainedSecrets, Credentials, SecretStore};
#[cfg(test)]
pub use credentials::{PASSWORD_KEY, USERNAME_KEY};
#[cfg(test)]
pub use error::JiraError;
pub use error::Result;
pub use search::{ReturnType, SearchRequest};
pub use table::Table;
