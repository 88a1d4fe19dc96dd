//! HTTP clients for the services this one aggregates from: the remote
//! configuration store and the user identity service.

pub mod configs;
pub mod error;
pub mod http;
pub mod identity;

pub use configs::{ConfigLookup, HttpConfigClient};
pub use error::UpstreamError;
pub use identity::{HttpIdentityClient, Identity, IdentityLookup};
