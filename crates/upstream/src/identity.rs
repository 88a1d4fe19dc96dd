//! User identity lookups.
//!
//! Identity is a soft dependency: every failure resolves to
//! [`Identity::unknown`] so that a missing or unreachable user never fails
//! an aggregation.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::error::UpstreamError;
use crate::http::{endpoint, parse_base_url, parse_json};

/// Username shown when an identity cannot be resolved.
pub const UNKNOWN_USERNAME: &str = "unknown user";

/// Base of the generated placeholder avatars.
const PLACEHOLDER_AVATAR_BASE: &str = "https://ui-avatars.com/api/";

const SERVICE: &str = "identity service";

/// Display identity of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub email: Option<String>,
    /// Avatar stored by the identity service, if any.
    pub avatar_url: Option<String>,
}

impl Identity {
    pub fn unknown() -> Self {
        Self {
            username: UNKNOWN_USERNAME.to_string(),
            email: None,
            avatar_url: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.username == UNKNOWN_USERNAME && self.email.is_none()
    }

    /// The stored avatar, or a placeholder derived from the username.
    pub fn avatar_or_placeholder(&self) -> String {
        match &self.avatar_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => placeholder_avatar(&self.username),
        }
    }
}

/// Deterministic placeholder avatar URL for `username`.
pub fn placeholder_avatar(username: &str) -> String {
    Url::parse_with_params(PLACEHOLDER_AVATAR_BASE, &[("name", username)])
        .map(String::from)
        .unwrap_or_else(|_| PLACEHOLDER_AVATAR_BASE.to_string())
}

/// Resolves user ids to display identities. Never fails.
#[async_trait]
pub trait IdentityLookup: Send + Sync + 'static {
    async fn resolve(&self, user_id: &str) -> Identity;
}

/// Wire shape of `GET /users/{id}`.
#[derive(Debug, Deserialize)]
struct UserRecord {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

/// [`IdentityLookup`] over the identity service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpIdentityClient {
    /// * `base_url` - e.g. `http://user-service:8000`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Single attempt, no retries.
    pub async fn fetch(&self, user_id: &str) -> Result<Identity, UpstreamError> {
        let url = endpoint(&self.base_url, &["users", user_id]);
        let response = self.client.get(url).send().await?;
        let record: UserRecord = parse_json(SERVICE, response).await?;

        let username = record
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Ok(match username {
            Some(username) => Identity {
                username,
                email: record.email,
                avatar_url: record.avatar_url,
            },
            None => Identity::unknown(),
        })
    }
}

#[async_trait]
impl IdentityLookup for HttpIdentityClient {
    async fn resolve(&self, user_id: &str) -> Identity {
        if user_id.is_empty() {
            return Identity::unknown();
        }
        match self.fetch(user_id).await {
            Ok(identity) => identity,
            Err(UpstreamError::Status { status: 404, .. }) => {
                tracing::debug!(user_id, "User not found, using placeholder identity");
                Identity::unknown()
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Identity lookup failed, using placeholder identity");
                Identity::unknown()
            }
        }
    }
}
