//! Access credentials for the content API
//!
//! A [`CredentialsProvider`] supplies the bearer token and the collection URL of a
//! space. Both are resolved once, when the client is built.

use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Environment variable holding the API access token
pub const API_KEY_VAR: &str = "CONTENTFUL_API_KEY";
/// Environment variable holding the space id
pub const SPACE_ID_VAR: &str = "CONTENTFUL_SPACE_ID";

/// Source of the access token and collection URL
pub trait CredentialsProvider: Send + Sync {
    /// Bearer token sent with every request
    fn access_token(&self) -> Result<String>;

    /// Base URL of the collection, ending in `/`
    ///
    /// Entry requests are built relative to it (`{collection_url}entries?...`).
    fn collection_url(&self) -> Result<Url>;
}

/// Credentials known up front
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    token: String,
    collection_url: Url,
}

impl StaticCredentials {
    /// Credentials for an already known collection URL
    ///
    /// A trailing `/` is added when missing so relative joins keep the last segment.
    pub fn new(token: impl Into<String>, collection_url: &str) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::Credentials("access token is empty".into()));
        }
        let collection_url = if collection_url.ends_with('/') {
            Url::parse(collection_url)?
        } else {
            Url::parse(&format!("{collection_url}/"))?
        };
        Ok(Self {
            token,
            collection_url,
        })
    }

    /// Credentials for a space, with the URL derived from the API settings
    pub fn for_space(token: impl Into<String>, space_id: &str, api: &ApiConfig) -> Result<Self> {
        Self::new(token, space_url(api, space_id)?.as_str())
    }
}

impl CredentialsProvider for StaticCredentials {
    fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }

    fn collection_url(&self) -> Result<Url> {
        Ok(self.collection_url.clone())
    }
}

/// Credentials read from `CONTENTFUL_API_KEY` and `CONTENTFUL_SPACE_ID`
#[derive(Clone, Debug)]
pub struct EnvCredentials {
    api: ApiConfig,
}

impl EnvCredentials {
    /// Read the environment lazily, building URLs from `api`
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }
}

impl CredentialsProvider for EnvCredentials {
    fn access_token(&self) -> Result<String> {
        read_var(API_KEY_VAR)
    }

    fn collection_url(&self) -> Result<Url> {
        space_url(&self.api, &read_var(SPACE_ID_VAR)?)
    }
}

fn read_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => Err(Error::Credentials(format!("{name} is empty"))),
        Err(_) => Err(Error::Credentials(format!("{name} is not set"))),
    }
}

/// `{api_base}/spaces/{space}/environments/{environment}/`
fn space_url(api: &ApiConfig, space_id: &str) -> Result<Url> {
    if space_id.is_empty() {
        return Err(Error::Credentials("space id is empty".into()));
    }
    let base = api.api_base.trim_end_matches('/');
    Ok(Url::parse(&format!(
        "{base}/spaces/{space_id}/environments/{}/",
        api.environment
    ))?)
}
