//! Requests against the content API

use url::Url;

use crate::cache::CacheKey;
use crate::credentials::CredentialsProvider;
use crate::error::Result;
use crate::pagination::Pagination;

/// A fully built GET request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRequest {
    /// Absolute request URL, including the query
    pub url: Url,
    /// Bearer token for the `Authorization` header
    pub bearer_token: String,
}

impl ContentRequest {
    /// Cache key of this request
    ///
    /// The token travels in a header, so the URL alone identifies the response.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.url.as_str())
    }
}

/// Builds requests relative to a collection URL
#[derive(Clone, Debug)]
pub struct RequestBuilder {
    collection_url: Url,
    token: String,
}

impl RequestBuilder {
    /// Resolve credentials once and keep them for every request
    pub fn new(credentials: &dyn CredentialsProvider) -> Result<Self> {
        Ok(Self {
            collection_url: credentials.collection_url()?,
            token: credentials.access_token()?,
        })
    }

    /// `{collection_url}entries?limit={limit}&skip={skip}`
    pub fn entries(&self, pagination: Pagination) -> Result<ContentRequest> {
        let mut url = self.collection_url.join("entries")?;
        url.query_pairs_mut()
            .append_pair("limit", &pagination.limit.to_string())
            .append_pair("skip", &pagination.skip.to_string());
        Ok(ContentRequest {
            url,
            bearer_token: self.token.clone(),
        })
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::credentials::StaticCredentials;

    fn builder() -> RequestBuilder {
        let creds = StaticCredentials::for_space("secret", "space1", &ApiConfig::default()).unwrap();
        RequestBuilder::new(&creds).unwrap()
    }

    #[test]
    fn entries_url_carries_cursor() {
        let request = builder().entries(Pagination::new(100, 200)).unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://api.contentful.com/spaces/space1/environments/main/entries?limit=100&skip=200"
        );
        assert_eq!(request.bearer_token, "secret");
    }

    #[test]
    fn cache_key_excludes_token_and_differs_per_page() {
        let builder = builder();
        let first = builder.entries(Pagination::default()).unwrap();
        let second = builder.entries(Pagination::default().next()).unwrap();

        assert!(!first.cache_key().as_str().contains("secret"));
        assert_ne!(first.cache_key(), second.cache_key());
        assert_eq!(
            first.cache_key(),
            builder.entries(Pagination::default()).unwrap().cache_key()
        );
    }
}
