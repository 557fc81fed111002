//! Authenticated connection with per-call response caching.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::cache::{CacheLayer, CacheResult, CacheStats};

use super::cache::JiraQueryKey;
use super::client::{HttpTransport, Transport};
use super::credentials::{Credentials, SecretStore};
use super::error::{JiraError, Result, ResultExt};
use super::search::{ApiSearchResponse, SearchOutput, SearchRequest, SEARCH_ENDPOINT};

const PROJECT_ENDPOINT: &str = "/rest/api/3/project";
const ISSUE_ENDPOINT: &str = "/rest/api/3/issue";

/// Options for `Connection::connect`.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
  pub timeout: Duration,
  pub max_cache_entries: usize,
}

impl Default for ConnectOptions {
  fn default() -> Self {
    Self {
      timeout: super::client::DEFAULT_TIMEOUT,
      max_cache_entries: crate::cache::DEFAULT_MAX_ENTRIES,
    }
  }
}

/// A connection to one Jira instance.
///
/// Every query goes through the connection's own cache, keyed on all of the
/// call's arguments. A `ttl` of zero always refetches.
#[derive(Clone)]
pub struct Connection {
  base_url: String,
  transport: Arc<dyn Transport>,
  cache: CacheLayer,
}

impl Connection {
  /// Connect with explicit credentials, or ones read from `secrets`.
  pub fn connect(
    base_url: &str,
    credentials: Option<Credentials>,
    secrets: &dyn SecretStore,
    options: ConnectOptions,
  ) -> Result<Self> {
    let credentials = Credentials::resolve(credentials, secrets)?;
    let transport = HttpTransport::new(credentials, options.timeout)?;
    Self::with_transport(
      base_url,
      Arc::new(transport),
      CacheLayer::new(options.max_cache_entries),
    )
  }

  /// Build a connection over any transport.
  pub fn with_transport(
    base_url: &str,
    transport: Arc<dyn Transport>,
    cache: CacheLayer,
  ) -> Result<Self> {
    let base_url = base_url.trim_end_matches('/').to_string();
    Url::parse(&base_url)?;

    Ok(Self {
      base_url,
      transport,
      cache,
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn cache_stats(&self) -> CacheStats {
    self.cache.stats()
  }

  fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
    if !params.is_empty() {
      url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
  }

  async fn cached_get(&self, key: JiraQueryKey<'_>, url: Url, ttl: Duration) -> Result<Value> {
    let result = self
      .cache
      .get_or_fetch(&key.cache_hash(), ttl, || self.transport.get(&url))
      .await?;
    log_query(&key, ttl, &result);
    Ok(result.data)
  }

  /// GET `base_url + endpoint`. HTTP failures are returned as errors.
  pub async fn query(
    &self,
    endpoint: &str,
    params: &[(&str, &str)],
    ttl: Duration,
  ) -> Result<Value> {
    let url = self.url(endpoint, params)?;
    self
      .cached_get(JiraQueryKey::Get { endpoint, params }, url, ttl)
      .await
  }

  /// List projects visible to the authenticated user.
  pub async fn query_projects(&self, params: &[(&str, &str)], ttl: Duration) -> Result<Value> {
    self.query(PROJECT_ENDPOINT, params, ttl).await
  }

  /// Fetch a single issue by id or key.
  ///
  /// Returns `Ok(None)` when the server answers with an error status, which
  /// is how Jira reports unknown or hidden issues. Network failures are
  /// still errors.
  pub async fn query_issue(
    &self,
    issue_id: &str,
    params: &[(&str, &str)],
    ttl: Duration,
  ) -> Result<Option<Value>> {
    let issue_id = issue_id.trim();
    if issue_id.is_empty() {
      return Ok(None);
    }

    let mut url = self.url(ISSUE_ENDPOINT, params)?;
    url
      .path_segments_mut()
      .map_err(|_| JiraError::Validation(format!("Base URL cannot be a base: {}", self.base_url)))?
      .push(issue_id);

    // A missing issue is cached as null so repeat lookups stay local.
    let key = JiraQueryKey::Issue {
      id: issue_id,
      params,
    };
    let url = &url;
    let result = self
      .cache
      .get_or_fetch(&key.cache_hash(), ttl, move || async move {
        let found = self.transport.get(url).await.not_found_as_none()?;
        Ok::<_, JiraError>(found.unwrap_or(Value::Null))
      })
      .await?;
    log_query(&key, ttl, &result);

    Ok(match result.data {
      Value::Null => None,
      issue => Some(issue),
    })
  }

  /// Run a JQL search and shape the result as `request.return_type` asks.
  ///
  /// An empty query is rejected before anything is sent.
  pub async fn query_jql(&self, request: &SearchRequest, ttl: Duration) -> Result<SearchOutput> {
    request.validate()?;

    let url = self.url(SEARCH_ENDPOINT, &[])?;
    let body = request.body();
    let key = JiraQueryKey::Search { body: &body };

    let result = self
      .cache
      .get_or_fetch(&key.cache_hash(), ttl, || {
        self.transport.post_json(&url, &body)
      })
      .await?;
    log_query(&key, ttl, &result);

    let response: ApiSearchResponse = serde_json::from_value(result.data)?;
    Ok(SearchOutput::shape(response, request.return_type))
  }
}

fn log_query(key: &JiraQueryKey<'_>, ttl: Duration, result: &CacheResult<Value>) {
  debug!(
    query = %key.description(),
    ?ttl,
    source = ?result.source,
    expires_at = ?result.expires_at,
    "query"
  );
}
