use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::credentials::Credentials;
use super::error::{JiraError, Result};

/// Default timeout for a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated request/response channel to the Jira REST API.
///
/// Implementations return the parsed JSON body on success and
/// `JiraError::Http` for any non-success status.
pub trait Transport: Send + Sync {
  fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Value>>;

  fn post_json<'a>(&'a self, url: &'a Url, body: &'a Value) -> BoxFuture<'a, Result<Value>>;
}

/// reqwest-backed transport using HTTP basic auth.
#[derive(Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
  credentials: Credentials,
}

impl HttpTransport {
  pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self> {
    credentials.validate()?;

    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| JiraError::Transport(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      credentials,
    })
  }

  async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<Value> {
    let response = request
      .basic_auth(&self.credentials.username, Some(&self.credentials.password))
      .header(ACCEPT, "application/json")
      .send()
      .await
      .map_err(|e| JiraError::Transport(format!("{}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
      warn!(%url, status = status.as_u16(), "Jira request failed");
      return Err(JiraError::Http {
        status: status.as_u16(),
        url: url.to_string(),
      });
    }

    let bytes = response
      .bytes()
      .await
      .map_err(|e| JiraError::Transport(format!("{}: {}", url, e)))?;

    Ok(serde_json::from_slice(&bytes)?)
  }
}

impl Transport for HttpTransport {
  fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Value>> {
    debug!(%url, "GET");
    self.send(self.client.get(url.clone()), url).boxed()
  }

  fn post_json<'a>(&'a self, url: &'a Url, body: &'a Value) -> BoxFuture<'a, Result<Value>> {
    debug!(%url, "POST");
    async move {
      let payload = serde_json::to_vec(body)?;
      let request = self
        .client
        .post(url.clone())
        .header(CONTENT_TYPE, "application/json")
        .body(payload);
      self.send(request, url).await
    }
    .boxed()
  }
}
