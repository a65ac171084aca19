//! ProfitBricks Cloud API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::{ProfitBricksError, Result};

const DEFAULT_API_URL: &str = "https://api.profitbricks.com/cloudapi/v4";
const USER_AGENT: &str = concat!("profitbricks-rs/", env!("CARGO_PKG_VERSION"));

/// Default nesting depth requested on GET calls.
pub const DEFAULT_DEPTH: u32 = 5;

/// Low-level Cloud API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update` and `Delete`
/// traits on model types.
///
/// Every request method takes the status code the call is expected to
/// answer with; any other code becomes
/// [`ProfitBricksError::UnexpectedStatus`].
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use profitbricks::ProfitBricksClient;
///
/// # async fn example() -> profitbricks::Result<()> {
/// // Create from environment variables
/// let client = ProfitBricksClient::from_env()?;
///
/// // Or configure manually
/// let client = ProfitBricksClient::new(
///     "user@example.com",
///     "secret",
///     "https://api.profitbricks.com/cloudapi/v4",
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProfitBricksClient {
    http: Client,
    base_url: Arc<Url>,
    username: String,
    password: String,
    depth: u32,
}

impl std::fmt::Debug for ProfitBricksClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfitBricksClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl ProfitBricksClient {
    /// Create a client from environment variables.
    ///
    /// Uses `PROFITBRICKS_USERNAME` and `PROFITBRICKS_PASSWORD` for
    /// authentication and optionally `PROFITBRICKS_API_URL` for the base URL
    /// (defaults to `https://api.profitbricks.com/cloudapi/v4`).
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are not set.
    pub fn from_env() -> Result<Self> {
        let username = env::var("PROFITBRICKS_USERNAME").map_err(|_| {
            ProfitBricksError::ConfigMissing(
                "PROFITBRICKS_USERNAME environment variable not set".to_string(),
            )
        })?;
        let password = env::var("PROFITBRICKS_PASSWORD").map_err(|_| {
            ProfitBricksError::ConfigMissing(
                "PROFITBRICKS_PASSWORD environment variable not set".to_string(),
            )
        })?;

        let base_url =
            env::var("PROFITBRICKS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&username, &password, &base_url)
    }

    /// Create a new client with explicit credentials and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(username: &str, password: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with / so relative paths keep its prefix
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(ProfitBricksError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            username: username.to_string(),
            password: password.to_string(),
            depth: DEFAULT_DEPTH,
        })
    }

    /// Override the `depth` query parameter sent with GET requests.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the configured GET depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Resolve a path against the base URL.
    ///
    /// Relative paths (`snapshots/1`) keep the base path, rooted paths
    /// (`/requests/1/status`) replace it and absolute URLs are used as-is.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Make a GET request.
    ///
    /// `path` may also be an absolute URL, such as a request status URL
    /// taken from a `location` header.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str, expected: StatusCode) -> Result<Response> {
        self.get_with_query(path, &[] as &[(&str, &str)], expected)
            .await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
        expected: StatusCode,
    ) -> Result<Response> {
        let url = self.resolve(path)?;

        let response = self
            .request(Method::GET, url)
            .query(&[("depth", self.depth)])
            .query(query)
            .send()
            .await
            .map_err(ProfitBricksError::HttpError)?;

        Self::check_response(response, expected).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<Response> {
        let url = self.resolve(path)?;

        let response = self
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(ProfitBricksError::HttpError)?;

        Self::check_response(response, expected).await
    }

    /// Make a PATCH request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<Response> {
        let url = self.resolve(path)?;

        let response = self
            .request(Method::PATCH, url)
            .json(body)
            .send()
            .await
            .map_err(ProfitBricksError::HttpError)?;

        Self::check_response(response, expected).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str, expected: StatusCode) -> Result<Response> {
        let url = self.resolve(path)?;

        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(ProfitBricksError::HttpError)?;

        Self::check_response(response, expected).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response, expected: StatusCode) -> Result<Response> {
        let status = response.status();

        if status == expected {
            return Ok(response);
        }

        // Handle rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ProfitBricksError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(ProfitBricksError::UnexpectedStatus {
            expected: expected.as_u16(),
            status: status.as_u16(),
            message,
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // The API reports {"httpStatus": 404, "messages": [{"errorCode": "309", "message": ".."}]}
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json
                .pointer("/messages/0/message")
                .and_then(|m| m.as_str())
            {
                return msg.to_string();
            }
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

/// Read the `location` header of an accepted response.
pub(crate) fn location_header(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client =
            ProfitBricksClient::new("user", "test-password", "https://api.example.com/cloudapi/v4")
                .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("ProfitBricksClient"));
        assert!(debug.contains("base_url"));
        // Password should not be in debug output
        assert!(!debug.contains("test-password"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = ProfitBricksClient::new("u", "p", "https://api.example.com/cloudapi/v4").unwrap();
        let client2 =
            ProfitBricksClient::new("u", "p", "https://api.example.com/cloudapi/v4/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_resolve_relative_rooted_and_absolute() {
        let client = ProfitBricksClient::new("u", "p", "https://api.example.com/cloudapi/v4").unwrap();

        assert_eq!(
            client.resolve("snapshots/9").unwrap().as_str(),
            "https://api.example.com/cloudapi/v4/snapshots/9"
        );
        assert_eq!(
            client.resolve("/requests/42/status").unwrap().as_str(),
            "https://api.example.com/requests/42/status"
        );
        assert_eq!(
            client
                .resolve("https://other.example.com/cloudapi/v4/requests/1/status")
                .unwrap()
                .as_str(),
            "https://other.example.com/cloudapi/v4/requests/1/status"
        );
    }

    #[test]
    fn test_with_depth() {
        let client = ProfitBricksClient::new("u", "p", "https://api.example.com").unwrap();
        assert_eq!(client.depth(), DEFAULT_DEPTH);
        assert_eq!(client.with_depth(10).depth(), 10);
    }
}
