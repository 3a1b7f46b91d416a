//! Authenticated transport for the control-plane API
//!
//! Every request carries the versioned `Accept` header and is authenticated
//! with HTTP digest using the public/private key pair. The first request
//! answers the server's challenge; the challenge is then cached so later
//! requests authenticate up front with an incremented nonce count.

use std::sync::Mutex;
use std::time::Duration;

use digest_auth::{AuthContext, HttpMethod, WwwAuthenticateHeader};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::{ApiCredentials, Config};
use crate::error::{CoreError, Result};

/// User agent string for atlasctl HTTP requests
const ATLASCTL_USER_AGENT: &str = concat!("atlasctl/", env!("CARGO_PKG_VERSION"));

/// Status code and raw body of an API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body, naming `context` in the error
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| CoreError::InvalidResponse {
            context: context.to_string(),
            message: e.to_string(),
        })
    }

    /// Turn this response into a remote-rejection error
    pub fn into_error(self, context: impl Into<String>) -> CoreError {
        CoreError::api(context, self.status.as_u16(), self.body)
    }
}

/// Control-plane API client
pub struct AtlasClient {
    http: reqwest::Client,
    base_url: String,
    accept: String,
    credentials: ApiCredentials,
    challenge: Mutex<Option<WwwAuthenticateHeader>>,
}

impl std::fmt::Debug for AtlasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasClient")
            .field("base_url", &self.base_url)
            .field("accept", &self.accept)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl AtlasClient {
    /// Build a client from resolved configuration.
    ///
    /// Fails with a configuration error when either API key is missing, so
    /// no request is ever attempted without credentials.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.api_credentials()?;
        let client = Self::new(credentials, &config.api.base_url, &config.api.api_version)?;
        match config.api.timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => Ok(client),
        }
    }

    pub fn new(credentials: ApiCredentials, base_url: &str, api_version: &str) -> Result<Self> {
        let http = build_http(None)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            accept: format!("application/vnd.atlas.{}+json", api_version),
            credentials,
            challenge: Mutex::new(None),
        })
    }

    /// Fail any single request that takes longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_http(Some(timeout))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` relative to the base URL
    pub async fn get(&self, path: &str, context: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, None, context).await
    }

    /// POST a JSON body to `path` relative to the base URL
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_vec(body).map_err(|e| CoreError::InvalidResponse {
            context: context.to_string(),
            message: format!("failed to encode request body: {}", e),
        })?;
        self.send(Method::POST, path, Some(body), context).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        context: &str,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let digest_uri = digest_uri(&url);
        debug!("{} {}", method, url);

        let authorization = self.cached_authorization(&method, &digest_uri);
        let response = self
            .execute(&method, &url, body.as_deref(), authorization)
            .await
            .map_err(|e| CoreError::transport(context, e))?;

        let response = if response.status() == StatusCode::UNAUTHORIZED
            && let Some(authorization) =
                self.answer_challenge(response.headers(), &method, &digest_uri)
        {
            trace!("Answering digest challenge for {}", digest_uri);
            self.execute(&method, &url, body.as_deref(), Some(authorization))
                .await
                .map_err(|e| CoreError::transport(context, e))?
        } else {
            response
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::transport(context, e))?;
        trace!("{} {} -> {}", method, url, status);

        Ok(ApiResponse { status, body })
    }

    async fn execute(
        &self,
        method: &Method,
        url: &str,
        body: Option<&[u8]>,
        authorization: Option<String>,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, &self.accept)
            .header(CONTENT_TYPE, "application/json");

        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        request.send().await
    }

    /// Authorization header from a previously cached challenge
    fn cached_authorization(&self, method: &Method, uri: &str) -> Option<String> {
        let mut guard = self.challenge.lock().ok()?;
        let challenge = guard.as_mut()?;
        self.respond(challenge, method, uri)
    }

    /// Parse a fresh challenge, cache it and compute the Authorization header
    fn answer_challenge(&self, headers: &HeaderMap, method: &Method, uri: &str) -> Option<String> {
        let header = headers.get(WWW_AUTHENTICATE)?.to_str().ok()?;
        let mut challenge = match digest_auth::parse(header) {
            Ok(challenge) => challenge,
            Err(e) => {
                warn!("Ignoring unparseable WWW-Authenticate header: {}", e);
                return None;
            }
        };

        let authorization = self.respond(&mut challenge, method, uri)?;
        if let Ok(mut guard) = self.challenge.lock() {
            *guard = Some(challenge);
        }
        Some(authorization)
    }

    fn respond(
        &self,
        challenge: &mut WwwAuthenticateHeader,
        method: &Method,
        uri: &str,
    ) -> Option<String> {
        let mut context = AuthContext::new(
            self.credentials.public_key.as_str(),
            self.credentials.private_key.as_str(),
            uri,
        );
        context.method = if *method == Method::POST {
            HttpMethod::POST
        } else {
            HttpMethod::GET
        };

        match challenge.respond(&context) {
            Ok(header) => Some(header.to_header_string()),
            Err(e) => {
                warn!("Failed to compute digest response: {}", e);
                None
            }
        }
    }
}

fn build_http(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(ATLASCTL_USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| CoreError::transport("building HTTP client", e))
}

/// Request-target used in the digest computation: path plus query
fn digest_uri(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_uri_is_path_and_query() {
        assert_eq!(
            digest_uri("https://cloud.mongodb.com/api/atlas/v2/orgs"),
            "/api/atlas/v2/orgs"
        );
        assert_eq!(
            digest_uri("https://cloud.mongodb.com/api/atlas/v2/orgs?pageNum=2"),
            "/api/atlas/v2/orgs?pageNum=2"
        );
    }

    #[test]
    fn test_accept_header_uses_api_version() {
        let client = AtlasClient::new(
            ApiCredentials::new("pub", "priv"),
            "https://cloud.mongodb.com/api/atlas/v2/",
            "2025-02-19",
        )
        .unwrap();
        assert_eq!(client.accept, "application/vnd.atlas.2025-02-19+json");
        assert_eq!(client.base_url(), "https://cloud.mongodb.com/api/atlas/v2");
    }

    #[test]
    fn test_from_config_requires_api_keys() {
        let err = AtlasClient::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_from_config_applies_timeout() {
        let mut config = Config::default();
        config.api.public_key = Some("pub".to_string());
        config.api.private_key = Some("priv".to_string());
        config.api.timeout_secs = Some(5);
        assert!(AtlasClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_debug_does_not_leak_private_key() {
        let client =
            AtlasClient::new(ApiCredentials::new("pub", "priv-secret"), "http://x", "v").unwrap();
        assert!(!format!("{:?}", client).contains("priv-secret"));
    }

    #[test]
    fn test_api_response_into_error() {
        let response = ApiResponse {
            status: StatusCode::BAD_REQUEST,
            body: "Invalid request".to_string(),
        };
        assert!(!response.is_success());
        let err = response.into_error("Failed to fetch organizations");
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("Failed to fetch organizations"));
    }
}
