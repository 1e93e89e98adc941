// API client module: a small blocking HTTP client for the GitHub Gist
// REST API. Every call goes through `request`, which attaches the
// bearer token and the versioned JSON headers, and turns any non-2xx
// response into a single `GistError::Api` carrying status and body.

use crate::auth::TokenProvider;
use crate::config::ApiConfig;
use crate::error::{GistError, Result};
use crate::model::{CreateGistRequest, FileContent, Gist, UpdateGistRequest};
use reqwest::blocking::{Client, Request};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Media type of the GitHub REST API.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
/// Header pinning the API version.
pub const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// Operations the commands need from the Gist service.
pub trait GistApi {
    /// Gists of the authenticated user, in server order.
    fn list_gists(&self) -> Result<Vec<Gist>>;

    fn get_gist(&self, id: &str) -> Result<Gist>;

    fn create_gist(
        &self,
        description: &str,
        files: &BTreeMap<String, FileContent>,
        is_public: bool,
    ) -> Result<Gist>;

    /// Replace the listed files. A `None` entry deletes that file; files
    /// not in the map are left alone.
    fn update_gist(
        &self,
        id: &str,
        description: &str,
        files: &BTreeMap<String, Option<FileContent>>,
    ) -> Result<Gist>;

    fn delete_gist(&self, id: &str) -> Result<()>;
}

/// Gist API client holding a reqwest blocking client, the base URL and
/// the token source used for every request.
pub struct ApiClient<T> {
    client: Client,
    base_url: String,
    version: String,
    tokens: T,
}

impl<T: TokenProvider> ApiClient<T> {
    /// Create a client from configuration.
    pub fn new(config: &ApiConfig, tokens: T) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(ApiClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            version: config.version.clone(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    /// Headers sent with every call.
    fn headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GistError::Auth("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let version = HeaderValue::from_str(&self.version)
            .map_err(|_| GistError::validation("invalid API version in configuration"))?;
        headers.insert(API_VERSION_HEADER, version);
        Ok(headers)
    }

    /// Build a request for `path`. `body` is only given for POST/PATCH.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Request> {
        let token = self.tokens.token()?;
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .client
            .request(method, &url)
            .headers(self.headers(&token)?);
        if let Some(body) = body {
            req = req.body(serde_json::to_vec(&body)?);
        }
        Ok(req.build()?)
    }

    fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<R> {
        let req = self.build_request(method.clone(), path, body)?;
        let res = self.client.execute(req)?;
        let status = res.status();
        debug!(%method, path, status = status.as_u16(), "gist api response");
        let text = res.text()?;
        decode_response(status, &text)
    }
}

/// Map a response to a value: non-2xx becomes `GistError::Api`, a 204
/// is decoded as JSON `null` (the unit value for `()`).
pub fn decode_response<R: DeserializeOwned>(status: StatusCode, text: &str) -> Result<R> {
    if !status.is_success() {
        return Err(GistError::Api {
            status,
            body: text.to_string(),
        });
    }
    if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
        return Ok(serde_json::from_str("null")?);
    }
    Ok(serde_json::from_str(text)?)
}

impl<T: TokenProvider> GistApi for ApiClient<T> {
    fn list_gists(&self) -> Result<Vec<Gist>> {
        self.request(Method::GET, "/gists", None)
    }

    fn get_gist(&self, id: &str) -> Result<Gist> {
        self.request(Method::GET, &format!("/gists/{id}"), None)
    }

    fn create_gist(
        &self,
        description: &str,
        files: &BTreeMap<String, FileContent>,
        is_public: bool,
    ) -> Result<Gist> {
        let body = serde_json::to_value(CreateGistRequest {
            description,
            public: is_public,
            files,
        })?;
        self.request(Method::POST, "/gists", Some(body))
    }

    fn update_gist(
        &self,
        id: &str,
        description: &str,
        files: &BTreeMap<String, Option<FileContent>>,
    ) -> Result<Gist> {
        let body = serde_json::to_value(UpdateGistRequest { description, files })?;
        self.request(Method::PATCH, &format!("/gists/{id}"), Some(body))
    }

    fn delete_gist(&self, id: &str) -> Result<()> {
        self.request(Method::DELETE, &format!("/gists/{id}"), None)
    }
}
