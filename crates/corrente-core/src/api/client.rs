use anyhow::{Context, Result};
use corrente_types::ApiResponse;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::errors::ApiError;
use crate::config::Config;

/// Standard User-Agent header for Corrente API requests.
pub const USER_AGENT: &str = concat!("corrente/", env!("CARGO_PKG_VERSION"));

/// Corrente API client.
///
/// Cheap to clone; clones share the underlying connection pool. The bearer
/// token, when set, is attached to every request except the public auth
/// endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for `base_url` with no timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    /// Creates a client from config (base URL resolution + optional timeout).
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.resolve_api_url()?;
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;

        Ok(Self {
            base_url,
            http,
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, authenticated: bool) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match (&self.token, authenticated) {
            (Some(token), true) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// `GET path` returning the envelope's `data`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.request(Method::GET, path, true)).await?;
        require_data(resp)
    }

    /// `GET path?query` returning the envelope's `data`.
    ///
    /// Query parameters are passed through exactly as given.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path, true).query(query);
        require_data(self.send(builder).await?)
    }

    /// `POST path` with a JSON body, bearer token attached.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path, true).json(body);
        require_data(self.send(builder).await?)
    }

    /// `POST path` without the bearer token (login/register).
    pub async fn post_public<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path, false).json(body);
        require_data(self.send(builder).await?)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path, true).json(body);
        require_data(self.send(builder).await?)
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PATCH, path, true).json(body);
        require_data(self.send(builder).await?)
    }

    /// Sends a request whose response carries no required `data`.
    ///
    /// Returns the server's `message`, if any.
    pub async fn command<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<String>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path, true);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp: ApiResponse<serde_json::Value> = self.send(builder).await?;
        Ok(resp.message)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::network(&e))?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await.map_err(|e| ApiError::network(&e))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), path = %url, "request failed");
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(ApiResponse {
                success: true,
                data: None,
                message: None,
            });
        }

        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| unexpected_shape(&url, &e))?;

        if !envelope.success {
            return Err(ApiError::server(envelope.message));
        }

        let data = envelope
            .data
            .filter(|v| !v.is_null())
            .map(serde_json::from_value::<T>)
            .transpose()
            .map_err(|e| unexpected_shape(&url, &e))?;

        Ok(ApiResponse {
            success: true,
            data,
            message: envelope.message,
        })
    }
}

fn unexpected_shape(path: &str, err: &serde_json::Error) -> ApiError {
    tracing::debug!(path, error = %err, "unexpected response shape");
    ApiError::parse(format!("Unexpected response from server: {err}"))
}

fn require_data<T>(resp: ApiResponse<T>) -> Result<T, ApiError> {
    resp.data
        .ok_or_else(|| ApiError::parse("Response is missing the data field"))
}
