//! The JSON API client.
//!
//! [`ApiClient`] binds a [`Transport`] to one base URL and exposes the four
//! verbs. Each verb returns `Result<R, RequestError>`. [`Lenient`] is a view
//! over the same client that logs failures and returns an empty value
//! instead, for callers that only ever want a body back.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, error};
use url::Url;

use crate::config::ClientConfiguration;
use crate::error::{ConfigError, RequestError};
use crate::transport::auth::TokenAuth;
use crate::transport::{BasicTransport, Transport};
use crate::validate::{Passthrough, Validator};

/// Total time allowed for every request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

const APPLICATION_JSON: &str = "application/json";

/// A client for one JSON API.
///
/// Cloning is cheap and clones share the underlying transport, so a single
/// client can serve any number of concurrent requests.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Builds a client over a fresh [`BasicTransport`].
    pub fn new(config: ClientConfiguration) -> Result<Self, ConfigError> {
        Self::with_transport(config, BasicTransport::new()?)
    }

    /// Builds a client over `transport`.
    ///
    /// If the configuration carries a non-empty access token the transport is
    /// wrapped in [`TokenAuth`].
    pub fn with_transport<T>(config: ClientConfiguration, transport: T) -> Result<Self, ConfigError>
    where
        T: Transport + 'static,
    {
        let base_url = config.resolved_base_url()?;
        let transport: Arc<dyn Transport> = match config.token() {
            Some(token) => Arc::new(TokenAuth::new(transport, token)?),
            None => Arc::new(transport),
        };
        debug!(%base_url, authenticated = config.token().is_some(), "API client created");
        Ok(Self { base_url, transport })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns a view whose methods never fail; see [`Lenient`].
    pub fn lenient(&self) -> Lenient<'_> {
        Lenient { client: self }
    }

    pub async fn get<R>(&self, path: &str) -> Result<R, RequestError>
    where
        R: DeserializeOwned,
    {
        self.execute::<(), R, _>(Method::GET, path, None, Passthrough)
            .await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(Method::POST, path, Some(body), Passthrough)
            .await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(Method::PUT, path, Some(body), Passthrough)
            .await
    }

    pub async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute(Method::PATCH, path, Some(body), Passthrough)
            .await
    }

    /// Sends `method` to `path` with an optional JSON body, decodes the
    /// response as `R` and runs `validator` over it.
    ///
    /// # Errors
    ///
    /// - [`RequestError::InvalidUrl`] / [`RequestError::Encode`] before anything is sent
    /// - [`RequestError::Network`] / [`RequestError::Timeout`] from the transport
    /// - [`RequestError::Status`] for any non-2xx response
    /// - [`RequestError::Decode`] if the body is not valid JSON for `R`
    /// - [`RequestError::Validation`] if `validator` rejects the value
    pub async fn execute<B, R, V>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        validator: V,
    ) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
        V: Validator<R>,
    {
        let url = join_url(&self.base_url, path)?;
        let span = tracing::debug_span!("request", %method, %url);
        let req = build_request(method, url, body)?;

        async move {
            let response = self
                .transport
                .execute(req)
                .await
                .map_err(RequestError::from_transport)?;

            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(RequestError::from_transport)?;

            if !status.is_success() {
                debug!(%status, "Request returned non-success status");
                return Err(RequestError::Status {
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }

            debug!(%status, bytes = bytes.len(), "Response received");
            let value = decode(&bytes)?;
            validator
                .validate(&value)
                .map_err(RequestError::Validation)?;
            Ok(value)
        }
        .instrument(span)
        .await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// The never-failing view of an [`ApiClient`].
///
/// Every failure (network, timeout, non-2xx status, undecodable body) is
/// logged once at `ERROR` and replaced by [`empty_response`]. A failed call is
/// therefore indistinguishable from one that returned an empty object; use the
/// methods on [`ApiClient`] when that matters.
#[derive(Debug, Clone, Copy)]
pub struct Lenient<'a> {
    client: &'a ApiClient,
}

impl Lenient<'_> {
    pub async fn get<R>(&self, path: &str) -> R
    where
        R: DeserializeOwned + Default,
    {
        settle(Method::GET, path, self.client.get(path).await)
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> R
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + Default,
    {
        settle(Method::POST, path, self.client.post(path, body).await)
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> R
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + Default,
    {
        settle(Method::PUT, path, self.client.put(path, body).await)
    }

    pub async fn patch<B, R>(&self, path: &str, body: &B) -> R
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + Default,
    {
        settle(Method::PATCH, path, self.client.patch(path, body).await)
    }
}

fn settle<R>(method: Method, path: &str, result: Result<R, RequestError>) -> R
where
    R: DeserializeOwned + Default,
{
    match result {
        Ok(value) => value,
        Err(e) => {
            error!(%method, path, kind = ?e.kind(), error = %e, "Request failed");
            empty_response()
        }
    }
}

/// The value handed back by [`Lenient`] when a request fails.
///
/// `R` is decoded from an empty JSON object when it accepts one (so
/// `serde_json::Value` yields `{}` and maps yield an empty map); anything else
/// falls back to `R::default()`.
pub fn empty_response<R>() -> R
where
    R: DeserializeOwned + Default,
{
    serde_json::from_value(serde_json::Value::Object(serde_json::Map::new())).unwrap_or_default()
}

/// Appends `path` to `base` the way the request paths are written: absolute
/// URLs pass through, otherwise exactly one `/` separates the two parts.
pub(crate) fn join_url(base: &Url, path: &str) -> Result<Url, RequestError> {
    let joined = if is_absolute_url(path) {
        path.to_string()
    } else if path.is_empty() {
        base.as_str().to_string()
    } else {
        format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };

    Url::parse(&joined).map_err(|source| RequestError::InvalidUrl {
        url: joined,
        source,
    })
}

fn is_absolute_url(path: &str) -> bool {
    match path.split_once("://") {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn build_request<B>(method: Method, url: Url, body: Option<&B>) -> Result<Request, RequestError>
where
    B: Serialize + ?Sized,
{
    let mut req = Request::new(method, url);
    let headers = req.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    *req.timeout_mut() = Some(REQUEST_TIMEOUT);

    if let Some(body) = body {
        let bytes = serde_json::to_vec(body).map_err(RequestError::Encode)?;
        *req.body_mut() = Some(bytes.into());
    }

    Ok(req)
}

/// Decodes a success body. An empty body is read as JSON `null`.
fn decode<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, RequestError> {
    let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(RequestError::Decode)
}
