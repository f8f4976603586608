use crate::error::ConfigError;
use crate::transport::client::Transport;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// A [`Transport`] wrapper that sends `Authorization: Token <token>` on every
/// request.
///
/// The header value is validated once at construction, so a token that cannot
/// be carried in HTTP (e.g. one containing a newline) is rejected up front.
pub struct TokenAuth<T> {
    inner: T,
    value: HeaderValue,
}

impl<T> TokenAuth<T> {
    pub fn new(inner: T, token: &str) -> Result<Self, ConfigError> {
        let mut value = HeaderValue::from_str(&format!("Token {token}"))
            .map_err(|_| ConfigError::InvalidToken)?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<T: Transport> Transport for TokenAuth<T> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}
