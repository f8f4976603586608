use super::client::Transport;
use crate::error::ConfigError;
use async_trait::async_trait;

/// User agent sent by [`BasicTransport`].
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The default [`Transport`], a thin layer over a pooled `reqwest::Client`.
pub struct BasicTransport(reqwest::Client);

impl BasicTransport {
    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConfigError::Build)?;
        Ok(Self(client))
    }
}

#[async_trait]
impl Transport for BasicTransport {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
