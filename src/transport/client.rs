use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a fully built request.
///
/// Wrappers such as [`TokenAuth`](super::auth::TokenAuth) decorate another
/// transport and must forward to it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
