use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a fully built HTTP request.
///
/// Data sources depend on this trait rather than on [`reqwest::Client`]
/// directly, so credentials can be layered on with the wrappers in
/// [`crate::fetch::auth`] and tests can point a source at a mock server.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
