use super::client::HttpClient;
use async_trait::async_trait;

/// Plain [`HttpClient`] with no authentication, for services that accept
/// anonymous requests (NASA POWER works without a key, at lower rate
/// limits).
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
