use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends a bearer token on every request.
///
/// The GES DISC archive behind the MERRA-2 data requires an Earthdata
/// Login token in the `Authorization` header.
pub struct ApiKey<C> {
    pub inner: C,
    value: String,
}

impl<C> ApiKey<C> {
    /// Wraps `inner` so every request carries `Authorization: Bearer <token>`.
    pub fn bearer(inner: C, token: String) -> Self {
        Self {
            inner,
            value: format!("Bearer {token}"),
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let value = HeaderValue::from_str(&self.value).expect("ApiKey: invalid token");
        req.headers_mut().insert(AUTHORIZATION, value);
        self.inner.execute(req).await
    }
}
