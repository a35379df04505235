use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used by [`super::fetch_bytes`]; swap it out to inject headers or a test double.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
