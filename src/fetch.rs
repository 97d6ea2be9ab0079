use crate::config::FetchConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;

/// Retrieves the raw HTML of a source page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let html = response.text().await?;
        Ok(html)
    }
}
