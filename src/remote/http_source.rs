use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use url::Url;

use crate::app::{PostdeckError, Result};
use crate::config::RemoteConfig;
use crate::domain::RemoteRecord;
use crate::remote::RemoteSource;

const ITEMS_PATH: &str = "photos";

pub struct HttpRemoteSource {
    client: Client,
    base_url: Url,
}

impl HttpRemoteSource {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("postdeck/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: Self::normalize_base(&config.base_url)?,
        })
    }

    /// `Url::join` drops the last path segment unless it ends in `/`.
    fn normalize_base(base_url: &str) -> Result<Url> {
        if base_url.ends_with('/') {
            Ok(Url::parse(base_url)?)
        } else {
            Ok(Url::parse(&format!("{}/", base_url))?)
        }
    }

    fn items_url(&self, page: u32, limit: u32) -> Result<Url> {
        let mut url = self.base_url.join(ITEMS_PATH)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn list_items(&self, page: u32, limit: u32) -> Result<Vec<RemoteRecord>> {
        let url = self.items_url(page, limit)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostdeckError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let records: Vec<RemoteRecord> = serde_json::from_slice(&body)?;
        Ok(records)
    }
}
