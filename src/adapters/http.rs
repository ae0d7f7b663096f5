use crate::config::settings::ApiSettings;
use crate::core::{EncodedQuery, GeosearchTransport, RawResponse};
use crate::utils::error::{NearbyError, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// reqwest-backed transport for `GET {base_url}{endpoint_path}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let endpoint = endpoint_url(&settings.base_url, &settings.endpoint_path)?;
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Joins the endpoint path onto the base URL, treating the base as a
/// directory even when it lacks a trailing slash.
pub fn endpoint_url(base_url: &str, endpoint_path: &str) -> Result<Url> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    let invalid = |reason: String| NearbyError::ConfigError {
        message: format!("cannot build endpoint from `{}` + `{}`: {}", base_url, endpoint_path, reason),
    };

    Url::parse(&base)
        .and_then(|base| base.join(endpoint_path.trim_start_matches('/')))
        .map_err(|e| invalid(e.to_string()))
}

#[async_trait]
impl GeosearchTransport for HttpTransport {
    async fn send(&self, query: &EncodedQuery) -> Result<RawResponse> {
        tracing::debug!("Making API request to: {}", self.endpoint);

        let pairs: Vec<(&str, &str)> = query.iter().collect();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&pairs)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("API response status: {}", status);
        if !response.status().is_success() {
            tracing::error!("Geosearch request failed with status {}", status);
        }

        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}
