use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use weather_api_core::ProviderConfig;

use super::{CurrentWeather, ProviderError, ProviderQuery, WeatherProvider};

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    endpoint: Url,
    token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: String,
}

impl OpenWeatherClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build weather provider http client")?;
        let endpoint = Url::parse(&format!("{}/weather", config.base_url))
            .with_context(|| format!("invalid provider url: {}", config.base_url))?;

        Ok(Self {
            client,
            endpoint,
            token: config.token.clone(),
        })
    }

    pub fn build_uri(&self, query: &ProviderQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                ProviderQuery::Id(id) => {
                    pairs.append_pair("id", &id.to_string());
                }
                ProviderQuery::City { .. } => {
                    pairs.append_pair("q", &query.to_string());
                }
            }
            pairs.append_pair("appid", &self.token);
        }
        url
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Upstream(err.to_string())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, query: &ProviderQuery) -> Result<CurrentWeather, ProviderError> {
        debug!("requesting current weather for '{}'", query);
        let response = self
            .client
            .get(self.build_uri(query))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        // the client deadline also covers reading the body
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_default();
            let detail = format!("status {}, message: '{}'", status.as_u16(), message);
            return Err(if status == StatusCode::NOT_FOUND {
                ProviderError::NotFound(detail)
            } else {
                ProviderError::Upstream(detail)
            });
        }

        serde_json::from_slice::<CurrentWeather>(&body)
            .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?
            .identified()
    }
}
