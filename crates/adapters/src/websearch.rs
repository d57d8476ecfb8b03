use std::time::Duration;

use serde_json::Value;

use qo_domain::error::{Error, Result};

use crate::breaker::CircuitBreaker;
use crate::traits::{SearchProvider, SearchResultItem};

/// A generic web-search backend adapter, the same base-URL/JSON shape as
/// `HttpDomainAdapter` but returning a ranked list rather than one Source.
pub struct HttpSearchProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    weight: f32,
    client: reqwest::Client,
    breaker: CircuitBreaker,
}

impl HttpSearchProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
        weight: f32,
        timeout: Duration,
        breaker_threshold: u32,
        breaker_window: Duration,
        breaker_cooldown: Duration,
    ) -> Result<Self> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(HttpSearchProvider {
            breaker: CircuitBreaker::new(name.clone(), breaker_threshold, breaker_window, breaker_cooldown),
            name,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            weight,
            client,
        })
    }

    pub fn breaker_open(&self) -> bool {
        self.breaker.is_open()
    }
}

#[async_trait::async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>> {
        if self.breaker.is_open() {
            return Err(Error::UpstreamUnavailable {
                upstream: self.name.clone(),
                message: "circuit open".to_string(),
            });
        }

        let url = format!("{}/search?q={}", self.base_url, urlencoding_lite(query));
        let mut req = self.client.get(&url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = match req.send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                self.breaker.record_failure();
                return Err(Error::UpstreamUnavailable {
                    upstream: self.name.clone(),
                    message: format!("status {}", r.status()),
                });
            }
            Err(e) => {
                self.breaker.record_failure();
                return Err(Error::UpstreamUnavailable {
                    upstream: self.name.clone(),
                    message: e.to_string(),
                });
            }
        };

        let payload: Value = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                self.breaker.record_failure();
                return Err(Error::ParseError {
                    source: self.name.clone(),
                    message: e.to_string(),
                });
            }
        };

        self.breaker.record_success();
        let items = payload["results"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|item| {
                        Some(SearchResultItem {
                            url: item["url"].as_str()?.to_string(),
                            title: item["title"].as_str().unwrap_or_default().to_string(),
                            snippet: item["snippet"].as_str().unwrap_or_default().to_string(),
                            score: item["score"].as_f64().unwrap_or(0.5) as f32,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> f32 {
        self.weight
    }
}

fn urlencoding_lite(s: &str) -> String {
    s.replace(' ', "%20")
}
