//! A thin `reqwest`-based adapter shared by the weather/sports/airports
//! backends: base URL + optional auth header + JSON decode + typed error
//! mapping, following the shape of the teacher's OpenAI-compatible LLM
//! adapter (same base-URL/auth/JSON pattern, applied to a domain API
//! instead of a chat-completions endpoint).

use std::time::{Duration, Instant};

use serde_json::Value;

use qo_domain::error::{Error, Result};
use qo_domain::source::{Source, SourceKind};

use crate::breaker::CircuitBreaker;
use crate::traits::{QueryParams, RetrievalAdapter};

pub struct HttpDomainAdapter {
    name: String,
    base_url: String,
    operation_path_fn: fn(&QueryParams) -> String,
    api_key: Option<String>,
    client: reqwest::Client,
    breaker: CircuitBreaker,
}

impl HttpDomainAdapter {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        api_key: Option<String>,
        operation_path_fn: fn(&QueryParams) -> String,
        breaker_threshold: u32,
        breaker_window: Duration,
        breaker_cooldown: Duration,
    ) -> Result<Self> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(HttpDomainAdapter {
            breaker: CircuitBreaker::new(name.clone(), breaker_threshold, breaker_window, breaker_cooldown),
            name,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            operation_path_fn,
            api_key,
            client,
        })
    }

    pub fn breaker_open(&self) -> bool {
        self.breaker.is_open()
    }
}

#[async_trait::async_trait]
impl RetrievalAdapter for HttpDomainAdapter {
    async fn query(&self, params: &QueryParams) -> Result<Source> {
        if self.breaker.is_open() {
            return Err(Error::UpstreamUnavailable {
                upstream: self.name.clone(),
                message: "circuit open".to_string(),
            });
        }

        let path = (self.operation_path_fn)(params);
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        let mut req = self.client.get(&url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let result = req.send().await;
        let response = match result {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                self.breaker.record_failure();
                return Err(Error::UpstreamUnavailable {
                    upstream: self.name.clone(),
                    message: format!("status {}", resp.status()),
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

        let payload: Value = match response.json().await {
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
        Ok(Source {
            provider: self.name.clone(),
            kind: SourceKind::Rag,
            payload,
            fetched_at: chrono::Utc::now(),
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builds the weather adapter's operation path: forecast endpoint when the
/// timeframe looks forward, current-conditions endpoint otherwise.
pub fn weather_path(params: &QueryParams) -> String {
    let location = location_query_param(params);
    if params.entities.forecast_flag() {
        format!("/weather/forecast?location={location}")
    } else {
        format!("/weather/current?location={location}")
    }
}

fn location_query_param(params: &QueryParams) -> String {
    match &params.entities {
        qo_domain::intent::Entities::Weather(w) => w
            .location
            .as_ref()
            .map(|r| urlencoding_lite(&r.value))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

pub fn sports_path(params: &QueryParams) -> String {
    let team = match &params.entities {
        qo_domain::intent::Entities::Sports(s) => {
            s.team.as_ref().map(|r| urlencoding_lite(&r.value)).unwrap_or_default()
        }
        _ => String::new(),
    };
    format!("/sports/schedule?team={team}")
}

pub fn airports_path(params: &QueryParams) -> String {
    let code = match &params.entities {
        qo_domain::intent::Entities::Airports(a) => {
            a.airport.as_ref().map(|r| r.value.clone()).unwrap_or_default()
        }
        _ => String::new(),
    };
    format!("/airports/status?code={code}")
}

fn urlencoding_lite(s: &str) -> String {
    s.replace(' ', "%20")
}
