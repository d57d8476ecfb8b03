use qo_domain::error::Result;
use qo_domain::intent::Entities;
use qo_domain::source::Source;

/// Parameters passed to a single-adapter retrieval call.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub query: String,
    pub entities: Entities,
}

/// An HTTP client bound to one external data source (weather, sports,
/// airports). Each adapter promises a health check and a domain-specific
/// query endpoint.
#[async_trait::async_trait]
pub trait RetrievalAdapter: Send + Sync {
    async fn query(&self, params: &QueryParams) -> Result<Source>;

    fn name(&self) -> &str;
}

/// One raw result item from a web-search provider, before fusion.
#[derive(Debug, Clone)]
pub struct SearchResultItem {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Per-result relevance score reported by the provider, typically in
    /// `[0, 1]`.
    pub score: f32,
}

/// A generic web-search backend.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>>;

    fn name(&self) -> &str;

    /// Relative trust weight applied during fusion ranking.
    fn weight(&self) -> f32 {
        1.0
    }
}
