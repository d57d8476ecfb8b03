pub mod breaker;
pub mod http_adapter;
pub mod registry;
pub mod search_engine;
pub mod traits;
pub mod websearch;

pub use breaker::CircuitBreaker;
pub use http_adapter::{airports_path, sports_path, weather_path, HttpDomainAdapter};
pub use registry::AdapterRegistry;
pub use search_engine::{FusedItem, FusedResults, ParallelSearchEngine};
pub use traits::{QueryParams, RetrievalAdapter, SearchProvider, SearchResultItem};
pub use websearch::HttpSearchProvider;
