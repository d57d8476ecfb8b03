//! Shared types for the query-orchestrator workspace: the request/session
//! data model, the error taxonomy, and structured trace events. Every other
//! `qo-*` crate depends on this one and nothing else in the workspace.

pub mod config;
pub mod credential;
pub mod error;
pub mod flags;
pub mod intent;
pub mod request;
pub mod routing;
pub mod session;
pub mod source;
pub mod trace;

pub use credential::Credential;
pub use error::{Error, ErrorCode, Result};
pub use flags::FeatureFlag;
pub use intent::{Entities, Intent, Timeframe};
pub use request::{ChatResponse, Message, Request, RequestOptions, RequestState, Stage, Verdict};
pub use routing::RoutingEntry;
pub use session::{Session, Turn, TurnRole};
pub use source::{Source, SourceKind};
pub use trace::TraceEvent;
