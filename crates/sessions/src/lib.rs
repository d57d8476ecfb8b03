//! Process-local conversation session state.
//!
//! Bounded FIFO of turns per session, idle-TTL eviction evaluated lazily on
//! access. No on-disk persistence — conversation history beyond the TTL
//! window is intentionally not durable.

pub mod store;

pub use store::SessionStore;
