pub mod client;
pub mod snapshot;

pub use client::{spawn_background_refresh, ConfigClient};
