//! HTTP transport for the AniHub catalog bot.

pub mod api;
pub mod metrics;
pub mod state;
