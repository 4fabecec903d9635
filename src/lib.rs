//! Site Aura - presentation behavior for a static portfolio site.
//!
//! Provides the smoothed cursor-aura trackers, the two-locale content toggle
//! and the mobile navigation toggle. The core is host-agnostic; the `web`
//! feature binds it to the browser DOM when built for wasm32.

pub mod aura;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locale;
pub mod nav;
pub mod replay;
pub mod scheduler;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use error::{AuraError, AuraResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for native tools
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_aura=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Site Aura v{}", env!("CARGO_PKG_VERSION"));
}
