use std::{env, time::Duration};

use eventdesk_core::cache::Freshness;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted store project URL (no default; required unless running in memory)
    pub store_url: Option<String>,
    /// Hosted store API key (no default)
    pub store_api_key: Option<String>,
    /// Object storage bucket for flyers (default: "event-flyers")
    pub flyer_bucket: String,
    /// Maximum number of cache entries (default: 1,000)
    pub cache_max_entries: usize,
    /// Freshness of events and their links in seconds (default: 300)
    pub volatile_freshness_seconds: u64,
    /// Freshness of categories and memberships in seconds (default: 1,800)
    pub reference_freshness_seconds: u64,
    /// Identity stamped on audit columns (default: "eventdesk")
    pub actor: String,
    /// Capability grants, e.g. `create:events,delete:events` (default: "*")
    pub capabilities: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STORE_URL` - Hosted store project URL
    /// - `STORE_API_KEY` - Hosted store API key
    /// - `FLYER_BUCKET` - Flyer bucket (default: "event-flyers")
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1,000)
    /// - `VOLATILE_FRESHNESS_SECONDS` - Events freshness (default: 300)
    /// - `REFERENCE_FRESHNESS_SECONDS` - Categories freshness (default: 1,800)
    /// - `EVENTDESK_ACTOR` - Audit identity (default: "eventdesk")
    /// - `EVENTDESK_CAPABILITIES` - Capability grants (default: "*")
    pub fn from_env() -> Self {
        Self {
            store_url: env::var("STORE_URL").ok().filter(|v| !v.is_empty()),
            store_api_key: env::var("STORE_API_KEY").ok().filter(|v| !v.is_empty()),
            flyer_bucket: env::var("FLYER_BUCKET").unwrap_or_else(|_| "event-flyers".to_string()),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
            volatile_freshness_seconds: env::var("VOLATILE_FRESHNESS_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            reference_freshness_seconds: env::var("REFERENCE_FRESHNESS_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_800),
            actor: env::var("EVENTDESK_ACTOR").unwrap_or_else(|_| "eventdesk".to_string()),
            capabilities: env::var("EVENTDESK_CAPABILITIES").unwrap_or_else(|_| "*".to_string()),
        }
    }

    /// Get the freshness windows.
    pub fn freshness(&self) -> Freshness {
        Freshness {
            volatile: Duration::from_secs(self.volatile_freshness_seconds),
            reference: Duration::from_secs(self.reference_freshness_seconds),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
