//! Default configuration values for ghost-edit.
//!
//! The default layer sets every field; lower layers never see a `None`.

use super::settings::{
    BackendSection, CachePolicyKind, CacheSection, CoalescerSection, GhostEditSettings,
};

pub use crate::prediction::prompt::DEFAULT_PROMPT_TEMPLATE;
use crate::prediction::{cache, coalescer};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";
pub const DEFAULT_MODEL: &str = "zeta";
pub const DEFAULT_CONTEXT_LINES: usize = 8;
pub const DEFAULT_DEBOUNCE_MS: u64 = coalescer::DEFAULT_DEBOUNCE.as_millis() as u64;
pub const DEFAULT_CACHE_POLICY: CachePolicyKind = CachePolicyKind::Capacity;
pub const DEFAULT_CACHE_MAX_SIZE: usize = cache::DEFAULT_MAX_SIZE;
pub const DEFAULT_CACHE_TIMEOUT_MS: u64 = cache::DEFAULT_TIMEOUT.as_millis() as u64;

/// Returns the default settings layer.
pub fn default_settings() -> GhostEditSettings {
    GhostEditSettings {
        backend: BackendSection {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            api_key_env: None,
            prompt_template: Some(DEFAULT_PROMPT_TEMPLATE.to_string()),
            context_lines: Some(DEFAULT_CONTEXT_LINES),
        },
        coalescer: CoalescerSection {
            debounce_ms: Some(DEFAULT_DEBOUNCE_MS),
        },
        cache: CacheSection {
            policy: Some(DEFAULT_CACHE_POLICY),
            max_size: Some(DEFAULT_CACHE_MAX_SIZE),
            timeout_ms: Some(DEFAULT_CACHE_TIMEOUT_MS),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_round_trip_through_toml() {
        let settings = default_settings();
        let text = toml::to_string(&settings).unwrap();
        let parsed: GhostEditSettings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
