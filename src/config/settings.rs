use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::defaults;
use crate::error::PredictionError;

/// Raw settings layer as written in `ghost-edit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GhostEditSettings {
    pub backend: BackendSection,
    pub coalescer: CoalescerSection,
    pub cache: CacheSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: Option<String>,
    pub prompt_template: Option<String>,
    /// Lines above and below the cursor included in the editable region.
    pub context_lines: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoalescerSection {
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicyKind {
    Time,
    Capacity,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheSection {
    pub policy: Option<CachePolicyKind>,
    pub max_size: Option<usize>,
    pub timeout_ms: Option<u64>,
}

/// Backend settings with every value decided.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSettings {
    pub base_url: Url,
    pub model: String,
    pub api_key_env: Option<String>,
    pub prompt_template: String,
    pub context_lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoalescerSettings {
    pub debounce: Duration,
}

/// Cache strategy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Time { timeout: Duration },
    Capacity { max_size: usize },
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub backend: BackendSettings,
    pub coalescer: CoalescerSettings,
    pub cache: CachePolicy,
}

impl TryFrom<GhostEditSettings> for ResolvedSettings {
    type Error = PredictionError;

    /// Resolve a merged layer; unset values fall back to the defaults.
    fn try_from(settings: GhostEditSettings) -> Result<Self, Self::Error> {
        let GhostEditSettings {
            backend,
            coalescer,
            cache,
        } = settings;

        let base_url = backend
            .base_url
            .unwrap_or_else(|| defaults::DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|e| {
            PredictionError::config(format!("invalid backend.base_url '{}': {}", base_url, e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(PredictionError::config(format!(
                "backend.base_url must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        let cache = match cache.policy.unwrap_or(defaults::DEFAULT_CACHE_POLICY) {
            CachePolicyKind::Time => CachePolicy::Time {
                timeout: Duration::from_millis(
                    cache.timeout_ms.unwrap_or(defaults::DEFAULT_CACHE_TIMEOUT_MS),
                ),
            },
            CachePolicyKind::Capacity => CachePolicy::Capacity {
                max_size: cache.max_size.unwrap_or(defaults::DEFAULT_CACHE_MAX_SIZE),
            },
        };

        Ok(ResolvedSettings {
            backend: BackendSettings {
                base_url,
                model: backend
                    .model
                    .unwrap_or_else(|| defaults::DEFAULT_MODEL.to_string()),
                api_key_env: backend.api_key_env,
                prompt_template: backend
                    .prompt_template
                    .unwrap_or_else(|| defaults::DEFAULT_PROMPT_TEMPLATE.to_string()),
                context_lines: backend
                    .context_lines
                    .unwrap_or(defaults::DEFAULT_CONTEXT_LINES),
            },
            coalescer: CoalescerSettings {
                debounce: Duration::from_millis(
                    coalescer
                        .debounce_ms
                        .unwrap_or(defaults::DEFAULT_DEBOUNCE_MS),
                ),
            },
            cache,
        })
    }
}
