//! Layered configuration.
//!
//! Layers, lowest precedence first:
//! 1. Programmed defaults ([`defaults::default_settings`])
//! 2. User config (`$XDG_CONFIG_HOME/ghost-edit/ghost-edit.toml`)
//! 3. Project config (`<root>/ghost-edit.toml`)
//! 4. Explicit override file (e.g. `--config` on the command line)
//!
//! Every raw field is optional so that a layer only overrides what it sets.

pub mod defaults;
pub mod loader;
pub mod settings;
pub mod user;

pub use loader::{SettingsEvent, SettingsEventKind, SettingsLoadOutcome, load_settings};
pub use settings::{
    BackendSection, BackendSettings, CachePolicy, CachePolicyKind, CacheSection,
    CoalescerSection, CoalescerSettings, GhostEditSettings, ResolvedSettings,
};
pub use user::{UserConfigError, UserConfigResult, load_user_config, user_config_path};

/// Merge a list of layers, later layers overriding earlier ones.
pub fn merge_all(configs: &[Option<GhostEditSettings>]) -> Option<GhostEditSettings> {
    configs.iter().cloned().reduce(merge_settings).flatten()
}

/// Merge two settings layers, preferring values from `primary` over `fallback`
pub fn merge_settings(
    fallback: Option<GhostEditSettings>,
    primary: Option<GhostEditSettings>,
) -> Option<GhostEditSettings> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) => Some(settings),
        (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => Some(GhostEditSettings {
            backend: merge_backend(fallback.backend, primary.backend),
            coalescer: CoalescerSection {
                debounce_ms: primary.coalescer.debounce_ms.or(fallback.coalescer.debounce_ms),
            },
            cache: CacheSection {
                policy: primary.cache.policy.or(fallback.cache.policy),
                max_size: primary.cache.max_size.or(fallback.cache.max_size),
                timeout_ms: primary.cache.timeout_ms.or(fallback.cache.timeout_ms),
            },
        }),
    }
}

fn merge_backend(fallback: BackendSection, primary: BackendSection) -> BackendSection {
    BackendSection {
        base_url: primary.base_url.or(fallback.base_url),
        model: primary.model.or(fallback.model),
        api_key_env: primary.api_key_env.or(fallback.api_key_env),
        prompt_template: primary.prompt_template.or(fallback.prompt_template),
        context_lines: primary.context_lines.or(fallback.context_lines),
    }
}
