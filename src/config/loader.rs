use std::fs;
use std::path::Path;

use super::defaults::default_settings;
use super::merge_all;
use super::settings::{GhostEditSettings, ResolvedSettings};
use super::user::{CONFIG_FILE_NAME, load_user_config};
use crate::error::PredictionResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

/// A notable thing that happened while loading settings.
///
/// Loading never fails outright; broken layers are skipped and reported
/// here so the caller decides how loudly to log them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SettingsLoadOutcome {
    /// Merged raw settings; always contains at least the defaults.
    pub settings: GhostEditSettings,
    pub events: Vec<SettingsEvent>,
}

impl SettingsLoadOutcome {
    /// Validate and resolve the merged settings.
    pub fn resolve(&self) -> PredictionResult<ResolvedSettings> {
        ResolvedSettings::try_from(self.settings.clone())
    }
}

/// Load and merge every configuration layer.
pub fn load_settings(root_path: Option<&Path>, override_path: Option<&Path>) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    // Layer 1: programmed defaults
    let defaults = Some(default_settings());

    // Layer 2: user config from XDG_CONFIG_HOME
    let user_config = load_user_config_with_events(&mut events);

    // Layer 3: project config from root_path/ghost-edit.toml
    let project_settings = root_path
        .and_then(|root| load_toml_settings(&root.join(CONFIG_FILE_NAME), &mut events));

    // Layer 4: explicit override file
    let override_settings = override_path.and_then(|path| {
        if !path.exists() {
            events.push(SettingsEvent::warning(format!(
                "Config file not found: {}",
                path.display()
            )));
            return None;
        }
        load_toml_settings(path, &mut events)
    });

    let settings = merge_all(&[defaults, user_config, project_settings, override_settings])
        .unwrap_or_else(default_settings);

    SettingsLoadOutcome { settings, events }
}

/// Load user config and add appropriate events to the events vector.
fn load_user_config_with_events(events: &mut Vec<SettingsEvent>) -> Option<GhostEditSettings> {
    match load_user_config() {
        Ok(Some(settings)) => {
            events.push(SettingsEvent::info("Loaded user config"));
            Some(settings)
        }
        // No user config file is the zero-config case
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to load user config: {}",
                err
            )));
            None
        }
    }
}

fn load_toml_settings(
    config_path: &Path,
    events: &mut Vec<SettingsEvent>,
) -> Option<GhostEditSettings> {
    if !config_path.exists() {
        return None;
    }

    events.push(SettingsEvent::info(format!(
        "Found config file: {}",
        config_path.display()
    )));

    match fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<GhostEditSettings>(&contents) {
            Ok(settings) => {
                events.push(SettingsEvent::info(format!(
                    "Successfully loaded {}",
                    config_path.display()
                )));
                Some(settings)
            }
            Err(err) => {
                events.push(SettingsEvent::warning(format!(
                    "Failed to parse {}: {}",
                    config_path.display(),
                    err
                )));
                None
            }
        },
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to read {}: {}",
                config_path.display(),
                err
            )));
            None
        }
    }
}
