use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::editor::{TriggerMap, TriggerProfiles};
use crate::domain::panel::PanelSettings;
use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub references: ReferencesConfig,
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where the reference domains come from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    /// JSON or TOML seed file; built-in samples when unset
    pub seed_file: Option<String>,
}

/// Reference editor behaviour
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Cap on listed suggestions; unset or zero lists every match
    pub max_suggestions: Option<usize>,

    /// Trigger overrides per field family, e.g. `{"#" = ["tag"], "$" = ["variable"]}`
    pub condition_triggers: Option<BTreeMap<String, Vec<String>>>,
    pub argument_triggers: Option<BTreeMap<String, Vec<String>>>,
    pub return_triggers: Option<BTreeMap<String, Vec<String>>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl EditorConfig {
    /// Built-in trigger profiles with configured overrides applied
    pub fn trigger_profiles(&self) -> Result<TriggerProfiles, DomainError> {
        let defaults = TriggerProfiles::default();

        Ok(TriggerProfiles {
            condition: Self::profile(&self.condition_triggers, defaults.condition)?,
            argument: Self::profile(&self.argument_triggers, defaults.argument)?,
            return_variable: Self::profile(&self.return_triggers, defaults.return_variable)?,
        })
    }

    fn profile(
        entries: &Option<BTreeMap<String, Vec<String>>>,
        default: TriggerMap,
    ) -> Result<TriggerMap, DomainError> {
        match entries {
            Some(entries) => TriggerMap::from_config(entries),
            None => Ok(default),
        }
    }

    pub fn panel_settings(&self) -> Result<PanelSettings, DomainError> {
        Ok(PanelSettings {
            triggers: self.trigger_profiles()?,
            max_suggestions: self.max_suggestions.filter(|&n| n > 0),
        })
    }
}
