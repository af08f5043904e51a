use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use shared_types::{ExtractionPolicy, RecordField, NOT_FOUND_SENTINEL, UNTITLED_EVENT};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"
[extraction]
# Placeholder for a location or registration link that could not be found
unresolved_sentinel = "-"
# Title used when the caption has no usable line
untitled_title = "Untitled Event"
# Rules to switch off, as "<field>.<rule>", e.g. "title.uppercase-line"
disabled_rules = []

[store]
# Directory holding one CSV file per sheet
directory = "."
sheet_name = "Sheet1"
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExtractionConfig {
    pub unresolved_sentinel: String,
    pub untitled_title: String,
    pub disabled_rules: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            unresolved_sentinel: NOT_FOUND_SENTINEL.to_string(),
            untitled_title: UNTITLED_EVENT.to_string(),
            disabled_rules: Vec::new(),
        }
    }
}

impl ExtractionConfig {
    pub fn policy(&self) -> ExtractionPolicy {
        ExtractionPolicy {
            unresolved_sentinel: self.unresolved_sentinel.clone(),
            untitled_title: self.untitled_title.clone(),
        }
    }

    /// `disabled_rules` entries split into field and rule name
    pub fn disabled_rules(&self) -> Result<Vec<(RecordField, String)>, ConfigError> {
        self.disabled_rules
            .iter()
            .map(|entry| {
                let (field, rule) = entry.split_once('.').ok_or_else(|| {
                    ConfigError::Message(format!(
                        "Invalid disabled rule '{entry}', expected <field>.<rule>"
                    ))
                })?;
                let field = field
                    .trim()
                    .parse::<RecordField>()
                    .map_err(|e| ConfigError::Message(e.to_string()))?;
                Ok((field, rule.trim().to_string()))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub directory: PathBuf,
    pub sheet_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            sheet_name: "Sheet1".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the config file, writing a commented default one first if it is missing
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Message(format!("Failed to create config directory: {e}"))
                })?;
            }
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
            tracing::info!("Wrote default config to {:?}", config_path);
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: AppConfig = builder.try_deserialize()?;
        config
            .extraction
            .policy()
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok((config, config_path))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("eventcap").join("eventcap.toml")
    } else {
        PathBuf::from("eventcap.toml")
    }
}
