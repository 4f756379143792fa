use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use aipm_llm_sdk::{ChatCompletionsClient, LlmClient, LlmError};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AipmConfig {
    pub service: ServiceConfig,
    pub document: Option<DocumentConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DocumentConfig {
    /// "MRD" or "PRD"
    pub kind: Option<String>,
}

impl Default for AipmConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                api_key: None,
                base_url: "https://api.example.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
            },
            document: None,
        }
    }
}

impl AipmConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[service]
# api_key = "your-service-key"
base_url = "https://api.example.com/v1"
model = "gpt-4o-mini"

[document]
# kind = "MRD"  # Options: MRD, PRD
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: AipmConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }

    /// Document kind from the `[document]` section, when configured
    pub fn document_kind(&self) -> Option<&str> {
        self.document.as_ref().and_then(|d| d.kind.as_deref())
    }

    /// Load from an explicit file, without creating defaults on disk
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()?;
        builder.try_deserialize()
    }

    /// Build the concrete chat-completions client from this config. Fails
    /// when no API key is configured.
    pub fn build_chat_client(&self) -> Result<ChatCompletionsClient, LlmError> {
        let api_key = self.service.api_key.clone().ok_or_else(|| {
            LlmError::authentication("No API key configured under [service] api_key")
        })?;
        ChatCompletionsClient::new(
            api_key,
            self.service.base_url.clone(),
            self.service.model.clone(),
        )
    }

    /// Build the shared generation client from this config
    pub fn build_client(&self) -> Result<Arc<dyn LlmClient>, LlmError> {
        Ok(Arc::new(self.build_chat_client()?))
    }
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("aipm/aipm.toml")
    } else {
        PathBuf::from("aipm.toml")
    }
}
