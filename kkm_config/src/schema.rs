use kkm_core::{FieldRule, FieldRules, default_rules};
use kkm_fetch::FetchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides the token from the config file.
pub const TOKEN_ENV_VAR: &str = "KKM_TELEGRAM_TOKEN";

const CONFIG_DIR: &str = "kkmbot";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub upstream: FetchConfig,
    #[serde(default = "default_rules")]
    pub fields: Vec<FieldRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            upstream: FetchConfig::default(),
            fields: default_rules(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: String,
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load `~/kkmbot/config.json`, falling back to defaults when it is absent.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {e}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Compile the configured field rules.
    pub fn field_rules(&self) -> anyhow::Result<FieldRules> {
        Ok(FieldRules::compile(&self.fields)?)
    }

    /// Bot token by precedence: explicit value, environment, config file.
    pub fn resolve_token(&self, explicit: Option<String>) -> anyhow::Result<String> {
        self.resolve_token_with(explicit, std::env::var(TOKEN_ENV_VAR).ok())
    }

    fn resolve_token_with(
        &self,
        explicit: Option<String>,
        from_env: Option<String>,
    ) -> anyhow::Result<String> {
        explicit
            .filter(|t| !t.is_empty())
            .or_else(|| from_env.filter(|t| !t.is_empty()))
            .or_else(|| Some(self.telegram.token.clone()).filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Telegram bot token not configured. Pass --token, set {TOKEN_ENV_VAR}, \
                     or set \"telegram.token\" in config"
                )
            })
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Put your Telegram bot token into \"telegram.token\"");
        println!("      (or export {TOKEN_ENV_VAR} instead)");
        println!("   2. Run 'kkmbot telegram' to start the bot");
        println!();
        println!("🔧 Configuration options:");
        println!("   - upstream.endpoint: card validity form URL");
        println!("   - upstream.timeout_secs: request timeout, transport default when omitted");
        println!("   - fields: ordered pattern/label pairs scraped from the page");
        println!();
        Ok(())
    }

    fn write_template(path: &Path) -> anyhow::Result<()> {
        let template = Self {
            telegram: TelegramConfig {
                token: "your-telegram-bot-token-here".to_string(),
            },
            ..Self::default()
        };
        std::fs::write(path, serde_json::to_string_pretty(&template)?)?;
        Ok(())
    }
}
