use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use bardo_client::Credentials;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Per-category prompt templates applied before asking; the selected
    /// template's `{prompt}` placeholder is replaced with the user prompt.
    #[serde(default = "default_templates")]
    pub templates: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "ProviderConfig::default_base_url")]
    pub base_url: String,
    /// Backend build label sent as the `bl` query parameter. The provider
    /// rotates this with deployments; it is configurable for that reason.
    #[serde(default = "ProviderConfig::default_build_label")]
    pub build_label: String,
    /// Inline cookie values; the PSID/PSIDTS environment variables take
    /// precedence so secrets can stay out of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psidts: Option<String>,
}

impl ProviderConfig {
    fn default_base_url() -> String {
        "https://gemini.google.com".to_string()
    }

    fn default_build_label() -> String {
        "boq_assistant-bard-web-server_20230718.13_p2".to_string()
    }

    /// Resolve the authentication cookies: environment first, file second.
    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        if let Some(credentials) = Credentials::from_env() {
            debug!("using credentials from PSID/PSIDTS environment variables");
            return Ok(credentials);
        }

        match (&self.psid, &self.psidts) {
            (Some(psid), Some(psidts)) if !psid.is_empty() && !psidts.is_empty() => {
                debug!("using credentials from config file");
                Ok(Credentials::new(psid.clone(), psidts.clone()))
            }
            _ => anyhow::bail!(
                "Missing credentials: set the PSID and PSIDTS environment variables \
                 or the provider.psid / provider.psidts config fields."
            ),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            build_label: Self::default_build_label(),
            psid: None,
            psidts: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TimeoutConfig {
    #[serde(default = "TimeoutConfig::default_token_secs")]
    pub token_secs: u64,
    #[serde(default = "TimeoutConfig::default_query_secs")]
    pub query_secs: u64,
}

impl TimeoutConfig {
    const fn default_token_secs() -> u64 {
        5
    }

    const fn default_query_secs() -> u64 {
        15
    }

    #[must_use]
    pub const fn token(&self) -> Duration {
        Duration::from_secs(self.token_secs)
    }

    #[must_use]
    pub const fn query(&self) -> Duration {
        Duration::from_secs(self.query_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            token_secs: Self::default_token_secs(),
            query_secs: Self::default_query_secs(),
        }
    }
}

fn default_templates() -> HashMap<String, String> {
    HashMap::from([
        ("general".to_string(), "{prompt}".to_string()),
        (
            "islam".to_string(),
            "Respond only from qualified Islamic sources like the Quran and Sunnah \
             of the prophet Muhammad and related publications.\n\n{prompt}"
                .to_string(),
        ),
        (
            "news".to_string(),
            "Respond based on current factual news occuring in real time around \
             the world.\n\n{prompt}"
                .to_string(),
        ),
    ])
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'bardo init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("bardo"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "provider": {
    "base_url": "https://gemini.google.com",
    "build_label": "boq_assistant-bard-web-server_20230718.13_p2"
  },
  "timeouts": {
    "token_secs": 5,
    "query_secs": 15
  },
  "templates": {
    "general": "{prompt}",
    "news": "Respond based on current factual news occuring in real time around the world.\n\n{prompt}"
  }
}"#;

        std::fs::write(&config_path, config_template)?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Export the PSID and PSIDTS cookies from a logged-in browser session");
        println!("      and set them as environment variables (preferred), or add them as");
        println!("      provider.psid / provider.psidts in the config file");
        println!("   2. Run 'bardo chat' to start a conversation");
        println!();
        Ok(())
    }

    /// Wrap a prompt in the selected category's template. Unknown or absent
    /// categories pass the prompt through unchanged.
    #[must_use]
    pub fn apply_template(&self, category: Option<&str>, prompt: &str) -> String {
        category
            .and_then(|name| self.templates.get(name))
            .map_or_else(
                || prompt.to_string(),
                |template| template.replace("{prompt}", prompt),
            )
    }
}
