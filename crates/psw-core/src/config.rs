//! Configuration types and loading
//!
//! Defaults are compiled in; a config file and `PSW_*` environment variables
//! override them.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Gross-margin target every project is measured against (38.5%)
pub const DEFAULT_GROSS_MARGIN_TARGET: f64 = 0.385;

/// Admin & tech fee charged on labor fees (10%)
pub const DEFAULT_ADMIN_FEE_PERCENT: f64 = 0.10;

/// Flat hourly rate used for the SAP upload `Amount` column
pub const DEFAULT_SAP_FLAT_RATE: f64 = 580.0;

/// `ResourceType` column value of the SAP upload
pub const DEFAULT_SAP_RESOURCE_TYPE: &str = "0ACT";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// AI assistant configuration
    pub ai: AiConfig,

    /// Budget and margin rules
    pub budgeting: BudgetingConfig,

    /// Export settings
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AiProvider {
    /// No assistant; every AI call degrades to its fallback
    #[default]
    Disabled,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
}

impl AiProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "disabled" | "none" | "off" | "" => Some(Self::Disabled),
            "anthropic" | "claude" => Some(Self::Anthropic),
            "openai" | "open_ai" | "gpt" => Some(Self::OpenAi),
            _ => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Disabled => "",
            Self::Anthropic => "claude-3-5-haiku-20241022",
            Self::OpenAi => "gpt-4o-mini",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Disabled => "",
            Self::Anthropic => "https://api.anthropic.com",
            Self::OpenAi => "https://api.openai.com",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Disabled => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: Option<String>,
    /// Defaults to the provider's model
    pub model: Option<String>,
    /// Defaults to the provider's public endpoint
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::Disabled,
            api_key: None,
            model: None,
            base_url: None,
            max_tokens: 1024,
            timeout_seconds: 30,
        }
    }
}

impl AiConfig {
    /// Provider is selected and has credentials
    pub fn is_configured(&self) -> bool {
        match self.provider {
            AiProvider::Disabled => false,
            AiProvider::Anthropic | AiProvider::OpenAi => self
                .api_key
                .as_deref()
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false),
        }
    }

    pub fn model(&self) -> &str {
        self.model_or(self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url_or(self.provider.default_base_url())
    }

    /// Configured model, or `default` when unset or blank
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(default)
    }

    pub fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(default)
    }
}

/// How the SAP upload computes its `Amount` column
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SapAmountPolicy {
    /// hours x `sap_flat_rate`
    #[default]
    FlatRate,
    /// hours x (rate override, else the role's standard rate)
    RoleRate,
}

impl SapAmountPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "flat" | "flat_rate" => Some(Self::FlatRate),
            "role" | "role_rate" => Some(Self::RoleRate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BudgetingConfig {
    pub gross_margin_target: f64,
    /// Admin fee percent assigned to new projects
    pub admin_fee_percent: f64,
    pub sap_amount_policy: SapAmountPolicy,
    pub sap_flat_rate: f64,
    pub sap_resource_type: String,
}

impl Default for BudgetingConfig {
    fn default() -> Self {
        Self {
            gross_margin_target: DEFAULT_GROSS_MARGIN_TARGET,
            admin_fee_percent: DEFAULT_ADMIN_FEE_PERCENT,
            sap_amount_policy: SapAmountPolicy::FlatRate,
            sap_flat_rate: DEFAULT_SAP_FLAT_RATE,
            sap_resource_type: DEFAULT_SAP_RESOURCE_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Config file error: {0}")]
    FileError(String),
}

impl From<ConfigError> for crate::error::PswError {
    fn from(err: ConfigError) -> Self {
        crate::error::PswError::Config(err.to_string())
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (environment-shaped)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    /// Load defaults, then an optional config file (TOML, YAML or JSON by
    /// extension), then `PSW__SECTION__KEY` environment variables, then the
    /// flat `PSW_*` overrides understood by [`AppConfig::from_env`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&Self::default())
            .map_err(|e| ConfigError::FileError(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("PSW")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::FileError(e.to_string()))?;

        loaded.apply_overrides(&|key: &str| std::env::var(key).ok())?;
        tracing::debug!(
            provider = ?loaded.ai.provider,
            policy = ?loaded.budgeting.sap_amount_policy,
            "Configuration loaded"
        );
        Ok(loaded)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // AI: an explicit provider only takes its own key; otherwise the first
        // key found selects its provider
        let key_for = |provider: AiProvider| {
            provider
                .api_key_var()
                .and_then(|var| lookup(var))
                .filter(|k| !k.trim().is_empty())
        };
        if let Some(provider) = lookup("PSW_AI_PROVIDER") {
            self.ai.provider = AiProvider::parse(&provider).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "PSW_AI_PROVIDER".to_string(),
                    message: format!("unknown provider '{}'", provider),
                }
            })?;
            if let Some(key) = key_for(self.ai.provider) {
                self.ai.api_key = Some(key);
            }
        } else if let Some((provider, key)) = [AiProvider::Anthropic, AiProvider::OpenAi]
            .into_iter()
            .find_map(|p| key_for(p).map(|key| (p, key)))
        {
            self.ai.provider = provider;
            self.ai.api_key = Some(key);
        }
        if let Some(model) = lookup("PSW_AI_MODEL") {
            self.ai.model = Some(model);
        }
        if let Some(url) = lookup("PSW_AI_BASE_URL") {
            self.ai.base_url = Some(url);
        }
        if let Some(timeout) = lookup("PSW_AI_TIMEOUT_SECONDS") {
            self.ai.timeout_seconds = parse_number("PSW_AI_TIMEOUT_SECONDS", &timeout)?;
        }

        // Budgeting
        if let Some(target) = lookup("PSW_GROSS_MARGIN_TARGET") {
            self.budgeting.gross_margin_target = parse_ratio("PSW_GROSS_MARGIN_TARGET", &target)?;
        }
        if let Some(fee) = lookup("PSW_ADMIN_FEE_PERCENT") {
            self.budgeting.admin_fee_percent = parse_ratio("PSW_ADMIN_FEE_PERCENT", &fee)?;
        }
        if let Some(policy) = lookup("PSW_SAP_AMOUNT_POLICY") {
            self.budgeting.sap_amount_policy =
                SapAmountPolicy::parse(&policy).ok_or_else(|| ConfigError::InvalidValue {
                    key: "PSW_SAP_AMOUNT_POLICY".to_string(),
                    message: format!("expected 'flat_rate' or 'role_rate', got '{}'", policy),
                })?;
        }
        if let Some(rate) = lookup("PSW_SAP_FLAT_RATE") {
            self.budgeting.sap_flat_rate = parse_number("PSW_SAP_FLAT_RATE", &rate)?;
        }

        // Export
        if let Some(dir) = lookup("PSW_EXPORT_DIR") {
            self.export.output_dir = dir;
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{}' is not a number", value),
    })
}

fn parse_ratio(key: &str, value: &str) -> Result<f64, ConfigError> {
    let ratio: f64 = parse_number(key, value)?;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{} is outside 0..=1", ratio),
        });
    }
    Ok(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.budgeting.gross_margin_target, 0.385);
        assert_eq!(config.budgeting.admin_fee_percent, 0.10);
        assert_eq!(config.budgeting.sap_amount_policy, SapAmountPolicy::FlatRate);
        assert_eq!(config.budgeting.sap_resource_type, "0ACT");
        assert_eq!(config.ai.provider, AiProvider::Disabled);
        assert!(!config.ai.is_configured());
    }

    #[test]
    fn test_api_key_selects_anthropic() {
        let config = AppConfig::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.ai.provider, AiProvider::Anthropic);
        assert!(config.ai.is_configured());
    }

    #[test]
    fn test_openai_key_and_provider_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-openai")])).unwrap();
        assert_eq!(config.ai.provider, AiProvider::OpenAi);
        assert!(config.ai.is_configured());
        assert_eq!(config.ai.model(), "gpt-4o-mini");
        assert_eq!(config.ai.base_url(), "https://api.openai.com");

        // Anthropic wins when both keys are present
        let both = AppConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-openai"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
        ]))
        .unwrap();
        assert_eq!(both.ai.provider, AiProvider::Anthropic);
        assert_eq!(both.ai.api_key.as_deref(), Some("sk-ant"));
        assert_eq!(both.ai.model(), "claude-3-5-haiku-20241022");
    }

    #[test]
    fn test_explicit_provider_wins_over_key() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("PSW_AI_PROVIDER", "disabled"),
        ]))
        .unwrap();
        assert_eq!(config.ai.provider, AiProvider::Disabled);
        assert!(!config.ai.is_configured());
    }

    #[test]
    fn test_explicit_provider_takes_its_own_key() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PSW_AI_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
        ]))
        .unwrap();
        assert_eq!(config.ai.provider, AiProvider::OpenAi);
        assert_eq!(config.ai.api_key.as_deref(), Some("sk-openai"));

        // no key of its own: the other provider's key is not borrowed
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PSW_AI_PROVIDER", "openai"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
        ]))
        .unwrap();
        assert_eq!(config.ai.api_key, None);
        assert!(!config.ai.is_configured());
    }

    #[test]
    fn test_budgeting_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PSW_GROSS_MARGIN_TARGET", "0.4"),
            ("PSW_SAP_AMOUNT_POLICY", "role-rate"),
            ("PSW_EXPORT_DIR", "/tmp/exports"),
        ]))
        .unwrap();
        assert_eq!(config.budgeting.gross_margin_target, 0.4);
        assert_eq!(config.budgeting.sap_amount_policy, SapAmountPolicy::RoleRate);
        assert_eq!(config.export.output_dir, "/tmp/exports");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PSW_GROSS_MARGIN_TARGET", "38.5")]))
            .unwrap_err();
        assert!(err.to_string().contains("PSW_GROSS_MARGIN_TARGET"));

        let err = AppConfig::from_lookup(lookup_from(&[("PSW_AI_PROVIDER", "gemini")])).unwrap_err();
        assert!(err.to_string().contains("unknown provider"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[budgeting]\nsap_amount_policy = \"role_rate\"\nsap_flat_rate = 600.0\n\n[ai]\nmodel = \"claude-test\""
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.budgeting.sap_amount_policy, SapAmountPolicy::RoleRate);
        assert_eq!(config.budgeting.sap_flat_rate, 600.0);
        assert_eq!(config.ai.model(), "claude-test");
        // Untouched sections keep their defaults
        assert_eq!(config.budgeting.gross_margin_target, 0.385);
    }
}
