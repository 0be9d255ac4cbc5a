//! Plugin configuration
//!
//! [`PluginOptions`] is what the user writes (TOML file, CLI flags); every
//! field is optional. [`PluginConfig::resolve`] applies defaults and the
//! environment once at setup, and only the resolved config flows onward.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use useai_cache::DEFAULT_CACHE_FILE;
use useai_client::{ClientSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default configuration file name
pub const CONFIG_FILE: &str = "useai.toml";

/// Text used as the cache fingerprint of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintMode {
    /// Declared signature only; editing hint comments alone does not regenerate
    #[default]
    Signature,
    /// Full construct source, marker and hint comments included
    Source,
}

impl std::str::FromStr for FingerprintMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signature" => Ok(Self::Signature),
            "source" => Ok(Self::Source),
            other => Err(ConfigError::InvalidValue {
                key: "fingerprint",
                value: other.to_string(),
            }),
        }
    }
}

/// How generation work is scheduled during a transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduling {
    /// Queue every claimed function, then run them concurrently
    #[default]
    Deferred,
    /// Finish each claimed function before visiting the next
    Blocking,
}

/// User-facing options; unset fields take defaults at resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// Service credential
    pub api_key: Option<String>,
    /// Default model
    pub model: Option<String>,
    /// Default temperature
    pub temperature: Option<f64>,
    /// Cache file location, relative to the working directory
    pub cache_path: Option<PathBuf>,
    /// Fingerprint mode
    pub fingerprint: Option<FingerprintMode>,
    /// Scheduling mode
    pub scheduling: Option<Scheduling>,
    /// Chat-completions endpoint
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl PluginOptions {
    /// Create empty options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Overlay `other` on `self`: fields set in `other` win
    #[must_use]
    pub fn overlay(self, other: PluginOptions) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            temperature: other.temperature.or(self.temperature),
            cache_path: other.cache_path.or(self.cache_path),
            fingerprint: other.fingerprint.or(self.fingerprint),
            scheduling: other.scheduling.or(self.scheduling),
            endpoint: other.endpoint.or(self.endpoint),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// With default model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// With default temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// With cache path
    #[inline]
    #[must_use]
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// With fingerprint mode
    #[inline]
    #[must_use]
    pub fn with_fingerprint(mut self, mode: FingerprintMode) -> Self {
        self.fingerprint = Some(mode);
        self
    }

    /// With scheduling mode
    #[inline]
    #[must_use]
    pub fn with_scheduling(mut self, scheduling: Scheduling) -> Self {
        self.scheduling = Some(scheduling);
        self
    }

    /// With endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Resolved configuration
#[derive(Clone, PartialEq)]
pub struct PluginConfig {
    /// Service credential, never empty
    pub api_key: String,
    /// Default model
    pub model: String,
    /// Default temperature
    pub temperature: f64,
    /// Cache file location
    pub cache_path: PathBuf,
    /// Fingerprint mode
    pub fingerprint: FingerprintMode,
    /// Scheduling mode
    pub scheduling: Scheduling,
    /// Chat-completions endpoint
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
}

impl PluginConfig {
    /// Resolve options against defaults and the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when neither the options nor
    /// `OPENROUTER_API_KEY` supply a credential, and
    /// [`ConfigError::InvalidTemperature`] for a temperature outside 0..=2.
    pub fn resolve(options: PluginOptions) -> Result<Self, ConfigError> {
        Self::resolve_with(options, |name| std::env::var(name).ok())
    }

    /// Resolve options with an explicit environment lookup
    ///
    /// # Errors
    ///
    /// See [`PluginConfig::resolve`].
    pub fn resolve_with<F>(options: PluginOptions, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = options
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env(API_KEY_ENV).filter(|k| !k.trim().is_empty()))
            .ok_or(ConfigError::MissingApiKey)?;

        let temperature = options.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }

        Ok(Self {
            api_key,
            model: options
                .model
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            cache_path: options
                .cache_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE)),
            fingerprint: options.fingerprint.unwrap_or_default(),
            scheduling: options.scheduling.unwrap_or_default(),
            endpoint: options
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: options
                .timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        })
    }

    /// Settings for the HTTP generation client
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::new(self.api_key.clone())
            .with_endpoint(self.endpoint.clone())
            .with_default_model(self.model.clone())
            .with_timeout(self.timeout)
    }
}

impl fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("cache_path", &self.cache_path)
            .field("fingerprint", &self.fingerprint)
            .field("scheduling", &self.scheduling)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}
