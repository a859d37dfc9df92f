//! Engine configuration loaded from TOML.
//!
//! ```toml
//! environment = "sandbox"
//! credential_policy = "strict"
//!
//! [credentials.sandbox]
//! app_id = "MyApp-SBX-1234"
//! dev_id = { env = "EBAY_SANDBOX_DEV_ID" }
//! cert_id = { env = "EBAY_SANDBOX_CERT_ID" }
//!
//! [endpoints.finding]
//! sandbox = "https://svcs.sandbox.ebay.com/services/search/FindingService/v1"
//!
//! [transport]
//! timeout_secs = 20
//! ```
//!
//! Every table is optional. Credential values are either literals or
//! `{ env = "NAME" }`, read from the process environment when the engine is
//! built, so secrets do not need to live in the file.

use std::{collections::HashMap, fmt, path::Path};

use serde::Deserialize;
use url::Url;

use crate::{
    environment::{CredentialKind, CredentialPolicy, Credentials, Environment, redact},
    error::{EbayError, Result},
    service::{Service, finding, trading},
    transport::HttpConfig,
};

/// Service names accepted under `[endpoints.<name>]`.
const KNOWN_SERVICES: [&str; 2] = [finding::NAME, trading::NAME];

/// A credential value, given inline or taken from an environment variable.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SecretValue {
    /// Value written in the file.
    Literal(String),
    /// Name of the environment variable holding the value.
    Env {
        /// Variable name.
        env: String,
    },
}

impl SecretValue {
    /// Returns the value, reading the environment if needed.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::ConfigError`] if the variable is unset or not UTF-8.
    pub fn resolve(&self) -> Result<String> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Env { env } => std::env::var(env).map_err(|e| {
                EbayError::ConfigError(format!("cannot read environment variable {env}: {e}"))
            }),
        }
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(&redact(value)).finish(),
            Self::Env { env } => f.debug_struct("Env").field("env", env).finish(),
        }
    }
}

/// Key set for one environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    /// Application id.
    pub app_id: Option<SecretValue>,
    /// Developer id.
    pub dev_id: Option<SecretValue>,
    /// Certificate id.
    pub cert_id: Option<SecretValue>,
}

impl CredentialConfig {
    fn entries(&self) -> [(CredentialKind, Option<&SecretValue>); 3] {
        [
            (CredentialKind::AppId, self.app_id.as_ref()),
            (CredentialKind::DevId, self.dev_id.as_ref()),
            (CredentialKind::CertId, self.cert_id.as_ref()),
        ]
    }

    /// Validates environment variable names.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::ConfigError`] for a malformed variable name.
    pub fn validate(&self) -> Result<()> {
        for (_, value) in self.entries() {
            if let Some(SecretValue::Env { env }) = value {
                validate_env_var_name(env)?;
            }
        }
        Ok(())
    }
}

/// Root engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Active environment.
    #[serde(default)]
    pub environment: Environment,

    /// Treatment of unregistered identity credentials.
    #[serde(default)]
    pub credential_policy: CredentialPolicy,

    /// Key sets, keyed by environment tag.
    #[serde(default)]
    pub credentials: HashMap<String, CredentialConfig>,

    /// Endpoint overrides: service name, then environment tag, then URL.
    #[serde(default)]
    pub endpoints: HashMap<String, HashMap<String, String>>,

    /// HTTP transport settings.
    #[serde(default)]
    pub transport: HttpConfig,
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::ConfigError`] if parsing or validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use ebay_xml_client::{config::EngineConfig, environment::Environment};
    ///
    /// let config = EngineConfig::from_toml(r#"
    ///     environment = "live"
    ///
    ///     [credentials.live]
    ///     app_id = "MyApp-PRD"
    /// "#)?;
    /// assert_eq!(config.environment, Environment::Live);
    /// # Ok::<(), ebay_xml_client::EbayError>(())
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| EbayError::ConfigError(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or [`EngineConfig::from_toml`] fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EbayError::ConfigError(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::ConfigError`] for unknown environment tags,
    /// endpoint overrides for an unknown service, malformed variable names or
    /// unparsable endpoint URLs, and
    /// [`EbayError::TransportError`] for out-of-range transport settings.
    pub fn validate(&self) -> Result<()> {
        for (tag, credentials) in &self.credentials {
            tag.parse::<Environment>()?;
            credentials.validate()?;
        }

        for (service, overrides) in &self.endpoints {
            if !KNOWN_SERVICES.contains(&service.as_str()) {
                return Err(EbayError::ConfigError(format!(
                    "unknown service in [endpoints.{service}], expected one of: {}",
                    KNOWN_SERVICES.join(", ")
                )));
            }
            for (tag, url) in overrides {
                tag.parse::<Environment>()?;
                validate_endpoint_url(service, url)?;
            }
        }

        self.transport.validate()
    }

    /// Builds the credential registry, resolving environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::ConfigError`] for an unknown environment tag or a
    /// referenced variable that is not set.
    pub fn resolve_credentials(&self) -> Result<Credentials> {
        let mut registry = Credentials::new();
        for (tag, credentials) in &self.credentials {
            let environment: Environment = tag.parse()?;
            for (kind, value) in credentials.entries() {
                if let Some(value) = value {
                    registry.set(environment, kind, value.resolve()?);
                }
            }
        }
        Ok(registry)
    }

    /// Applies the `[endpoints.<name>]` overrides matching `service`.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::ConfigError`] for an unknown environment tag.
    pub fn apply_endpoint_overrides(&self, service: &mut Service) -> Result<()> {
        if let Some(overrides) = self.endpoints.get(service.name()) {
            for (tag, url) in overrides {
                service.set_endpoint(tag.parse()?, url.clone());
            }
        }
        Ok(())
    }
}

fn validate_endpoint_url(service: &str, url: &str) -> Result<()> {
    let parsed = Url::parse(url).map_err(|e| {
        EbayError::ConfigError(format!("invalid endpoint for service {service} '{url}': {e}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EbayError::ConfigError(format!(
            "endpoint for service {service} must use http or https, got: {}",
            parsed.scheme()
        )));
    }
    Ok(())
}

/// Validates an environment variable name.
fn validate_env_var_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first_char) = chars.next() else {
        return Err(EbayError::ConfigError(
            "environment variable name cannot be empty".to_owned(),
        ));
    };

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(EbayError::ConfigError(format!(
            "environment variable name must start with letter or underscore: {name}"
        )));
    }

    if let Some(ch) = chars.find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(EbayError::ConfigError(format!(
            "environment variable name contains invalid character '{ch}': {name}"
        )));
    }

    Ok(())
}
