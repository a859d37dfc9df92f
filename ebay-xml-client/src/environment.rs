//! Environments and the per-environment credential registry.
//!
//! eBay runs two fully separate installations: production (`live`) and the
//! developer `sandbox`. Every service carries one endpoint per environment and
//! every application has one key set per environment.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::Deserialize;

use crate::error::{EbayError, Result};

/// Target eBay installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Production.
    Live,
    /// Developer sandbox.
    #[default]
    Sandbox,
}

impl Environment {
    /// All known environments.
    pub const ALL: [Self; 2] = [Self::Live, Self::Sandbox];

    /// Returns the tag used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = EbayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "live" => Ok(Self::Live),
            "sandbox" => Ok(Self::Sandbox),
            other => Err(EbayError::ConfigError(format!("unknown environment '{other}'"))),
        }
    }
}

/// One of the three identifiers eBay issues per application key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Application id (`AppID`), also called the client id.
    AppId,
    /// Developer id (`DevID`).
    DevId,
    /// Certificate id (`CertID`), also called the client secret.
    CertId,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AppId => "app id",
            Self::DevId => "dev id",
            Self::CertId => "cert id",
        })
    }
}

/// How the engine treats identity credentials that were never registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialPolicy {
    /// Send an empty header value and let eBay reject the call.
    #[default]
    Lenient,
    /// Fail with [`EbayError::MissingCredential`] before anything is sent.
    Strict,
}

/// The key set registered for one environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    app_id: Option<String>,
    dev_id: Option<String>,
    cert_id: Option<String>,
}

impl CredentialSet {
    /// Creates a fully populated key set.
    #[must_use]
    pub fn new(
        app_id: impl Into<String>,
        dev_id: impl Into<String>,
        cert_id: impl Into<String>,
    ) -> Self {
        Self {
            app_id: Some(app_id.into()),
            dev_id: Some(dev_id.into()),
            cert_id: Some(cert_id.into()),
        }
    }

    /// Returns the stored value for `kind`.
    #[must_use]
    pub fn get(&self, kind: CredentialKind) -> Option<&str> {
        match kind {
            CredentialKind::AppId => self.app_id.as_deref(),
            CredentialKind::DevId => self.dev_id.as_deref(),
            CredentialKind::CertId => self.cert_id.as_deref(),
        }
    }

    /// Stores `value` for `kind`, replacing any previous value.
    pub fn set(&mut self, kind: CredentialKind, value: impl Into<String>) {
        let slot = match kind {
            CredentialKind::AppId => &mut self.app_id,
            CredentialKind::DevId => &mut self.dev_id,
            CredentialKind::CertId => &mut self.cert_id,
        };
        *slot = Some(value.into());
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("app_id", &self.app_id.as_deref().map(redact))
            .field("dev_id", &self.dev_id.as_deref().map(redact))
            .field("cert_id", &self.cert_id.as_deref().map(redact))
            .finish()
    }
}

/// Credential registry keyed by environment.
///
/// Values are not validated; an unset value reads back as `None`.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    sets: HashMap<Environment, CredentialSet>,
}

impl Credentials {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a single credential, overwriting any previous value.
    pub fn set(
        &mut self,
        environment: Environment,
        kind: CredentialKind,
        value: impl Into<String>,
    ) {
        self.sets.entry(environment).or_default().set(kind, value);
    }

    /// Replaces the whole key set of `environment`.
    pub fn insert(&mut self, environment: Environment, set: CredentialSet) {
        self.sets.insert(environment, set);
    }

    /// Builder form of [`Credentials::insert`].
    #[must_use]
    pub fn with(mut self, environment: Environment, set: CredentialSet) -> Self {
        self.insert(environment, set);
        self
    }

    /// Reads a single credential.
    #[must_use]
    pub fn get(&self, environment: Environment, kind: CredentialKind) -> Option<&str> {
        self.sets.get(&environment).and_then(|set| set.get(kind))
    }

    /// Returns the key set of `environment`, if any credential was registered.
    #[must_use]
    pub fn set_for(&self, environment: Environment) -> Option<&CredentialSet> {
        self.sets.get(&environment)
    }
}

/// Masks a secret for logs, keeping only the last four characters.
pub(crate) fn redact(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let visible: String = secret.chars().skip(len - 4).collect();
    format!("{}{visible}", "*".repeat(len - 4))
}
