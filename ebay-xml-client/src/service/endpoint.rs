//! Per-environment endpoint tables.

use std::collections::HashMap;

use crate::environment::Environment;

/// Mapping from [`Environment`] to the full URL a service posts to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointTable {
    urls: HashMap<Environment, String>,
}

impl EndpointTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`EndpointTable::set`].
    #[must_use]
    pub fn with(mut self, environment: Environment, url: impl Into<String>) -> Self {
        self.set(environment, url);
        self
    }

    /// Registers `url` for `environment`, replacing any previous URL.
    pub fn set(&mut self, environment: Environment, url: impl Into<String>) {
        self.urls.insert(environment, url.into());
    }

    /// Returns the URL registered for `environment`.
    #[must_use]
    pub fn get(&self, environment: Environment) -> Option<&str> {
        self.urls.get(&environment).map(String::as_str)
    }
}
