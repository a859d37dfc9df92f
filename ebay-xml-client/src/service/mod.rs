//! Request descriptors for eBay API families.
//!
//! A [`Service`] bundles what one API family needs to produce a request:
//! an [`EndpointTable`] with one URL per environment, an [`OperationRegistry`]
//! mapping each supported [`Operation`] to a renderer, and an [`ArgumentBag`]
//! the caller fills in before execution.
//!
//! Adding a family means building a `Service` with its own table and
//! registry; the [`Engine`](crate::engine::Engine) never changes.
//!
//! # Examples
//!
//! ```
//! use ebay_xml_client::service::{Operation, finding};
//!
//! let mut service = finding::service();
//! service
//!     .set_argument(finding::ARG_KEYWORDS, "vintage camera")
//!     .set_argument(finding::ARG_ENTRIES_PER_PAGE, 50);
//!
//! let xml = service.request_xml(Operation::FindItemsByKeywords)?;
//! assert!(xml.contains("<keywords>vintage camera</keywords>"));
//! # Ok::<(), ebay_xml_client::EbayError>(())
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    environment::Environment,
    error::{EbayError, Result},
};

pub mod arguments;
pub mod endpoint;
pub mod finding;
pub mod operation;
pub mod trading;
mod xml;

pub use arguments::{ArgKey, ArgValue, ArgumentBag, DateRange, EBAY_DATE_FORMAT};
pub use endpoint::EndpointTable;
pub use operation::Operation;

/// Declaration every payload starts with, followed by a single `\n`.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Renders the body of one operation from the current arguments.
///
/// `now` anchors any time window the renderer derives on its own.
pub type RenderFn = fn(&ArgumentBag, DateTime<Utc>) -> String;

/// Operations a service can render.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    renderers: HashMap<Operation, RenderFn>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `render` for `operation`.
    #[must_use]
    pub fn register(mut self, operation: Operation, render: RenderFn) -> Self {
        self.renderers.insert(operation, render);
        self
    }

    /// Returns the renderer for `operation`.
    #[must_use]
    pub fn get(&self, operation: Operation) -> Option<RenderFn> {
        self.renderers.get(&operation).copied()
    }

    /// Returns true if `operation` is registered.
    #[must_use]
    pub fn contains(&self, operation: Operation) -> bool {
        self.renderers.contains_key(&operation)
    }

    /// Iterates the registered operations in no particular order.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.renderers.keys().copied()
    }
}

/// A configured request for one API family.
///
/// Setters return `&mut Self` so calls can be chained, and a consuming
/// [`Service::with_argument`] exists for expression-style construction.
#[derive(Debug, Clone)]
pub struct Service {
    name: &'static str,
    endpoints: EndpointTable,
    operations: OperationRegistry,
    args: ArgumentBag,
}

impl Service {
    /// Creates a service with no arguments.
    #[must_use]
    pub fn new(
        name: &'static str,
        endpoints: EndpointTable,
        operations: OperationRegistry,
    ) -> Self {
        Self { name, endpoints, operations, args: ArgumentBag::new() }
    }

    /// Returns the family name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Registers or replaces the URL for `environment`.
    pub fn set_endpoint(&mut self, environment: Environment, url: impl Into<String>) -> &mut Self {
        self.endpoints.set(environment, url);
        self
    }

    /// Returns the URL for `environment`.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::UnresolvedEndpoint`] if no URL is registered.
    pub fn endpoint(&self, environment: Environment) -> Result<&str> {
        self.endpoints
            .get(environment)
            .ok_or(EbayError::UnresolvedEndpoint { service: self.name, environment })
    }

    /// Returns the argument stored under `key`.
    #[must_use]
    pub fn argument(&self, key: &ArgKey) -> Option<&ArgValue> {
        self.args.get(key)
    }

    /// Returns the argument stored under `key`, or `default` if it was never set.
    #[must_use]
    pub fn argument_or<'a>(&'a self, key: &ArgKey, default: &'a ArgValue) -> &'a ArgValue {
        self.args.get_or(key, default)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_argument(&mut self, key: ArgKey, value: impl Into<ArgValue>) -> &mut Self {
        self.args.set(key, value);
        self
    }

    /// Same as [`Service::set_argument`].
    pub fn add_argument(&mut self, key: ArgKey, value: impl Into<ArgValue>) -> &mut Self {
        self.set_argument(key, value)
    }

    /// Consuming form of [`Service::set_argument`].
    #[must_use]
    pub fn with_argument(mut self, key: ArgKey, value: impl Into<ArgValue>) -> Self {
        self.args.set(key, value);
        self
    }

    /// Removes the argument stored under `key`.
    pub fn remove_argument(&mut self, key: &ArgKey) -> Option<ArgValue> {
        self.args.remove(key)
    }

    /// Returns all current arguments.
    #[must_use]
    pub const fn arguments(&self) -> &ArgumentBag {
        &self.args
    }

    /// Returns true if this service can render `operation`.
    #[must_use]
    pub fn supports(&self, operation: Operation) -> bool {
        self.operations.contains(operation)
    }

    /// Iterates the operations this service can render.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.operations.operations()
    }

    /// Renders the full payload for `operation` at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::UnsupportedOperation`] if `operation` is not registered.
    pub fn request_xml(&self, operation: Operation) -> Result<String> {
        self.request_xml_at(operation, Utc::now())
    }

    /// Renders the full payload for `operation`, anchoring default windows at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::UnsupportedOperation`] if `operation` is not registered.
    pub fn request_xml_at(&self, operation: Operation, now: DateTime<Utc>) -> Result<String> {
        let render = self.operations.get(operation).ok_or_else(|| {
            EbayError::UnsupportedOperation {
                operation: operation.call_name().to_owned(),
                service: self.name,
            }
        })?;

        let body = render(&self.args, now);
        let mut xml = String::with_capacity(XML_DECLARATION.len() + 1 + body.len());
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&body);
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARG_NAME: ArgKey = ArgKey::new("__arg_test_name");

    fn render_echo(args: &ArgumentBag, _now: DateTime<Utc>) -> String {
        let name = args.get(&ARG_NAME).map(ToString::to_string).unwrap_or_default();
        format!("<findItemsAdvancedRequest>{name}</findItemsAdvancedRequest>")
    }

    fn test_service() -> Service {
        Service::new(
            "test",
            EndpointTable::new().with(Environment::Live, "https://live.example.com"),
            OperationRegistry::new().register(Operation::FindItemsAdvanced, render_echo),
        )
    }

    #[test]
    fn test_request_xml_prepends_declaration() {
        let service = test_service().with_argument(ARG_NAME, "abc");
        let xml = service.request_xml(Operation::FindItemsAdvanced).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <findItemsAdvancedRequest>abc</findItemsAdvancedRequest>"
        );
    }

    #[test]
    fn test_request_xml_unsupported_operation() {
        let service = test_service();
        let err = service.request_xml(Operation::GetSellerList).unwrap_err();
        assert!(matches!(
            err,
            EbayError::UnsupportedOperation { ref operation, service: "test" }
                if operation == "GetSellerList"
        ));
    }

    #[test]
    fn test_endpoint_unresolved() {
        let service = test_service();
        assert_eq!(service.endpoint(Environment::Live).unwrap(), "https://live.example.com");
        let err = service.endpoint(Environment::Sandbox).unwrap_err();
        assert!(matches!(
            err,
            EbayError::UnresolvedEndpoint { service: "test", environment: Environment::Sandbox }
        ));
    }

    #[test]
    fn test_set_endpoint() {
        let mut service = test_service();
        service.set_endpoint(Environment::Sandbox, "https://sandbox.example.com");
        assert_eq!(service.endpoint(Environment::Sandbox).unwrap(), "https://sandbox.example.com");
    }

    #[test]
    fn test_add_argument_is_set_argument() {
        let mut service = test_service();
        service.add_argument(ARG_NAME, "one").add_argument(ARG_NAME, "two");
        assert_eq!(service.argument(&ARG_NAME), Some(&ArgValue::from("two")));
        assert_eq!(service.arguments().len(), 1);
    }

    #[test]
    fn test_remove_argument() {
        let mut service = test_service().with_argument(ARG_NAME, 1);
        assert_eq!(service.remove_argument(&ARG_NAME), Some(ArgValue::Integer(1)));
        let default = ArgValue::from("fallback");
        assert_eq!(service.argument_or(&ARG_NAME, &default), &default);
    }

    #[test]
    fn test_supports() {
        let service = test_service();
        assert!(service.supports(Operation::FindItemsAdvanced));
        assert!(!service.supports(Operation::FindItemsByKeywords));
        assert_eq!(service.operations().count(), 1);
    }
}
