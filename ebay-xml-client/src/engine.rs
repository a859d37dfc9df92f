//! Request engine: runs one eBay call through a fixed five-stage pipeline.
//!
//! 1. **Bind** the operation and the [`Service`] describing it.
//! 2. **Resolve** the service endpoint for the engine's [`Environment`].
//! 3. **Build headers**: the eleven provider headers, in wire order, with the
//!    identity values registered for the active environment.
//! 4. **Render** the XML body through [`Service::request_xml_at`].
//! 5. **Transmit** through the engine's [`Transport`].
//!
//! Stages 1-4 produce a [`PreparedCall`], a plain value owned by the caller,
//! so a single engine can serve any number of concurrent calls. Nothing is
//! validated or retried beyond what each stage needs to proceed.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ebay_xml_client::{
//!     engine::Engine,
//!     environment::Environment,
//!     service::{Operation, trading},
//! };
//!
//! # async fn example() -> ebay_xml_client::error::Result<()> {
//! let mut engine = Engine::new(Environment::Sandbox)?;
//! engine
//!     .set_app_id(Environment::Sandbox, "MyApp-SBX")
//!     .set_dev_id(Environment::Sandbox, "dev-id")
//!     .set_cert_id(Environment::Sandbox, "SBX-cert");
//!
//! let service = trading::service("AgAAAA**token")?
//!     .with_argument(trading::ARG_SELLER, "testseller");
//!
//! let response = engine.execute(&service, Operation::GetSellerList).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

use std::{borrow::Cow, io, time::Duration};

use chrono::{DateTime, Utc};
use tracing::{Span, debug, instrument, warn};
use uuid::Uuid;

use crate::{
    config::EngineConfig,
    environment::{CredentialKind, CredentialPolicy, Credentials, Environment},
    error::{EbayError, Result},
    service::{Operation, Service},
    transport::{HttpTransport, Transport, TransportResponse},
};

/// Region marker sent in `X-EBAY-SOA-GLOBAL-ID`.
pub const GLOBAL_ID: &str = "EBAY-GB";
/// Value of `X-EBAY-API-COMPATIBILITY-LEVEL`.
pub const COMPATIBILITY_LEVEL: &str = "705";
/// Value of `X-EBAY-API-SITEID`.
pub const SITE_ID: &str = "3";
/// Request and response data format marker.
pub const DATA_FORMAT: &str = "XML";
/// Content type written ahead of a dumped response.
pub const CONTENT_TYPE_XML: &str = "application/xml";

/// Names of the provider headers, in the order they are sent.
pub const HEADER_NAMES: [&str; 11] = [
    "X-EBAY-SOA-GLOBAL-ID",
    "X-EBAY-SOA-OPERATION-NAME",
    "X-EBAY-SOA-SECURITY-APPNAME",
    "X-EBAY-API-APP-NAME",
    "X-EBAY-API-CERT-NAME",
    "X-EBAY-API-DEV-NAME",
    "X-EBAY-SOA-REQUEST-DATA-FORMAT",
    "X-EBAY-SOA-RESPONSE-DATA-FORMAT",
    "X-EBAY-API-COMPATIBILITY-LEVEL",
    "X-EBAY-API-SITEID",
    "X-EBAY-API-CALL-NAME",
];

/// Everything needed to transmit one call.
///
/// Produced by [`Engine::prepare`]; transmitting it does not consume it, so
/// the same prepared call can be inspected, logged or sent again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCall {
    request_id: Uuid,
    operation: Operation,
    service: &'static str,
    environment: Environment,
    endpoint: String,
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl PreparedCall {
    /// Identifier attached to this call's log spans.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// The bound operation.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Name of the bound service.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    /// Environment the endpoint and credentials were resolved for.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Resolved endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Provider headers in wire order.
    #[must_use]
    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    /// Returns the value of the first header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Rendered XML body, declaration included.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Raw answer to a successful call.
///
/// The body bytes are kept exactly as received; parsing the XML is left to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
}

impl ApiResponse {
    /// Returns the raw response body.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body decoded as UTF-8, invalid sequences replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Consumes the response, returning the body bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Returns the value of the first response header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Writes the raw body to `out` preceded by an XML content-type line.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `out`.
    pub fn dump<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "Content-Type: {CONTENT_TYPE_XML}\n\n")?;
        out.write_all(&self.body)?;
        out.flush()
    }
}

impl From<TransportResponse> for ApiResponse {
    fn from(response: TransportResponse) -> Self {
        Self { status: response.status, body: response.body, headers: response.headers }
    }
}

/// Runs eBay calls for one environment with one set of credentials.
///
/// All methods take `&self` once setup is done; share the engine freely.
#[derive(Debug)]
pub struct Engine<T = HttpTransport> {
    environment: Environment,
    credentials: Credentials,
    policy: CredentialPolicy,
    transport: T,
}

impl Engine<HttpTransport> {
    /// Creates an engine for `environment` using a default [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(environment: Environment) -> Result<Self> {
        Ok(Self::with_transport(environment, HttpTransport::new()?))
    }

    /// Creates an engine, credentials and transport from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, a credential refers to
    /// an unset environment variable, or the HTTP client cannot be created.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.transport)?;
        Ok(Self::with_transport(config.environment, transport)
            .with_credentials(config.resolve_credentials()?)
            .with_policy(config.credential_policy))
    }
}

impl<T: Transport> Engine<T> {
    /// Creates an engine for `environment` sending through `transport`.
    #[must_use]
    pub fn with_transport(environment: Environment, transport: T) -> Self {
        Self {
            environment,
            credentials: Credentials::new(),
            policy: CredentialPolicy::default(),
            transport,
        }
    }

    /// Replaces the credential registry.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets how absent identity credentials are treated.
    #[must_use]
    pub fn with_policy(mut self, policy: CredentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Switches the active environment.
    pub fn set_environment(&mut self, environment: Environment) -> &mut Self {
        self.environment = environment;
        self
    }

    /// Active credential policy.
    #[must_use]
    pub const fn policy(&self) -> CredentialPolicy {
        self.policy
    }

    /// Registered credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Reads a single registered credential.
    #[must_use]
    pub fn credential(&self, environment: Environment, kind: CredentialKind) -> Option<&str> {
        self.credentials.get(environment, kind)
    }

    /// Stores a credential for `environment`, overwriting any previous value.
    pub fn set_credential(
        &mut self,
        environment: Environment,
        kind: CredentialKind,
        value: impl Into<String>,
    ) -> &mut Self {
        self.credentials.set(environment, kind, value);
        self
    }

    /// Stores the application id for `environment`.
    pub fn set_app_id(&mut self, environment: Environment, value: impl Into<String>) -> &mut Self {
        self.set_credential(environment, CredentialKind::AppId, value)
    }

    /// Stores the developer id for `environment`.
    pub fn set_dev_id(&mut self, environment: Environment, value: impl Into<String>) -> &mut Self {
        self.set_credential(environment, CredentialKind::DevId, value)
    }

    /// Stores the certificate id for `environment`.
    pub fn set_cert_id(&mut self, environment: Environment, value: impl Into<String>) -> &mut Self {
        self.set_credential(environment, CredentialKind::CertId, value)
    }

    /// The transport calls are sent through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the provider headers for `operation` in wire order.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::MissingCredential`] under
    /// [`CredentialPolicy::Strict`] when an identity credential is absent.
    /// The lenient policy sends an empty value instead.
    pub fn build_headers(&self, operation: Operation) -> Result<Vec<(&'static str, String)>> {
        let app_id = self.identity(CredentialKind::AppId)?;
        let cert_id = self.identity(CredentialKind::CertId)?;
        let dev_id = self.identity(CredentialKind::DevId)?;
        let call_name = operation.call_name();

        let values = [
            GLOBAL_ID,
            call_name,
            app_id,
            app_id,
            cert_id,
            dev_id,
            DATA_FORMAT,
            DATA_FORMAT,
            COMPATIBILITY_LEVEL,
            SITE_ID,
            call_name,
        ];

        Ok(HEADER_NAMES
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name, value.to_owned()))
            .collect())
    }

    fn identity(&self, kind: CredentialKind) -> Result<&str> {
        match self.credentials.get(self.environment, kind) {
            Some(value) => Ok(value),
            None if self.policy == CredentialPolicy::Strict => {
                Err(EbayError::MissingCredential { environment: self.environment, kind })
            }
            None => {
                warn!(
                    environment = %self.environment,
                    %kind,
                    "credential not registered, sending empty value"
                );
                Ok("")
            }
        }
    }

    /// Runs stages 1-4 for `operation` at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::UnresolvedEndpoint`], [`EbayError::MissingCredential`]
    /// or [`EbayError::UnsupportedOperation`] from the failing stage.
    pub fn prepare(&self, service: &Service, operation: Operation) -> Result<PreparedCall> {
        self.prepare_at(service, operation, Utc::now())
    }

    /// Runs stages 1-4, anchoring default time windows at `now`.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::prepare`].
    #[instrument(
        skip(self, service, now),
        fields(service = service.name(), environment = %self.environment, request_id)
    )]
    pub fn prepare_at(
        &self,
        service: &Service,
        operation: Operation,
        now: DateTime<Utc>,
    ) -> Result<PreparedCall> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", tracing::field::display(request_id));
        debug!("bound operation");

        let endpoint = service.endpoint(self.environment)?.to_owned();
        debug!(%endpoint, "resolved endpoint");

        let headers = self.build_headers(operation)?;
        debug!(count = headers.len(), "built headers");

        let body = service.request_xml_at(operation, now)?;
        debug!(body_len = body.len(), "rendered body");

        Ok(PreparedCall {
            request_id,
            operation,
            service: service.name(),
            environment: self.environment,
            endpoint,
            headers,
            body,
        })
    }

    /// Runs stage 5 for an already prepared call.
    ///
    /// # Errors
    ///
    /// Returns the transport failure, if any.
    #[instrument(
        skip(self, call),
        fields(
            operation = %call.operation,
            service = call.service,
            environment = %call.environment,
            request_id = %call.request_id,
            protocol = self.transport.protocol_name()
        )
    )]
    pub async fn send(&self, call: &PreparedCall) -> Result<ApiResponse> {
        let headers: Vec<(&str, &str)> =
            call.headers.iter().map(|(name, value)| (*name, value.as_str())).collect();

        let response = self.transport.post(&call.endpoint, &headers, call.body.as_bytes()).await?;
        debug!(status = response.status, "transmitted");
        Ok(response.into())
    }

    /// Runs the full pipeline for `operation` and returns the raw response.
    ///
    /// # Errors
    ///
    /// Fails with the error of the first stage that cannot proceed.
    pub async fn execute(&self, service: &Service, operation: Operation) -> Result<ApiResponse> {
        let call = self.prepare(service, operation)?;
        self.send(&call).await
    }

    /// Like [`Engine::execute`], but gives up once `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::Timeout`] if the deadline passes first.
    pub async fn execute_with_timeout(
        &self,
        service: &Service,
        operation: Operation,
        timeout: Duration,
    ) -> Result<ApiResponse> {
        let call = self.prepare(service, operation)?;
        tokio::time::timeout(timeout, self.send(&call)).await.map_err(|_| {
            warn!(request_id = %call.request_id, ?timeout, "call timed out");
            EbayError::Timeout(timeout)
        })?
    }

    /// Runs the full pipeline, then writes the response to `out` via
    /// [`ApiResponse::dump`].
    ///
    /// # Errors
    ///
    /// Returns the pipeline error, or [`EbayError::Io`] if writing fails.
    pub async fn execute_and_dump<W: io::Write + ?Sized>(
        &self,
        service: &Service,
        operation: Operation,
        out: &mut W,
    ) -> Result<ApiResponse> {
        let response = self.execute(service, operation).await?;
        response.dump(out)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;
    use crate::{
        environment::CredentialSet,
        service::{finding, trading},
        transport::sealed,
    };

    #[derive(Debug, Clone)]
    struct Sent {
        url: String,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    /// Records every exchange and answers with a canned response.
    #[derive(Debug)]
    struct RecordingTransport {
        sent: Mutex<Vec<Sent>>,
        status: u16,
    }

    impl RecordingTransport {
        fn ok() -> Self {
            Self { sent: Mutex::default(), status: 200 }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl sealed::private::Sealed for RecordingTransport {}

    impl Transport for RecordingTransport {
        async fn post<'a>(
            &'a self,
            url: &'a str,
            headers: &'a [(&'a str, &'a str)],
            body: &'a [u8],
        ) -> Result<TransportResponse> {
            self.sent.lock().unwrap().push(Sent {
                url: url.to_owned(),
                headers: headers.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
                body: body.to_vec(),
            });
            if self.status >= 300 {
                return Err(EbayError::HttpStatus { status: self.status, body: "<Errors/>".into() });
            }
            Ok(TransportResponse {
                status: self.status,
                body: b"<GetSellerListResponse/>".to_vec(),
                headers: vec![("content-type".to_owned(), "text/xml".to_owned())],
            })
        }

        fn protocol_name(&self) -> &'static str {
            "recording"
        }
    }

    /// Never answers.
    #[derive(Debug)]
    struct StalledTransport;

    impl sealed::private::Sealed for StalledTransport {}

    impl Transport for StalledTransport {
        async fn post<'a>(
            &'a self,
            _url: &'a str,
            _headers: &'a [(&'a str, &'a str)],
            _body: &'a [u8],
        ) -> Result<TransportResponse> {
            std::future::pending().await
        }

        fn protocol_name(&self) -> &'static str {
            "stalled"
        }
    }

    fn sandbox_engine() -> Engine<RecordingTransport> {
        let mut engine = Engine::with_transport(Environment::Sandbox, RecordingTransport::ok());
        engine
            .set_app_id(Environment::Sandbox, "A")
            .set_dev_id(Environment::Sandbox, "D")
            .set_cert_id(Environment::Sandbox, "C");
        engine
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_build_headers_order_and_values() {
        let headers = sandbox_engine().build_headers(Operation::GetSellerList).unwrap();
        let expected = [
            ("X-EBAY-SOA-GLOBAL-ID", "EBAY-GB"),
            ("X-EBAY-SOA-OPERATION-NAME", "GetSellerList"),
            ("X-EBAY-SOA-SECURITY-APPNAME", "A"),
            ("X-EBAY-API-APP-NAME", "A"),
            ("X-EBAY-API-CERT-NAME", "C"),
            ("X-EBAY-API-DEV-NAME", "D"),
            ("X-EBAY-SOA-REQUEST-DATA-FORMAT", "XML"),
            ("X-EBAY-SOA-RESPONSE-DATA-FORMAT", "XML"),
            ("X-EBAY-API-COMPATIBILITY-LEVEL", "705"),
            ("X-EBAY-API-SITEID", "3"),
            ("X-EBAY-API-CALL-NAME", "GetSellerList"),
        ];
        let actual: Vec<(&str, &str)> = headers.iter().map(|(k, v)| (*k, v.as_str())).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_build_headers_lenient_sends_empty_values() {
        let engine = Engine::with_transport(Environment::Live, RecordingTransport::ok());
        let headers = engine.build_headers(Operation::FindItemsAdvanced).unwrap();
        assert_eq!(headers.len(), 11);
        assert_eq!(headers[2], ("X-EBAY-SOA-SECURITY-APPNAME", String::new()));
        assert_eq!(headers[4], ("X-EBAY-API-CERT-NAME", String::new()));
        assert_eq!(headers[5], ("X-EBAY-API-DEV-NAME", String::new()));
    }

    #[test]
    fn test_build_headers_uses_active_environment_only() {
        let mut engine = sandbox_engine();
        engine.set_app_id(Environment::Live, "LIVE-APP");
        let headers = engine.build_headers(Operation::GetSellerList).unwrap();
        assert_eq!(headers[3].1, "A");

        engine.set_environment(Environment::Live);
        let headers = engine.build_headers(Operation::GetSellerList).unwrap();
        assert_eq!(headers[3].1, "LIVE-APP");
        assert_eq!(headers[5].1, "");
    }

    #[test]
    fn test_strict_policy_rejects_missing_credential() {
        let engine = Engine::with_transport(Environment::Sandbox, RecordingTransport::ok())
            .with_credentials(Credentials::new().with(
                Environment::Live,
                CredentialSet::new("a", "d", "c"),
            ))
            .with_policy(CredentialPolicy::Strict);

        let err = engine.build_headers(Operation::GetSellerList).unwrap_err();
        assert!(matches!(
            err,
            EbayError::MissingCredential {
                environment: Environment::Sandbox,
                kind: CredentialKind::AppId
            }
        ));
    }

    #[test]
    fn test_prepare_end_to_end_scenario() {
        let engine = sandbox_engine();
        let service = trading::service("TOKEN")
            .unwrap()
            .with_argument(trading::ARG_SELLER, "testseller")
            .with_argument(trading::ARG_ENTRIES_PER_PAGE, 25);

        let call = engine.prepare_at(&service, Operation::GetSellerList, fixed_now()).unwrap();
        assert_eq!(call.endpoint(), trading::SANDBOX_ENDPOINT);
        assert_eq!(call.header("X-EBAY-SOA-SECURITY-APPNAME"), Some("A"));
        assert_eq!(call.service(), trading::NAME);
        assert_eq!(call.environment(), Environment::Sandbox);
        assert_eq!(call.operation(), Operation::GetSellerList);
        assert!(call.body().contains("<UserID>testseller</UserID>"));
        assert!(call.body().contains("<EntriesPerPage>25</EntriesPerPage>"));
        assert!(!call.body().contains("<CategoryID>"));
        assert!(call.body().contains("<StartTimeTo>2024-03-01T08:00:00.000Z</StartTimeTo>"));
    }

    #[test]
    fn test_prepare_unresolved_endpoint() {
        let engine = sandbox_engine();
        let mut service = finding::service();
        let bare = crate::service::Service::new(
            "bare",
            crate::service::EndpointTable::new().with(Environment::Live, "https://x.example"),
            crate::service::OperationRegistry::new(),
        );
        let err = engine.prepare(&bare, Operation::FindItemsAdvanced).unwrap_err();
        assert!(matches!(
            err,
            EbayError::UnresolvedEndpoint { service: "bare", environment: Environment::Sandbox }
        ));

        service.set_endpoint(Environment::Sandbox, "https://override.example/finding");
        let call = engine.prepare(&service, Operation::FindItemsAdvanced).unwrap();
        assert_eq!(call.endpoint(), "https://override.example/finding");
    }

    #[test]
    fn test_prepare_unsupported_operation() {
        let engine = sandbox_engine();
        let err = engine.prepare(&finding::service(), Operation::GetSellerList).unwrap_err();
        assert!(matches!(err, EbayError::UnsupportedOperation { service: "finding", .. }));
    }

    #[test]
    fn test_prepared_calls_get_distinct_request_ids() {
        let engine = sandbox_engine();
        let service = finding::service();
        let first = engine.prepare(&service, Operation::FindItemsByKeywords).unwrap();
        let second = engine.prepare(&service, Operation::FindItemsByKeywords).unwrap();
        assert_ne!(first.request_id(), second.request_id());
    }

    #[tokio::test]
    async fn test_execute_sends_prepared_exchange() {
        let engine = sandbox_engine();
        let service = finding::service().with_argument(finding::ARG_KEYWORDS, "lens");

        let response = engine.execute(&service, Operation::FindItemsByKeywords).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text(), "<GetSellerListResponse/>");
        assert_eq!(response.header("Content-Type"), Some("text/xml"));

        let sent = engine.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, finding::SANDBOX_ENDPOINT);
        assert_eq!(sent[0].headers.len(), 11);
        assert_eq!(sent[0].headers[10].0, "X-EBAY-API-CALL-NAME");
        assert_eq!(sent[0].headers[10].1, "findItemsByKeywords");
        let body = String::from_utf8(sent[0].body.clone()).unwrap();
        assert!(body.starts_with(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<findItemsByKeywordsRequest"
        ));
    }

    #[tokio::test]
    async fn test_execute_failure_before_transmission_sends_nothing() {
        let engine = sandbox_engine();
        let result = engine.execute(&finding::service(), Operation::GetSellerList).await;
        assert!(result.is_err());
        assert!(engine.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn test_execute_surfaces_http_status() {
        let transport = RecordingTransport { sent: Mutex::default(), status: 503 };
        let engine = Engine::with_transport(Environment::Live, transport);
        let err =
            engine.execute(&finding::service(), Operation::FindItemsAdvanced).await.unwrap_err();
        assert!(err.is_transport_failure());
        assert_eq!(err.status_code(), Some(503));
    }

    #[tokio::test]
    async fn test_execute_with_timeout() {
        let engine = Engine::with_transport(Environment::Sandbox, StalledTransport);
        let err = engine
            .execute_with_timeout(
                &finding::service(),
                Operation::FindItemsAdvanced,
                Duration::from_millis(20),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EbayError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_execute_and_dump() {
        let engine = sandbox_engine();
        let mut out = Vec::new();
        let response = engine
            .execute_and_dump(&finding::service(), Operation::FindItemsAdvanced, &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Content-Type: application/xml\n\n<GetSellerListResponse/>"
        );
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_api_response_keeps_non_utf8_bytes() {
        let raw = b"<a>\xE9</a>".to_vec();
        let response = ApiResponse::from(TransportResponse {
            status: 200,
            body: raw.clone(),
            headers: Vec::new(),
        });

        assert_eq!(response.bytes(), raw.as_slice());
        assert_eq!(response.text(), "<a>\u{FFFD}</a>");

        let mut out = Vec::new();
        response.dump(&mut out).unwrap();
        assert!(out.ends_with(&raw));
        assert_eq!(response.into_bytes(), raw);
    }

    #[tokio::test]
    async fn test_engine_is_shareable_across_tasks() {
        let engine = std::sync::Arc::new(sandbox_engine());
        let mut handles = Vec::new();
        for seller in ["a", "b", "c", "d"] {
            let engine = std::sync::Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                let service = trading::service("tok")
                    .unwrap()
                    .with_argument(trading::ARG_SELLER, seller);
                engine.execute(&service, Operation::GetSellerList).await.map(|_| ())
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let sent = engine.transport().sent();
        assert_eq!(sent.len(), 4);
        for seller in ["a", "b", "c", "d"] {
            let tag = format!("<UserID>{seller}</UserID>");
            let matches = sent
                .iter()
                .filter(|s| String::from_utf8_lossy(&s.body).contains(&tag))
                .count();
            assert_eq!(matches, 1);
        }
    }

    proptest! {
        #[test]
        fn prop_header_set_law(
            app in "[A-Za-z0-9-]{0,16}",
            dev in "[A-Za-z0-9-]{0,16}",
            cert in "[A-Za-z0-9-]{0,16}",
            op_index in 0usize..Operation::ALL.len(),
            live in any::<bool>(),
        ) {
            let environment = if live { Environment::Live } else { Environment::Sandbox };
            let other = if live { Environment::Sandbox } else { Environment::Live };
            let operation = Operation::ALL[op_index];

            let mut engine = Engine::with_transport(environment, RecordingTransport::ok());
            engine
                .set_app_id(environment, app.clone())
                .set_dev_id(environment, dev.clone())
                .set_cert_id(environment, cert.clone())
                .set_app_id(other, "other-app");

            let headers = engine.build_headers(operation).unwrap();
            let names: Vec<&str> = headers.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(names, HEADER_NAMES.to_vec());
            prop_assert_eq!(&headers[1].1, operation.call_name());
            prop_assert_eq!(&headers[10].1, operation.call_name());
            prop_assert_eq!(&headers[2].1, &app);
            prop_assert_eq!(&headers[3].1, &app);
            prop_assert_eq!(&headers[4].1, &cert);
            prop_assert_eq!(&headers[5].1, &dev);
        }
    }
}
