//! Error types for the eBay XML client.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Descriptor Errors** ([`EbayError::UnsupportedOperation`],
//!   [`EbayError::UnresolvedEndpoint`], [`EbayError::MissingAuthToken`]):
//!   the request could not be built; nothing was sent
//! - **Transport Errors** ([`EbayError::HttpError`], [`EbayError::HttpStatus`],
//!   [`EbayError::Timeout`], [`EbayError::TransportError`]): the request was built
//!   but the exchange with eBay failed
//! - **Credential Errors** ([`EbayError::MissingCredential`]): only raised under
//!   [`CredentialPolicy::Strict`](crate::environment::CredentialPolicy::Strict)
//! - **Setup Errors** ([`EbayError::ConfigError`], [`EbayError::InvalidArgument`],
//!   [`EbayError::CryptoError`], [`EbayError::Io`])
//!
//! None of these are retried by the crate.
//!
//! # Examples
//!
//! ```
//! use ebay_xml_client::{
//!     error::EbayError,
//!     service::{Operation, finding},
//! };
//!
//! let service = finding::service();
//! let err = service.request_xml(Operation::GetSellerList).unwrap_err();
//! assert!(matches!(err, EbayError::UnsupportedOperation { .. }));
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::environment::{CredentialKind, Environment};

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, EbayError>;

/// Errors that can occur while building or executing an eBay API call.
///
/// # Error Recovery
///
/// - **Descriptor errors**: fix the call site; retrying cannot help
/// - **Transport errors**: the caller decides whether to retry
/// - **Setup errors**: fix configuration or input data
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum EbayError {
    /// The service has no renderer registered for the requested operation.
    ///
    /// Raised by [`Service::request_xml`](crate::service::Service::request_xml)
    /// and when parsing an unknown operation name.
    #[error("operation '{operation}' is not supported by the {service} service")]
    UnsupportedOperation {
        /// Operation name as requested.
        operation: String,
        /// Name of the service that rejected it.
        service: &'static str,
    },

    /// The service has no endpoint for the engine's active environment.
    #[error("no {environment} endpoint registered for the {service} service")]
    UnresolvedEndpoint {
        /// Name of the service.
        service: &'static str,
        /// Environment that was looked up.
        environment: Environment,
    },

    /// An identity credential is missing and the engine runs with the strict policy.
    #[error("no {kind} registered for the {environment} environment")]
    MissingCredential {
        /// Environment that was looked up.
        environment: Environment,
        /// Which credential is missing.
        kind: CredentialKind,
    },

    /// The Trading service was constructed without a user auth token.
    #[error("an auth token must be specified when using the eBay Trading API")]
    MissingAuthToken,

    /// HTTP request failed at the network layer.
    ///
    /// Wraps [`reqwest::Error`]: connection refused, DNS failure, TLS failure,
    /// or the client-level timeout configured in
    /// [`HttpConfig`](crate::transport::HttpConfig).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// eBay answered with a non-success HTTP status.
    ///
    /// The body is kept so callers can still inspect the XML error payload.
    #[error("eBay returned HTTP status {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The caller-supplied deadline elapsed before the response arrived.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The transport rejected the request before sending it.
    #[error("transport error: {0}")]
    TransportError(String),

    /// A request argument has the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Encryption or decryption failed.
    #[error("cryptographic operation failed: {0}")]
    CryptoError(String),

    /// Writing a dumped response or reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EbayError {
    /// Returns true for failures of the HTTP exchange itself.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_)
                | Self::HttpStatus { .. }
                | Self::Timeout(_)
                | Self::TransportError(_)
        )
    }

    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
