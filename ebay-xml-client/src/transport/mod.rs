//! Transport abstraction for eBay XML calls.
//!
//! The engine hands a transport one fully prepared exchange: an absolute URL,
//! an ordered header list and a UTF-8 XML body. The transport performs a
//! single HTTP POST and returns the raw response. It never retries.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ebay_xml_client::transport::{HttpTransport, Transport};
//!
//! # async fn example() -> ebay_xml_client::error::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let headers = [("X-EBAY-API-CALL-NAME", "GetSellerList")];
//! let response = transport
//!     .post("https://api.sandbox.ebay.com/ws/api.dll", &headers, b"<GetSellerListRequest/>")
//!     .await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::error::{EbayError, Result};

pub mod config;
pub mod http;
pub(crate) mod sealed;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// Raw response of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport protocol abstraction.
///
/// This trait is sealed; only implementations within this crate exist.
///
/// Implementations must send the given headers verbatim and in order, send the
/// body unchanged, and report non-success statuses as
/// [`EbayError::HttpStatus`] with the body preserved.
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// Sends `body` to `url` as a POST with exactly `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::TransportError`] for malformed URLs or headers,
    /// [`EbayError::HttpError`] for network failures and
    /// [`EbayError::HttpStatus`] for non-2xx answers.
    fn post<'a>(
        &'a self,
        url: &'a str,
        headers: &'a [(&'a str, &'a str)],
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}

/// Rejects header names and values carrying ASCII control characters.
///
/// Tab is the only control character allowed, and only in values.
pub(crate) fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(|c| c.is_ascii_control()) {
        return Err(EbayError::TransportError(format!(
            "invalid header name {name:?}: must be non-empty without control characters"
        )));
    }
    if value.chars().any(|c| c.is_ascii_control() && c != '\t') {
        return Err(EbayError::TransportError(format!(
            "invalid value for header {name}: control characters not allowed"
        )));
    }
    Ok(())
}
