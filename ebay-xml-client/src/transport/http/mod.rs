//! HTTP transport implementation.
//!
//! This module provides HTTP/1.1 and HTTP/2 transport using reqwest.

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{EbayError, Result},
    transport::{Transport, TransportResponse, sealed, validate_header},
};

/// Checks that `url` is an absolute http(s) URL with a host.
fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| EbayError::TransportError(format!("invalid endpoint URL '{url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EbayError::TransportError(format!(
            "unsupported URL scheme '{}': only http and https are allowed",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(EbayError::TransportError(format!("endpoint URL has no host: {url}")));
    }

    Ok(parsed)
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Supports automatic connection pooling and keep-alive. One instance can be
/// shared by any number of concurrent calls.
///
/// # Examples
///
/// ```
/// use ebay_xml_client::transport::{HttpConfig, HttpTransport, Transport};
///
/// let transport = HttpTransport::with_config(&HttpConfig::default()).unwrap();
/// assert_eq!(transport.protocol_name(), "http");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Default configuration:
    /// - Pool max idle per host: 100
    /// - Timeout: 30 seconds
    /// - Connect timeout: 10 seconds
    /// - HTTP version: HTTP/1.1 only
    /// - TLS verification: on
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use ebay_xml_client::transport::{HttpConfig, HttpTransport, HttpVersion};
    ///
    /// let config = HttpConfig {
    ///     pool_max_idle_per_host: 20,
    ///     timeout_secs: 60,
    ///     connect_timeout_secs: 15,
    ///     http_version: HttpVersion::Http1,
    ///     verify_tls: true,
    /// };
    ///
    /// let transport = HttpTransport::with_config(&config).unwrap();
    /// ```
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        if !config.verify_tls {
            warn!("TLS certificate verification is disabled for this transport");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(EbayError::HttpError)?;

        Ok(Self { client, http_version: config.http_version })
    }

    #[instrument(
        skip(self, headers, body),
        fields(protocol = self.protocol_name(), header_count = headers.len(), body_len = body.len())
    )]
    async fn execute_request(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<TransportResponse> {
        let url = validate_url(url)?;

        for (name, value) in headers {
            validate_header(name, value)?;
        }

        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.body(body.to_vec()).send().await?;

        let status = response.status();
        let response_headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let response_body = response.bytes().await.map_err(EbayError::HttpError)?.to_vec();
        debug!(status = status.as_u16(), response_len = response_body.len(), "response received");

        if !status.is_success() {
            return Err(EbayError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&response_body).into_owned(),
            });
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            body: response_body,
            headers: response_headers,
        })
    }
}

impl Transport for HttpTransport {
    async fn post<'a>(
        &'a self,
        url: &'a str,
        headers: &'a [(&'a str, &'a str)],
        body: &'a [u8],
    ) -> Result<TransportResponse> {
        self.execute_request(url, headers, body).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}
