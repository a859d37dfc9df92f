//! eBay XML Client: request pipeline for the eBay Finding and Trading XML APIs
//!
//! eBay's legacy APIs take an XML document posted over HTTP together with a
//! fixed set of `X-EBAY-*` headers. This crate builds those requests from a
//! loosely typed argument bag and sends them, returning the raw XML answer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  arguments   ┌──────────────────────────────────────┐
//! │   Service    │─────────────▶│               Engine                 │
//! │ (finding /   │              │ bind → endpoint → headers → render   │
//! │  trading)    │              │                    │                 │
//! └──────────────┘              │              PreparedCall            │
//!                               └────────────────────┬─────────────────┘
//!                                                    │ POST url, headers, XML
//!                                          ┌─────────▼─────────┐
//!                                          │  HttpTransport    │
//!                                          └─────────┬─────────┘
//!                                                    │
//!                                              eBay (live / sandbox)
//! ```
//!
//! - A [`Service`] describes one API family: its endpoint per
//!   [`Environment`], the [`Operation`]s it can render and the arguments
//!   set by the caller.
//! - The [`Engine`] owns the credentials and the transport. It turns a
//!   service and an operation into a [`PreparedCall`](engine::PreparedCall)
//!   and sends it.
//!
//! # Quick Start
//!
//! ## 1. Search by keywords
//!
//! ```rust,no_run
//! use ebay_xml_client::{Engine, Environment, Operation, service::finding};
//!
//! # async fn example() -> ebay_xml_client::Result<()> {
//! let mut engine = Engine::new(Environment::Live)?;
//! engine.set_app_id(Environment::Live, "MyApp-PRD-1234");
//!
//! let service = finding::service()
//!     .with_argument(finding::ARG_KEYWORDS, "vintage camera")
//!     .with_argument(finding::ARG_ENTRIES_PER_PAGE, 25);
//!
//! let response = engine.execute(&service, Operation::FindItemsByKeywords).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. List a seller's items
//!
//! ```rust,no_run
//! use ebay_xml_client::{Engine, Environment, Operation, service::{DateRange, trading}};
//!
//! # async fn example() -> ebay_xml_client::Result<()> {
//! let mut engine = Engine::new(Environment::Sandbox)?;
//! engine
//!     .set_app_id(Environment::Sandbox, "MyApp-SBX")
//!     .set_dev_id(Environment::Sandbox, "dev-id")
//!     .set_cert_id(Environment::Sandbox, "SBX-cert");
//!
//! let mut service = trading::service("AgAAAA**user-token")?;
//! service
//!     .set_argument(trading::ARG_SELLER, "testseller")
//!     .set_argument(
//!         trading::ARG_START_TIME_RANGE,
//!         DateRange::parse("2024-01-01 00:00:00", "2024-03-31 23:59:59")?,
//!     );
//!
//! let response = engine.execute(&service, Operation::GetSellerList).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```
//!
//! ## 3. Inspect a request without sending it
//!
//! ```rust
//! use ebay_xml_client::{Engine, Environment, Operation, service::trading};
//!
//! # fn example() -> ebay_xml_client::Result<()> {
//! let engine = Engine::new(Environment::Sandbox)?;
//! let service = trading::service("token")?.with_argument(trading::ARG_SELLER, "testseller");
//!
//! let call = engine.prepare(&service, Operation::GetSellerList)?;
//! assert_eq!(call.endpoint(), trading::SANDBOX_ENDPOINT);
//! assert_eq!(call.header("X-EBAY-API-CALL-NAME"), Some("GetSellerList"));
//! assert!(call.body().contains("<UserID>testseller</UserID>"));
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`environment`]: environments and the credential registry
//! - [`service`]: request descriptors, with [`service::finding`] and [`service::trading`]
//! - [`engine`]: the five-stage call pipeline and dump mode
//! - [`transport`]: sealed HTTP transport abstraction
//! - [`config`]: TOML configuration for the engine
//! - [`error`]: error types
//! - [`crypt`], [`text`]: small helpers for stored tokens and URL slugs
//!
//! # Security Considerations
//!
//! - Certificate verification is on by default. It can be disabled through
//!   [`HttpConfig::verify_tls`](transport::HttpConfig::verify_tls) for legacy
//!   hosts only, and doing so logs a warning.
//! - Credentials and auth tokens are never logged; `Debug` output redacts them.
//! - Header values are checked for control characters before sending.
//!
//! # Error Handling
//!
//! All operations return [`Result<T, EbayError>`](error::Result). Nothing is
//! retried by the crate:
//!
//! ```rust
//! use ebay_xml_client::{EbayError, Engine, Environment, Operation, service::finding};
//!
//! # async fn example() {
//! let engine = Engine::new(Environment::Sandbox).unwrap();
//! let service = finding::service().with_argument(finding::ARG_KEYWORDS, "lens");
//!
//! match engine.execute(&service, Operation::FindItemsAdvanced).await {
//!     Ok(response) => println!("{}", response.text()),
//!     Err(EbayError::HttpStatus { status, body }) => {
//!         eprintln!("eBay answered {status}: {body}");
//!     }
//!     Err(e) if e.is_transport_failure() => eprintln!("network problem: {e}"),
//!     Err(e) => eprintln!("request could not be built: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and aes-gcm"
)]

pub mod config;
pub mod crypt;
pub mod engine;
pub mod environment;
pub mod error;
#[cfg(feature = "observability")]
pub mod observability;
pub mod service;
pub mod text;
pub mod transport;

pub use config::EngineConfig;
pub use engine::{ApiResponse, Engine, PreparedCall};
pub use environment::{CredentialKind, CredentialPolicy, Credentials, Environment};
pub use error::{EbayError, Result};
pub use service::{Operation, Service};

