//! Error handling example showing the failure classes of a call.
//!
//! Runs without credentials; every call here is expected to fail in a
//! different way.
//!
//! # Running this example
//!
//! ```bash
//! cargo run --example error_handling
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use std::time::Duration;

use ebay_xml_client::{
    CredentialPolicy, EbayError, Engine, Environment, Operation,
    engine::ApiResponse,
    service::{finding, trading},
};

fn report(label: &str, result: Result<ApiResponse, EbayError>) {
    match result {
        Ok(response) => {
            println!("{label}: HTTP {} ({} bytes)", response.status, response.text().len());
        }
        Err(EbayError::HttpStatus { status, body }) => {
            println!("{label}: eBay answered {status}: {body}");
        }
        Err(e) if e.is_transport_failure() => println!("{label}: network problem: {e}"),
        Err(e) => println!("{label}: not sent: {e}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A blank token is rejected before anything else happens.
    if let Err(e) = trading::service("  ") {
        println!("blank token: {e}");
    }

    // Strict policy refuses to send without credentials.
    let strict = Engine::new(Environment::Sandbox)?.with_policy(CredentialPolicy::Strict);
    let service = finding::service().with_argument(finding::ARG_KEYWORDS, "lens");
    report("strict", strict.execute(&service, Operation::FindItemsAdvanced).await);

    // Finding has no GetSellerList renderer.
    let lenient = Engine::new(Environment::Sandbox)?;
    report("unsupported", lenient.execute(&service, Operation::GetSellerList).await);

    // Nothing listens on the discard port.
    let mut unreachable = service.clone();
    unreachable.set_endpoint(Environment::Sandbox, "http://127.0.0.1:9/finding");
    report("unreachable", lenient.execute(&unreachable, Operation::FindItemsAdvanced).await);

    // Whole-call deadline on top of the transport timeouts.
    report(
        "deadline",
        lenient
            .execute_with_timeout(&service, Operation::FindItemsAdvanced, Duration::from_millis(1))
            .await,
    );

    Ok(())
}
