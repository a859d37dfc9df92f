//! Keyword search against the Finding API.
//!
//! # Running this example
//!
//! ```bash
//! export EBAY_APP_ID=MyApp-PRD-1234
//! cargo run --example keyword_search -- "vintage camera"
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use std::{env, io};

use ebay_xml_client::{Engine, Environment, Operation, service::finding};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app_id = env::var("EBAY_APP_ID").map_err(|_| "EBAY_APP_ID environment variable not set")?;
    let keywords = env::args().nth(1).unwrap_or_else(|| "vintage camera".to_owned());

    let mut engine = Engine::new(Environment::Live)?;
    engine.set_app_id(Environment::Live, app_id);

    let service = finding::service()
        .with_argument(finding::ARG_KEYWORDS, keywords)
        .with_argument(finding::ARG_ENTRIES_PER_PAGE, 5);

    eprintln!("Request:\n{}\n", service.request_xml(Operation::FindItemsByKeywords)?);

    // Raw passthrough, the same output a proxy endpoint would serve.
    engine
        .execute_and_dump(&service, Operation::FindItemsByKeywords, &mut io::stdout())
        .await?;

    Ok(())
}
