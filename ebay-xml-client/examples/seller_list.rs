//! Listing a seller's items with the Trading API, configured from TOML.
//!
//! # Running this example
//!
//! ```bash
//! export EBAY_APP_ID=... EBAY_DEV_ID=... EBAY_CERT_ID=... EBAY_AUTH_TOKEN=...
//! cargo run --example seller_list --features observability -- testseller
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use std::env;

use ebay_xml_client::{
    Engine, EngineConfig, Operation,
    service::{DateRange, trading},
};

const CONFIG: &str = r#"
environment = "sandbox"
credential_policy = "strict"

[credentials.sandbox]
app_id = { env = "EBAY_APP_ID" }
dev_id = { env = "EBAY_DEV_ID" }
cert_id = { env = "EBAY_CERT_ID" }

[transport]
timeout_secs = 20
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "observability")]
    ebay_xml_client::observability::init_observability(
        ebay_xml_client::observability::LogFormat::from_env(),
    )?;

    let seller = env::args().nth(1).unwrap_or_else(|| "testseller".to_owned());
    let token =
        env::var("EBAY_AUTH_TOKEN").map_err(|_| "EBAY_AUTH_TOKEN environment variable not set")?;

    let config = EngineConfig::from_toml(CONFIG)?;
    let engine = Engine::from_config(&config)?;

    let mut service = trading::service(token)?;
    config.apply_endpoint_overrides(&mut service)?;
    service
        .set_argument(trading::ARG_SELLER, seller)
        .set_argument(trading::ARG_ENTRIES_PER_PAGE, 25)
        .set_argument(
            trading::ARG_START_TIME_RANGE,
            DateRange::parse("2024-01-01 00:00:00", "2024-03-31 23:59:59")?,
        );

    let call = engine.prepare(&service, Operation::GetSellerList)?;
    println!("POST {} (request {})", call.endpoint(), call.request_id());

    let response = engine.send(&call).await?;
    println!("HTTP {}", response.status);
    println!("{}", response.text());

    Ok(())
}
