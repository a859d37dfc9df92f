//! eBay Finding API (search).
//!
//! Supports [`Operation::FindItemsByKeywords`] and [`Operation::FindItemsAdvanced`].
//!
//! | Argument | Used by | When unset |
//! |----------|---------|------------|
//! | [`ARG_KEYWORDS`] | both | empty `<keywords>` in keyword search, omitted in advanced search |
//! | [`ARG_CATEGORY_ID`] | advanced | omitted |
//! | [`ARG_SELLER`] | advanced | no seller `ItemFilter` |
//! | [`ARG_ENTRIES_PER_PAGE`] | both | `10` |

use chrono::{DateTime, Utc};

use super::{
    ArgKey, ArgValue, ArgumentBag, EndpointTable, Operation, OperationRegistry, Service,
    xml::Payload,
};
use crate::environment::Environment;

/// Family name.
pub const NAME: &str = "finding";

/// Production endpoint.
pub const LIVE_ENDPOINT: &str = "http://svcs.ebay.com/services/search/FindingService/v1";

/// Sandbox endpoint.
pub const SANDBOX_ENDPOINT: &str = "http://svcs.sandbox.ebay.com/services/search/FindingService/v1";

/// Payload namespace.
pub const NAMESPACE: &str = "http://www.ebay.com/marketplace/search/v1/services";

/// Search keywords.
pub const ARG_KEYWORDS: ArgKey = ArgKey::new("__arg_ebay_finding_keywords");
/// Results per page.
pub const ARG_ENTRIES_PER_PAGE: ArgKey = ArgKey::new("__arg_ebay_finding_entriesPerPage");
/// Category filter.
pub const ARG_CATEGORY_ID: ArgKey = ArgKey::new("__arg_ebay_finding_categoryId");
/// Seller user id filter.
pub const ARG_SELLER: ArgKey = ArgKey::new("__arg_ebay_finding_seller");

static DEFAULT_ENTRIES_PER_PAGE: ArgValue = ArgValue::Integer(10);

/// Creates a Finding service with the standard endpoints and no arguments.
#[must_use]
pub fn service() -> Service {
    let endpoints = EndpointTable::new()
        .with(Environment::Live, LIVE_ENDPOINT)
        .with(Environment::Sandbox, SANDBOX_ENDPOINT);

    let operations = OperationRegistry::new()
        .register(Operation::FindItemsByKeywords, render_find_items_by_keywords)
        .register(Operation::FindItemsAdvanced, render_find_items_advanced);

    Service::new(NAME, endpoints, operations)
}

fn render_find_items_by_keywords(args: &ArgumentBag, _now: DateTime<Utc>) -> String {
    let keywords = args.get(&ARG_KEYWORDS).map(ToString::to_string).unwrap_or_default();

    let mut payload = Payload::new(Operation::FindItemsByKeywords.root_element(), NAMESPACE);
    payload.element(2, "keywords", &keywords);
    pagination(&mut payload, args);
    payload.finish()
}

fn render_find_items_advanced(args: &ArgumentBag, _now: DateTime<Utc>) -> String {
    let mut payload = Payload::new(Operation::FindItemsAdvanced.root_element(), NAMESPACE);

    if let Some(keywords) = args.get(&ARG_KEYWORDS) {
        payload.element(2, "keywords", &keywords.to_string());
    }

    if let Some(category_id) = args.get(&ARG_CATEGORY_ID) {
        payload.element(2, "categoryId", &category_id.to_string());
    }

    if let Some(seller) = args.get(&ARG_SELLER) {
        payload
            .open(2, "ItemFilter")
            .element(4, "name", "Seller")
            .element(4, "value", &seller.to_string())
            .close(2, "ItemFilter");
    }

    pagination(&mut payload, args);
    payload.finish()
}

fn pagination(payload: &mut Payload, args: &ArgumentBag) {
    let entries = args.get_or(&ARG_ENTRIES_PER_PAGE, &DEFAULT_ENTRIES_PER_PAGE);
    payload
        .open(2, "paginationInput")
        .element(4, "entriesPerPage", &entries.to_string())
        .close(2, "paginationInput");
}
