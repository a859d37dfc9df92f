//! eBay Trading API (seller listings).
//!
//! Supports [`Operation::GetSellerList`]. Every Trading call carries the
//! seller's user auth token inside the payload, so [`service`] requires one.
//!
//! When [`ARG_START_TIME_RANGE`] is unset (or does not hold a
//! [`DateRange`]), the listing window covers the [`DEFAULT_LOOKBACK_DAYS`]
//! days before the moment of rendering.

use chrono::{DateTime, Utc};

use super::{
    ArgKey, ArgValue, ArgumentBag, DateRange, EndpointTable, Operation, OperationRegistry,
    Service, xml::Payload,
};
use crate::{
    environment::Environment,
    error::{EbayError, Result},
};

/// Family name.
pub const NAME: &str = "trading";

/// Production endpoint.
pub const LIVE_ENDPOINT: &str = "https://api.ebay.com/ws/api.dll";

/// Sandbox endpoint.
pub const SANDBOX_ENDPOINT: &str = "https://api.sandbox.ebay.com/ws/api.dll";

/// Payload namespace.
pub const NAMESPACE: &str = "urn:ebay:apis:eBLBaseComponents";

/// Length of the default start-time window.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 119;

/// Results per page.
pub const ARG_ENTRIES_PER_PAGE: ArgKey = ArgKey::new("__arg_ebay_trading_EntriesPerPage");
/// Category filter.
pub const ARG_CATEGORY_ID: ArgKey = ArgKey::new("__arg_ebay_trading_categoryId");
/// Seller user id.
pub const ARG_SELLER: ArgKey = ArgKey::new("__arg_ebay_trading_seller");
/// User auth token, set by [`service`].
pub const ARG_AUTH_TOKEN: ArgKey = ArgKey::new("__arg_ebay_trading_eBayAuthToken");
/// Listing start-time window, as an [`ArgValue::DateRange`].
pub const ARG_START_TIME_RANGE: ArgKey = ArgKey::new("__arg_ebay_trading_StartTimeRange");

/// Fields requested from `GetSellerList`, in wire order.
pub const OUTPUT_SELECTORS: [&str; 8] = [
    "ItemArray.Item.ItemId",
    "ItemArray.Item.ListingDetails.EndTime",
    "ItemArray.Item.ListingDetails.ViewItemURL",
    "ItemArray.Item.SellingStatus.CurrentPrice",
    "ItemArray.Item.SubTitle",
    "ItemArray.Item.Title",
    "ItemArray.Item.PictureDetails.GalleryURL",
    "PaginationResult",
];

static DEFAULT_ENTRIES_PER_PAGE: ArgValue = ArgValue::Integer(10);

/// Creates a Trading service authenticated with `auth_token`.
///
/// # Errors
///
/// Returns [`EbayError::MissingAuthToken`] if `auth_token` is empty or blank.
///
/// # Examples
///
/// ```
/// use ebay_xml_client::service::{Operation, trading};
///
/// let mut service = trading::service("AgAAAA**token")?;
/// service
///     .add_argument(trading::ARG_SELLER, "whateverseller")
///     .add_argument(trading::ARG_ENTRIES_PER_PAGE, 200);
///
/// let xml = service.request_xml(Operation::GetSellerList)?;
/// assert!(xml.contains("<UserID>whateverseller</UserID>"));
/// # Ok::<(), ebay_xml_client::EbayError>(())
/// ```
pub fn service(auth_token: impl Into<String>) -> Result<Service> {
    let auth_token = auth_token.into();
    if auth_token.trim().is_empty() {
        return Err(EbayError::MissingAuthToken);
    }

    let endpoints = EndpointTable::new()
        .with(Environment::Live, LIVE_ENDPOINT)
        .with(Environment::Sandbox, SANDBOX_ENDPOINT);

    let operations =
        OperationRegistry::new().register(Operation::GetSellerList, render_get_seller_list);

    Ok(Service::new(NAME, endpoints, operations).with_argument(ARG_AUTH_TOKEN, auth_token))
}

/// The lookback window ending at `now`, starting at the earliest
/// representable instant when `now` is too close to it.
fn default_window(now: DateTime<Utc>) -> DateRange {
    DateRange::lookback(now, DEFAULT_LOOKBACK_DAYS)
        .unwrap_or_else(|_| DateRange::new(DateTime::<Utc>::MIN_UTC, now))
}

fn render_get_seller_list(args: &ArgumentBag, now: DateTime<Utc>) -> String {
    let text = |key: &ArgKey| args.get(key).map(ToString::to_string).unwrap_or_default();

    let window = args
        .get(&ARG_START_TIME_RANGE)
        .and_then(ArgValue::as_date_range)
        .copied()
        .unwrap_or_else(|| default_window(now));

    let mut payload = Payload::new(Operation::GetSellerList.root_element(), NAMESPACE);

    if let Some(category_id) = args.get(&ARG_CATEGORY_ID) {
        payload.element(2, "CategoryID", &category_id.to_string());
    }

    payload
        .element(2, "UserID", &text(&ARG_SELLER))
        .element(2, "StartTimeFrom", &window.from_ebay())
        .element(2, "StartTimeTo", &window.to_ebay())
        .element(2, "GranularityLevel", "Fine");

    for selector in OUTPUT_SELECTORS {
        payload.element(2, "OutputSelector", selector);
    }

    let entries = args.get_or(&ARG_ENTRIES_PER_PAGE, &DEFAULT_ENTRIES_PER_PAGE);
    payload
        .open(2, "RequesterCredentials")
        .element(4, "eBayAuthToken", &text(&ARG_AUTH_TOKEN))
        .close(2, "RequesterCredentials")
        .open(2, "Pagination")
        .element(4, "EntriesPerPage", &entries.to_string())
        .close(2, "Pagination");

    payload.finish()
}
