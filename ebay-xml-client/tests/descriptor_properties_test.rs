//! Property tests for payload rendering.

use chrono::{TimeDelta, TimeZone, Utc};
use ebay_xml_client::{
    EbayError, Operation,
    service::{ArgKey, DateRange, Service, XML_DECLARATION, finding, trading},
};
use proptest::prelude::*;

fn all_services() -> Vec<Service> {
    vec![finding::service(), trading::service("token").unwrap()]
}

/// Optional fields and the tag that must appear only when they are set.
fn optional_fields() -> Vec<(Operation, ArgKey, &'static str)> {
    vec![
        (Operation::FindItemsAdvanced, finding::ARG_KEYWORDS, "<keywords>"),
        (Operation::FindItemsAdvanced, finding::ARG_CATEGORY_ID, "<categoryId>"),
        (Operation::FindItemsAdvanced, finding::ARG_SELLER, "<ItemFilter>"),
        (Operation::GetSellerList, trading::ARG_CATEGORY_ID, "<CategoryID>"),
    ]
}

fn service_for(operation: Operation) -> Service {
    match operation {
        Operation::GetSellerList => trading::service("token").unwrap(),
        _ => finding::service(),
    }
}

#[test]
fn test_every_payload_starts_with_declaration_and_root() {
    for service in all_services() {
        for operation in Operation::ALL {
            match service.request_xml(operation) {
                Ok(xml) => {
                    let (declaration, body) = xml.split_once('\n').unwrap();
                    assert_eq!(declaration, XML_DECLARATION);
                    assert!(body.starts_with(&format!("<{} ", operation.root_element())));
                    assert!(body.ends_with(&format!("</{}>", operation.root_element())));
                }
                Err(err) => {
                    assert!(!service.supports(operation));
                    assert!(matches!(err, EbayError::UnsupportedOperation { .. }));
                }
            }
        }
    }
}

#[test]
fn test_unset_optional_fields_are_omitted() {
    for (operation, _, tag) in optional_fields() {
        let xml = service_for(operation).request_xml(operation).unwrap();
        assert!(!xml.contains(tag), "{tag} rendered for {operation} without argument");
    }
}

proptest! {
    #[test]
    fn prop_set_optional_fields_are_rendered(
        field in 0usize..4,
        text in "[a-zA-Z0-9 ]{0,12}",
        number in any::<i32>(),
        as_number in any::<bool>(),
    ) {
        let (operation, key, tag) = optional_fields().swap_remove(field);
        let mut service = service_for(operation);
        if as_number {
            service.set_argument(key, number);
        } else {
            service.set_argument(key, text);
        }

        let xml = service.request_xml(operation).unwrap();
        prop_assert!(xml.contains(tag));
    }

    #[test]
    fn prop_default_window_is_119_days(offset_secs in 0i64..2_000_000_000) {
        let now = Utc.timestamp_opt(offset_secs, 0).unwrap();
        let xml = trading::service("t")
            .unwrap()
            .request_xml_at(Operation::GetSellerList, now)
            .unwrap();

        let expected = DateRange::new(now - TimeDelta::days(119), now);
        let from_tag = format!("<StartTimeFrom>{}</StartTimeFrom>", expected.from_ebay());
        let to_tag = format!("<StartTimeTo>{}</StartTimeTo>", expected.to_ebay());
        prop_assert!(xml.contains(&from_tag));
        prop_assert!(xml.contains(&to_tag));
    }

    #[test]
    fn prop_entries_per_page_is_preserved(entries in any::<i64>()) {
        let service = finding::service().with_argument(finding::ARG_ENTRIES_PER_PAGE, entries);
        let xml = service.request_xml(Operation::FindItemsByKeywords).unwrap();
        let expected = format!("<entriesPerPage>{entries}</entriesPerPage>");
        prop_assert!(xml.contains(&expected));
    }

    #[test]
    fn prop_text_arguments_never_break_markup(keywords in ".{0,40}") {
        let service = finding::service().with_argument(finding::ARG_KEYWORDS, keywords);
        let xml = service.request_xml(Operation::FindItemsByKeywords).unwrap();
        let start = xml.find("<keywords>").unwrap() + "<keywords>".len();
        let end = xml.find("</keywords>").unwrap();
        prop_assert!(start <= end);
        prop_assert!(!xml[start..end].contains('<'));
    }
}
