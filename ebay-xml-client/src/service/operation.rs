//! Operation identifiers.

use std::{fmt, str::FromStr};

use crate::error::{EbayError, Result};

/// An eBay API call a [`Service`](super::Service) can render.
///
/// The call name doubles as the value of the `X-EBAY-SOA-OPERATION-NAME` and
/// `X-EBAY-API-CALL-NAME` headers; the payload root element is the call name
/// with a `Request` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Operation {
    /// Finding API keyword search.
    FindItemsByKeywords,
    /// Finding API search with category and seller filters.
    FindItemsAdvanced,
    /// Trading API listing of one seller's items.
    GetSellerList,
}

impl Operation {
    /// Every operation known to this crate.
    pub const ALL: [Self; 3] =
        [Self::FindItemsByKeywords, Self::FindItemsAdvanced, Self::GetSellerList];

    /// Returns the eBay call name.
    #[must_use]
    pub const fn call_name(self) -> &'static str {
        match self {
            Self::FindItemsByKeywords => "findItemsByKeywords",
            Self::FindItemsAdvanced => "findItemsAdvanced",
            Self::GetSellerList => "GetSellerList",
        }
    }

    /// Returns the root element of the request payload.
    #[must_use]
    pub const fn root_element(self) -> &'static str {
        match self {
            Self::FindItemsByKeywords => "findItemsByKeywordsRequest",
            Self::FindItemsAdvanced => "findItemsAdvancedRequest",
            Self::GetSellerList => "GetSellerListRequest",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.call_name())
    }
}

impl FromStr for Operation {
    type Err = EbayError;

    /// Accepts either the call name or the root element name.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.call_name() == s || op.root_element() == s)
            .ok_or_else(|| EbayError::UnsupportedOperation {
                operation: s.to_owned(),
                service: "eBay",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_element_is_call_name_plus_request() {
        for op in Operation::ALL {
            assert_eq!(op.root_element(), format!("{}Request", op.call_name()));
        }
    }

    #[test]
    fn test_parse_call_name_and_root_element() {
        assert_eq!("GetSellerList".parse::<Operation>().unwrap(), Operation::GetSellerList);
        assert_eq!(
            "findItemsByKeywordsRequest".parse::<Operation>().unwrap(),
            Operation::FindItemsByKeywords
        );
    }

    #[test]
    fn test_parse_unknown_operation() {
        let err = "GetItem".parse::<Operation>().unwrap_err();
        assert!(matches!(
            err,
            EbayError::UnsupportedOperation { ref operation, .. } if operation == "GetItem"
        ));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("getsellerlist".parse::<Operation>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::FindItemsAdvanced.to_string(), "findItemsAdvanced");
    }
}
