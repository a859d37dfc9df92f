//! The named-argument bag a service renders its payloads from.

use std::{borrow::Cow, collections::HashMap, fmt};

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::error::{EbayError, Result};

/// Date-time layout eBay expects inside `StartTimeFrom`/`StartTimeTo`.
pub const EBAY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// Layout accepted by [`DateRange::parse`].
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Name of an argument.
///
/// Each service family defines its own constants with a family prefix, so a key
/// from one family never matches an argument read by another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgKey(Cow<'static, str>);

impl ArgKey {
    /// Creates a key from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a key from a runtime name.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the key name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Start-time window for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Inclusive start.
    pub from: DateTime<Utc>,
    /// Inclusive end.
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range from two instants.
    #[must_use]
    pub const fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Returns the window of `days` days ending at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::InvalidArgument`] if `days` is out of range or
    /// the start falls before the earliest representable instant.
    pub fn lookback(now: DateTime<Utc>, days: i64) -> Result<Self> {
        TimeDelta::try_days(days)
            .and_then(|delta| now.checked_sub_signed(delta))
            .map(|from| Self { from, to: now })
            .ok_or_else(|| {
                EbayError::InvalidArgument(format!(
                    "lookback of {days} days from {now} is out of range"
                ))
            })
    }

    /// Parses two `YYYY-MM-DD HH:MM:SS` timestamps, interpreted as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::InvalidArgument`] if either timestamp is malformed.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(Self { from: parse_timestamp(from)?, to: parse_timestamp(to)? })
    }

    /// Formats the start in eBay's date-time layout.
    #[must_use]
    pub fn from_ebay(&self) -> String {
        self.from.format(EBAY_DATE_FORMAT).to_string()
    }

    /// Formats the end in eBay's date-time layout.
    #[must_use]
    pub fn to_ebay(&self) -> String {
        self.to.format(EBAY_DATE_FORMAT).to_string()
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), INPUT_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| EbayError::InvalidArgument(format!("invalid timestamp '{value}': {e}")))
}

/// Value stored under an [`ArgKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Start-time window.
    DateRange(DateRange),
}

impl ArgValue {
    /// Returns the date range, if this value holds one.
    #[must_use]
    pub const fn as_date_range(&self) -> Option<&DateRange> {
        match self {
            Self::DateRange(range) => Some(range),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
            Self::DateRange(range) => write!(f, "{}/{}", range.from_ebay(), range.to_ebay()),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<DateRange> for ArgValue {
    fn from(value: DateRange) -> Self {
        Self::DateRange(value)
    }
}

/// Mutable mapping from [`ArgKey`] to [`ArgValue`].
///
/// Writes replace earlier values. Reads distinguish "never set" from any set
/// value, including empty text and zero.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArgumentBag {
    values: HashMap<ArgKey, ArgValue>,
}

impl ArgumentBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &ArgKey) -> Option<&ArgValue> {
        self.values.get(key)
    }

    /// Returns the value stored under `key`, or `default` if it was never set.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &ArgKey, default: &'a ArgValue) -> &'a ArgValue {
        self.values.get(key).unwrap_or(default)
    }

    /// Returns true if `key` was set.
    #[must_use]
    pub fn contains(&self, key: &ArgKey) -> bool {
        self.values.contains_key(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn set(&mut self, key: ArgKey, value: impl Into<ArgValue>) -> Option<ArgValue> {
        self.values.insert(key, value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &ArgKey) -> Option<ArgValue> {
        self.values.remove(key)
    }

    /// Number of stored arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no argument is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// Values may hold the user auth token, so only keys are printed.
impl fmt::Debug for ArgumentBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(ArgKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ArgumentBag").field("keys", &keys).finish()
    }
}
