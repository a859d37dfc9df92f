//! URL slugs for listing titles and category names.

/// ASCII whitespace as understood by the slug rules, vertical tab included.
const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Builds a slug from arbitrary text.
///
/// Lowercases, drops everything except ASCII letters, digits and whitespace,
/// trims, then turns each remaining whitespace character into `-`. Runs of
/// whitespace are not collapsed.
///
/// ```
/// use ebay_xml_client::text::make_slug;
///
/// assert_eq!(make_slug("  Vintage Camera (1970s)! "), "vintage-camera-1970s");
/// ```
#[must_use]
pub fn make_slug(value: &str) -> String {
    let kept: String = value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || is_space(*c))
        .collect();

    kept.trim_matches(is_space).chars().map(|c| if is_space(c) { '-' } else { c }).collect()
}

/// Turns a slug back into readable text.
///
/// Uppercases the first character and replaces each `-` with a space.
///
/// ```
/// use ebay_xml_client::text::unmake_slug;
///
/// assert_eq!(unmake_slug("vintage-camera"), "Vintage camera");
/// ```
#[must_use]
pub fn unmake_slug(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    first
        .to_uppercase()
        .chain(chars)
        .map(|c| if c == '-' { ' ' } else { c })
        .collect()
}
