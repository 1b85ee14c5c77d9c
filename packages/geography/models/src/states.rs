//! US state name and abbreviation utilities.
//!
//! The inventory tables key states by full name; map tooltips and compact
//! table cells use the two-letter postal abbreviation.

/// Full state name to two-letter abbreviation for the 50 states, sorted by
/// name.
pub const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Maps a full state name to its two-letter abbreviation.
///
/// Returns `None` for names outside the 50 states.
#[must_use]
pub fn state_abbr(name: &str) -> Option<&'static str> {
    STATE_ABBREVIATIONS
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .map(|idx| STATE_ABBREVIATIONS[idx].1)
}

/// Maps a two-letter abbreviation (any case) back to the full state name.
#[must_use]
pub fn state_name(abbr: &str) -> Option<&'static str> {
    let abbr = abbr.trim();
    STATE_ABBREVIATIONS
        .iter()
        .find(|(_, a)| a.eq_ignore_ascii_case(abbr))
        .map(|(name, _)| *name)
}
