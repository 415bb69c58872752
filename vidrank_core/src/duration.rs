//! Catalog duration tokens.
//!
//! The catalog reports lengths as ISO-8601 durations restricted to the time
//! part, e.g. `PT4M13S`, `PT1H2M`, `PT45S`. Hours are consumed, not dropped:
//! `PT1H2M3S` is 3723 seconds. Anything with a date part (`P0D` is what live
//! streams report) is rejected so the caller can drop the candidate instead
//! of guessing.

use crate::error::DurationParseError;
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PT(?:(?P<h>\d+)H)?(?:(?P<m>\d+)M)?(?:(?P<s>\d+)S)?$").unwrap()
});

/// A date designator straight after `P`.
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^P\d+[YMWD]").unwrap());

/// Parse a catalog duration token into whole seconds.
pub fn parse_duration(token: &str) -> Result<u32, DurationParseError> {
    let token = token.trim();
    let fail = |reason: &'static str| DurationParseError {
        token: token.to_string(),
        reason,
    };

    if !token.starts_with('P') {
        return Err(fail("missing 'P' prefix"));
    }
    if !token.starts_with("PT") {
        return Err(if DATE_RE.is_match(token) {
            fail("date components are not supported")
        } else {
            fail("malformed duration")
        });
    }
    if token.len() == 2 {
        return Err(fail("no time components"));
    }

    let caps = TIME_RE
        .captures(token)
        .ok_or_else(|| fail("expected <n>H<n>M<n>S in that order"))?;

    let component = |name: &str, unit_seconds: u32| -> Result<u32, DurationParseError> {
        match caps.name(name) {
            Some(m) => m
                .as_str()
                .parse::<u32>()
                .ok()
                .and_then(|n| n.checked_mul(unit_seconds))
                .ok_or_else(|| fail("component out of range")),
            None => Ok(0),
        }
    };

    let hours = component("h", 3600)?;
    let minutes = component("m", 60)?;
    let seconds = component("s", 1)?;

    hours
        .checked_add(minutes)
        .and_then(|n| n.checked_add(seconds))
        .ok_or_else(|| fail("component out of range"))
}
