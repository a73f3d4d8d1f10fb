//! Field parsers for the raw text of a flight results export.
//!
//! Every parser here is lenient: malformed input degrades to a documented
//! default instead of failing the row.

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

const MINUTES_PER_DAY: u32 = 24 * 60;

static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)(?:sa|h)").expect("valid hours pattern"));
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)(?:dk|m)").expect("valid minutes pattern"));
static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digits pattern"));
static CONNECTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*(?:aktarma|connection|stop|transfer)").expect("valid stops pattern")
});

const DIRECT_MARKERS: &[&str] = &["direkt", "direct", "nonstop", "non-stop"];

/// Parses a displayed price into an integer amount.
///
/// All non-digit characters are dropped, so `"1.010"`, `"1 010"` and
/// `"1010"` all yield 1010. A decimal fraction is merged into the digits
/// rather than rounded. Empty or oversized input yields 0.
pub fn parse_price(text: &str) -> u64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or_else(|_| {
        trace!(text, "price digits overflow, defaulting to 0");
        0
    })
}

/// Normalizes a currency code. `"TL"` is an alias for `"TRY"`, and a blank
/// value is assumed to be `"TRY"`.
pub fn normalize_currency(text: &str) -> String {
    let code = text.trim().to_uppercase();
    match code.as_str() {
        "" | "TL" => "TRY".to_string(),
        _ => code,
    }
}

/// Converts a duration such as `"1sa 35dk"` or `"2h 5m"` to minutes.
///
/// When neither an hours nor a minutes token is present, every digit run in
/// the text is summed as a best-effort fallback.
pub fn parse_duration_minutes(text: &str) -> u32 {
    let compact: String = turkish_lowercase(text)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let hours = HOURS_RE
        .captures(&compact)
        .map(|c| parse_u32_saturating(&c[1]));
    let minutes = MINUTES_RE
        .captures(&compact)
        .map(|c| parse_u32_saturating(&c[1]));

    if hours.is_none() && minutes.is_none() {
        let sum = DIGITS_RE
            .find_iter(&compact)
            .map(|m| parse_u32_saturating(m.as_str()))
            .fold(0u32, u32::saturating_add);
        trace!(text, sum, "no duration tokens, summing digit runs");
        return sum;
    }

    hours
        .unwrap_or(0)
        .saturating_mul(60)
        .saturating_add(minutes.unwrap_or(0))
}

/// Extracts the number of connections. Direct flights and unrecognized
/// text both yield 0.
pub fn parse_stops(text: &str) -> u32 {
    let lowered = turkish_lowercase(text.trim());
    if lowered.is_empty() || DIRECT_MARKERS.iter().any(|m| lowered.contains(m)) {
        return 0;
    }
    CONNECTIONS_RE
        .captures(&lowered)
        .map(|c| parse_u32_saturating(&c[1]))
        .unwrap_or(0)
}

/// Maps an `"HH:MM"` departure time onto one of `slot_count` equal buckets
/// of the day. Unparsable times fall into slot 0.
///
/// `slot_count` is expected to be at least 1; 0 is treated as 1.
pub fn time_to_slot(hhmm: &str, slot_count: usize) -> usize {
    let slot_count = slot_count.max(1);
    let Ok(time) = NaiveTime::parse_from_str(hhmm.trim(), "%H:%M") else {
        return 0;
    };

    let minutes = time.hour() * 60 + time.minute();
    // More slots than minutes in a day would make the bucket zero wide.
    let bucket = (MINUTES_PER_DAY as usize / slot_count).max(1);
    (minutes as usize / bucket).min(slot_count - 1)
}

/// Lowercases with the Turkish dotted/dotless I rules, so `"DİREKT"` reads
/// as `"direkt"`.
fn turkish_lowercase(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            'İ' => vec!['i'],
            'I' => vec!['ı'],
            other => other.to_lowercase().collect(),
        })
        .collect()
}

fn parse_u32_saturating(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
