//! Small text helpers used when building result titles and rewritten
//! queries.

use chrono::Duration;

/// Normalise a project name for use inside a rewritten query.
///
/// Lowercases and replaces every run of non-alphanumeric characters with a
/// single `-`, so the name survives whitespace tokenisation:
/// `"Big Client / Website"` becomes `"big-client-website"`.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Format a duration as `H:MM:SS` (hours unpadded, no days).
pub fn format_clock(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// Format tracked hours the way selector subtitles show them,
/// e.g. `"10 hours"` or `"1 hour"`.
pub fn format_hours(hours: f64) -> String {
    let rounded = hours.round();
    #[allow(clippy::float_cmp)]
    if rounded == 1.0 {
        "1 hour".to_string()
    } else {
        format!("{rounded:.0} hours")
    }
}

/// Strip a trailing `"N hours"`/`"N hour"` fragment from a subtitle.
///
/// Fuzzy matching runs over title plus subtitle; without this, typing a
/// digit would match every project via its tracked-hours suffix.
pub fn strip_hours_suffix(subtitle: &str) -> String {
    let trimmed = subtitle.trim_end();
    for suffix in ["hours", "hour"] {
        if let Some(rest) = trimmed.strip_suffix(suffix) {
            let rest = rest.trim_end();
            let without_number = rest.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
            if without_number.len() < rest.len() {
                return without_number.trim_end().to_string();
            }
        }
    }
    trimmed.to_string()
}
