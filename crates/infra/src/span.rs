//! Regex-based parser for free-text relative time spans.
//!
//! Accepts a signed sequence of amount/unit parts: `"5 mins"`, `"-2h"`,
//! `"1h30m"`, `"90 seconds"`, `"1.5h"`. The sign applies to the whole span.
//! Rejections are ordinary parse errors; resolvers turn them into usage
//! examples.

use once_cell::sync::Lazy;
use regex::Regex;
use tally_core::SpanParser;
use tally_domain::{Result, TallyError};

// Longer unit spellings first so the alternation cannot stop at a prefix.
const UNIT: &str = "hours|hour|hrs|hr|h|minutes|minute|mins|min|m|seconds|second|secs|sec|s";

#[allow(clippy::unwrap_used)] // const pattern, covered by the accept table below
static SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^\s*(-)?\s*((?:\d+(?:\.\d+)?\s*(?:{UNIT})\s*)+)$")).unwrap()
});

#[allow(clippy::unwrap_used)] // const pattern, covered by the accept table below
static PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)(\d+(?:\.\d+)?)\s*({UNIT})")).unwrap());

/// The default [`SpanParser`] implementation.
pub struct RegexSpanParser;

impl SpanParser for RegexSpanParser {
    fn parse(&self, text: &str) -> Result<chrono::Duration> {
        let captures = SPAN
            .captures(text)
            .ok_or_else(|| TallyError::Parse(format!("not a time span: {text}")))?;
        let negative = captures.get(1).is_some();
        let body = captures.get(2).map_or("", |m| m.as_str());

        let mut seconds = 0.0_f64;
        for part in PART.captures_iter(body) {
            let amount: f64 = part
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| TallyError::Parse(format!("bad amount in span: {text}")))?;
            let unit = part.get(2).map_or("", |m| m.as_str());
            seconds += amount * unit_seconds(unit);
        }

        if negative {
            seconds = -seconds;
        }
        #[allow(clippy::cast_possible_truncation)] // sub-second precision is meaningless here
        Ok(chrono::Duration::seconds(seconds.round() as i64))
    }
}

fn unit_seconds(unit: &str) -> f64 {
    match unit.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('h') => 3600.0,
        Some('m') => 60.0,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn parse(text: &str) -> Result<chrono::Duration> {
        RegexSpanParser.parse(text)
    }

    #[test]
    fn accepts_the_usual_spellings() {
        let table = [
            ("5 mins", 300),
            ("-2h", -7200),
            ("1h30m", 5400),
            ("1.5h", 5400),
            ("90 seconds", 90),
            (" -45 min ", -2700),
            ("1 hour 15 minutes", 4500),
            ("-1H", -3600),
        ];
        for (text, expected) in table {
            assert_eq!(parse(text).unwrap().num_seconds(), expected, "input {text:?}");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for text in ["", "soon", "mins", "5 bananas", "h30", "5m gibberish", "--5m"] {
            assert!(matches!(parse(text), Err(TallyError::Parse(_))), "input {text:?}");
        }
    }
}
