//! Single-value format rules.
//!
//! Every rule needs at least one qualifying character, so empty strings and
//! zero never pass the pattern checks.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::payload::stringify;

pub const SERIE_STATUSES: [&str; 3] = ["Ongoing", "Finished", "On_hold"];

pub const MAX_REVIEW_CHARS: usize = 2000;
pub const MIN_PASSWORD_CHARS: usize = 8;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

fn title_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^[a-zA-Z0-9\s]+$")
}

fn letters_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^[a-zA-Z]+$")
}

// `[0-9]` rather than `\d`: the latter matches every Unicode digit.
fn positive_integer_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^[1-9][0-9]*$")
}

fn rating_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^(10(\.0)?|[0-9](\.[0-9])?)$")
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
}

fn username_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^[a-zA-Z0-9._-]{3,30}$")
}

fn non_blank_match(value: &Value, re: &Regex) -> bool {
    value
        .as_str()
        .is_some_and(|s| !s.trim().is_empty() && re.is_match(s))
}

fn decimal_match(value: &Value, re: &Regex) -> bool {
    stringify(value).is_some_and(|s| re.is_match(&s))
}

#[must_use]
pub fn validate_title(value: &Value) -> bool {
    non_blank_match(value, title_pattern())
}

#[must_use]
pub fn validate_platform(value: &Value) -> bool {
    non_blank_match(value, letters_pattern())
}

#[must_use]
pub fn validate_genre(value: &Value) -> bool {
    non_blank_match(value, letters_pattern())
}

#[must_use]
pub fn validate_duration(value: &Value) -> bool {
    decimal_match(value, positive_integer_pattern())
}

#[must_use]
pub fn validate_year(value: &Value) -> bool {
    decimal_match(value, positive_integer_pattern())
}

#[must_use]
pub fn validate_season_number(value: &Value) -> bool {
    decimal_match(value, positive_integer_pattern())
}

#[must_use]
pub fn validate_episode_number(value: &Value) -> bool {
    decimal_match(value, positive_integer_pattern())
}

#[must_use]
pub fn validate_status(value: &Value) -> bool {
    value.as_str().is_some_and(|s| SERIE_STATUSES.contains(&s))
}

#[must_use]
pub fn validate_rating(value: &Value) -> bool {
    decimal_match(value, rating_pattern())
}

/// Calendar date carried by a value, if any.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `YYYY/MM/DD`, naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` and epoch milliseconds.
#[must_use]
pub fn parse_release_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.date_naive());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(dt.date());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
                .ok()
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

#[must_use]
pub fn validate_release_date(value: &Value) -> bool {
    parse_release_date(value).is_some()
}

#[must_use]
pub fn validate_email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| email_pattern().is_match(s))
}

#[must_use]
pub fn validate_username(value: &Value) -> bool {
    value.as_str().is_some_and(|s| username_pattern().is_match(s))
}

#[must_use]
pub fn validate_password(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.chars().count() >= MIN_PASSWORD_CHARS)
}

/// Rating score: any number from 0 to 10 inclusive.
#[must_use]
pub fn validate_score(value: &Value) -> bool {
    value
        .as_f64()
        .is_some_and(|f| f.is_finite() && (0.0..=10.0).contains(&f))
}

#[must_use]
pub fn validate_review(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.chars().count() <= MAX_REVIEW_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title() {
        assert!(validate_title(&json!("Avatar 2")));
        assert!(validate_title(&json!("Breaking Bad")));
        assert!(!validate_title(&json!("A!")));
        assert!(!validate_title(&json!("   ")));
        assert!(!validate_title(&json!("")));
        assert!(!validate_title(&json!(42)));
    }

    #[test]
    fn test_platform_and_genre_are_letters_only() {
        assert!(validate_platform(&json!("Netflix")));
        assert!(!validate_platform(&json!("Disney+")));
        assert!(!validate_platform(&json!("Prime Video")));
        assert!(validate_genre(&json!("Drama")));
        assert!(!validate_genre(&json!("Sci-Fi")));
        assert!(!validate_genre(&json!("Action2")));
    }

    #[test]
    fn test_positive_integers() {
        for n in [1_u32, 9, 10, 42, 999, 999_999] {
            assert!(validate_duration(&json!(n)), "{n} should pass");
            assert!(validate_duration(&json!(n.to_string())), "\"{n}\" should pass");
            assert!(validate_season_number(&json!(n)));
            assert!(validate_episode_number(&json!(n)));
            assert!(validate_year(&json!(n)));
        }

        for bad in [json!("0"), json!("-1"), json!("01"), json!(""), json!(0), json!(-1)] {
            assert!(!validate_duration(&bad), "{bad} should fail");
            assert!(!validate_year(&bad), "{bad} should fail");
        }
    }

    #[test]
    fn test_positive_integer_uses_decimal_form() {
        assert!(validate_season_number(&json!(5.0)));
        assert!(!validate_season_number(&json!(5.9)));
        assert!(!validate_season_number(&json!(true)));

        // Exponent form from 1e21 upwards.
        assert!(validate_year(&json!(1e20)));
        assert!(!validate_year(&json!(1e21)));
        assert!(!validate_duration(&json!(2.5e22)));
    }

    #[test]
    fn test_status() {
        for s in SERIE_STATUSES {
            assert!(validate_status(&json!(s)));
        }
        assert!(!validate_status(&json!("ongoing")));
        assert!(!validate_status(&json!("Cancelled")));
    }

    #[test]
    fn test_rating() {
        for ok in ["0", "0.0", "5", "7.5", "9.9", "10", "10.0"] {
            assert!(validate_rating(&json!(ok)), "{ok} should pass");
        }
        assert!(validate_rating(&json!(8.5)));
        assert!(validate_rating(&json!(10)));

        for bad in ["10.1", "-1", "11", "7.25", "", "abc"] {
            assert!(!validate_rating(&json!(bad)), "{bad} should fail");
        }
        assert!(!validate_rating(&json!(11)));
    }

    #[test]
    fn test_release_date() {
        assert_eq!(
            parse_release_date(&json!("2023-05-10")),
            NaiveDate::from_ymd_opt(2023, 5, 10)
        );
        assert!(validate_release_date(&json!("2023-05-10T12:00:00Z")));
        assert!(validate_release_date(&json!("2023-05-10T12:00:00")));
        assert!(validate_release_date(&json!("2023/05/10")));
        assert!(validate_release_date(&json!(1_683_676_800_000_i64)));
        assert!(!validate_release_date(&json!("2023-02-30")));
        assert!(!validate_release_date(&json!("not a date")));
        assert!(!validate_release_date(&json!(null)));
    }

    #[test]
    fn test_account_fields() {
        assert!(validate_email(&json!("jane@example.com")));
        assert!(!validate_email(&json!("jane@example")));
        assert!(!validate_email(&json!("jane doe@example.com")));

        assert!(validate_username(&json!("jane.doe_99")));
        assert!(!validate_username(&json!("jd")));
        assert!(!validate_username(&json!("a".repeat(31))));
        assert!(!validate_username(&json!("jane doe")));

        assert!(validate_password(&json!("hunter22")));
        assert!(!validate_password(&json!("short")));
    }

    #[test]
    fn test_score_and_review() {
        assert!(validate_score(&json!(0)));
        assert!(validate_score(&json!(7.25)));
        assert!(validate_score(&json!(10)));
        assert!(!validate_score(&json!(10.5)));
        assert!(!validate_score(&json!("8")));

        assert!(validate_review(&json!("Great pacing")));
        assert!(!validate_review(&json!("x".repeat(MAX_REVIEW_CHARS + 1))));
    }
}
