//! Whole-payload checks built from the field rules.
//!
//! Each validator walks every rule and reports all violations in one pass.

use serde_json::Value;

use super::fields;
use super::payload::{Payload, as_int, present, provided};
use super::report::{ErrorCollector, FieldCheck, ValidationReport};

pub const TITLE_PATTERN_ERROR: &str = "Title must contain only letters, numbers, and spaces";

fn check_required(
    errors: &mut ErrorCollector,
    payload: &Payload,
    key: &str,
    missing: &str,
    rule: fn(&Value) -> bool,
    malformed: &str,
) {
    match present(payload, key) {
        None => errors.push(missing),
        Some(value) if !rule(value) => errors.push(malformed),
        Some(_) => {}
    }
}

fn check_optional(
    errors: &mut ErrorCollector,
    payload: &Payload,
    key: &str,
    rule: fn(&Value) -> bool,
    malformed: &str,
) {
    if provided(payload, key).is_some_and(|value| !rule(value)) {
        errors.push(malformed);
    }
}

#[must_use]
pub fn validate_media_data(payload: &Payload) -> ValidationReport {
    let mut errors = ErrorCollector::default();

    let kind = present(payload, "type");
    match kind {
        None => errors.push("Type is required"),
        Some(Value::String(s)) if s == "Film" || s == "Serie" => {}
        Some(_) => errors.push("Invalid type"),
    }
    let kind = kind.and_then(Value::as_str);

    check_required(
        &mut errors,
        payload,
        "title",
        "Title is required",
        fields::validate_title,
        TITLE_PATTERN_ERROR,
    );
    check_required(
        &mut errors,
        payload,
        "platform",
        "Platform is required",
        fields::validate_platform,
        "Invalid platform",
    );

    match kind {
        Some("Film") => check_optional(
            &mut errors,
            payload,
            "duration",
            fields::validate_duration,
            "Duration must be a positive number",
        ),
        Some("Serie") => check_optional(
            &mut errors,
            payload,
            "status",
            fields::validate_status,
            "Status must be one of: Ongoing, Finished, On_hold",
        ),
        _ => {}
    }

    check_optional(
        &mut errors,
        payload,
        "year",
        fields::validate_year,
        "Year must be a positive number",
    );
    check_optional(
        &mut errors,
        payload,
        "genre",
        fields::validate_genre,
        "Genre must be a string",
    );
    check_optional(
        &mut errors,
        payload,
        "rating",
        fields::validate_rating,
        "Rating must be a number between 0 and 10",
    );

    errors.finish()
}

#[must_use]
pub fn validate_season_data(payload: &Payload) -> ValidationReport {
    let mut errors = ErrorCollector::default();

    check_required(
        &mut errors,
        payload,
        "seasonNumber",
        "Season number is required",
        fields::validate_season_number,
        "Season number must be a positive integer",
    );
    check_required(
        &mut errors,
        payload,
        "releaseDate",
        "Release date is required",
        fields::validate_release_date,
        "Release date must be a valid date",
    );

    errors.finish()
}

#[must_use]
pub fn validate_episode_data(payload: &Payload) -> ValidationReport {
    let mut errors = ErrorCollector::default();

    check_required(
        &mut errors,
        payload,
        "title",
        "Title is required",
        fields::validate_title,
        TITLE_PATTERN_ERROR,
    );
    check_required(
        &mut errors,
        payload,
        "episodeNumber",
        "Episode number is required",
        fields::validate_episode_number,
        "Episode number must be a positive integer",
    );
    check_required(
        &mut errors,
        payload,
        "duration",
        "Duration is required",
        fields::validate_duration,
        "Duration must be a positive integer",
    );

    errors.finish()
}

/// Re-validates one field of a partial update.
///
/// Unrecognised names fail with `Unknown field` so stray keys are never
/// silently written.
#[must_use]
pub fn validate_field(name: &str, value: &Value) -> FieldCheck {
    let rule: fn(&Value) -> bool = match name {
        "title" => fields::validate_title,
        "platform" => fields::validate_platform,
        "duration" => fields::validate_duration,
        "status" => fields::validate_status,
        "year" => fields::validate_year,
        "genre" => fields::validate_genre,
        "rating" => fields::validate_rating,
        _ => return FieldCheck::invalid("Unknown field"),
    };

    if rule(value) {
        FieldCheck::valid()
    } else {
        FieldCheck::invalid(format!("Invalid {name}"))
    }
}

#[must_use]
pub fn validate_registration(payload: &Payload) -> ValidationReport {
    let mut errors = ErrorCollector::default();

    check_required(
        &mut errors,
        payload,
        "email",
        "Email is required",
        fields::validate_email,
        "Email must be a valid email address",
    );
    check_required(
        &mut errors,
        payload,
        "username",
        "Username is required",
        fields::validate_username,
        "Username must be 3-30 characters of letters, numbers, dots, dashes or underscores",
    );
    check_required(
        &mut errors,
        payload,
        "password",
        "Password is required",
        fields::validate_password,
        "Password must be at least 8 characters long",
    );

    errors.finish()
}

/// Checks a partial profile change. Only fields that were sent are checked.
#[must_use]
pub fn validate_profile_update(payload: &Payload) -> ValidationReport {
    let mut errors = ErrorCollector::default();

    check_optional(
        &mut errors,
        payload,
        "email",
        fields::validate_email,
        "Email must be a valid email address",
    );
    check_optional(
        &mut errors,
        payload,
        "username",
        fields::validate_username,
        "Username must be 3-30 characters of letters, numbers, dots, dashes or underscores",
    );
    check_optional(
        &mut errors,
        payload,
        "password",
        fields::validate_password,
        "Password must be at least 8 characters long",
    );

    errors.finish()
}

#[must_use]
pub fn validate_login(payload: &Payload) -> ValidationReport {
    let mut errors = ErrorCollector::default();

    check_required(
        &mut errors,
        payload,
        "email",
        "Email is required",
        fields::validate_email,
        "Email must be a valid email address",
    );
    if !present(payload, "password").is_some_and(Value::is_string) {
        errors.push("Password is required");
    }

    errors.finish()
}

#[must_use]
pub fn validate_rating_data(payload: &Payload) -> ValidationReport {
    let mut errors = ErrorCollector::default();

    match present(payload, "target") {
        None => errors.push("Target is required"),
        Some(Value::String(s)) if s == "movie" || s == "episode" => {}
        Some(_) => errors.push("Target must be one of: movie, episode"),
    }

    check_required(
        &mut errors,
        payload,
        "targetId",
        "Target ID is required",
        |v| fields::validate_episode_number(v) && as_int(v).is_some(),
        "Target ID must be a positive integer",
    );

    match provided(payload, "score") {
        None => errors.push("Score is required"),
        Some(v) if !fields::validate_score(v) => {
            errors.push("Score must be a number between 0 and 10");
        }
        Some(_) => {}
    }

    check_optional(
        &mut errors,
        payload,
        "review",
        fields::validate_review,
        "Review must be a string of at most 2000 characters",
    );

    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_film() {
        let report = validate_media_data(&payload(json!({
            "type": "Film",
            "title": "Avatar 2",
            "platform": "Netflix",
            "duration": 192
        })));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_film_reports_every_violation() {
        let report = validate_media_data(&payload(json!({
            "type": "Film",
            "title": "A!",
            "platform": "Netflix",
            "duration": 0
        })));
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![
                TITLE_PATTERN_ERROR.to_string(),
                "Duration must be a positive number".to_string()
            ]
        );
    }

    #[test]
    fn test_empty_media_payload_names_required_fields() {
        let report = validate_media_data(&Payload::new());
        assert_eq!(
            report.errors,
            vec!["Type is required", "Title is required", "Platform is required"]
        );
    }

    #[test]
    fn test_invalid_type_still_checks_other_fields() {
        let report = validate_media_data(&payload(json!({
            "type": "Documentary",
            "title": "Planet Earth",
            "platform": "BBC",
            "year": -3
        })));
        assert_eq!(
            report.errors,
            vec!["Invalid type", "Year must be a positive number"]
        );
    }

    #[test]
    fn test_kind_specific_fields() {
        // status is ignored for films, duration for series
        let film = validate_media_data(&payload(json!({
            "type": "Film", "title": "Heat", "platform": "Netflix", "status": "Paused"
        })));
        assert!(film.is_valid);

        let serie = validate_media_data(&payload(json!({
            "type": "Serie", "title": "Dark", "platform": "Netflix",
            "status": "Paused", "duration": -1
        })));
        assert_eq!(
            serie.errors,
            vec!["Status must be one of: Ongoing, Finished, On_hold"]
        );
    }

    #[test]
    fn test_optional_fields() {
        let report = validate_media_data(&payload(json!({
            "type": "Serie", "title": "Dark", "platform": "Netflix",
            "genre": "Sci Fi", "rating": 10.5, "year": null
        })));
        assert_eq!(
            report.errors,
            vec![
                "Genre must be a string",
                "Rating must be a number between 0 and 10"
            ]
        );
    }

    #[test]
    fn test_media_validation_is_idempotent() {
        let data = payload(json!({ "type": "Film", "title": "", "platform": "Net flix" }));
        assert_eq!(validate_media_data(&data), validate_media_data(&data));
    }

    #[test]
    fn test_season_data() {
        assert!(validate_season_data(&payload(json!({
            "seasonNumber": 1, "releaseDate": "2020-01-01"
        })))
        .is_valid);

        let missing = validate_season_data(&Payload::new());
        assert_eq!(
            missing.errors,
            vec!["Season number is required", "Release date is required"]
        );

        let malformed = validate_season_data(&payload(json!({
            "seasonNumber": "01", "releaseDate": "yesterday"
        })));
        assert_eq!(
            malformed.errors,
            vec![
                "Season number must be a positive integer",
                "Release date must be a valid date"
            ]
        );
    }

    #[test]
    fn test_episode_data() {
        assert!(validate_episode_data(&payload(json!({
            "title": "Pilot", "episodeNumber": 1, "duration": 58
        })))
        .is_valid);

        let report = validate_episode_data(&payload(json!({
            "title": "Pilot?", "episodeNumber": -2
        })));
        assert_eq!(
            report.errors,
            vec![
                TITLE_PATTERN_ERROR,
                "Episode number must be a positive integer",
                "Duration is required"
            ]
        );
    }

    #[test]
    fn test_validate_field() {
        assert_eq!(validate_field("rating", &json!(11)), FieldCheck::invalid("Invalid rating"));
        assert_eq!(
            validate_field("bogusField", &json!("x")),
            FieldCheck::invalid("Unknown field")
        );
        assert_eq!(validate_field("year", &json!(1999)), FieldCheck::valid());
        assert_eq!(
            validate_field("platform", &json!("Prime Video")),
            FieldCheck::invalid("Invalid platform")
        );
        for name in [
            "title", "platform", "duration", "status", "year", "genre", "rating",
        ] {
            assert_ne!(
                validate_field(name, &json!(null)).error.as_deref(),
                Some("Unknown field")
            );
        }
    }

    #[test]
    fn test_registration() {
        assert!(validate_registration(&payload(json!({
            "email": "jane@example.com", "username": "jane", "password": "correct horse"
        })))
        .is_valid);

        let report = validate_registration(&payload(json!({
            "email": "jane", "password": "short"
        })));
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.errors[1], "Username is required");
    }

    #[test]
    fn test_profile_update_checks_only_sent_fields() {
        assert!(validate_profile_update(&payload(json!({}))).is_valid);
        assert!(validate_profile_update(&payload(json!({ "username": "new.name" }))).is_valid);

        let report = validate_profile_update(&payload(json!({
            "email": "nope",
            "password": "short",
        })));
        assert_eq!(
            report.errors,
            vec![
                "Email must be a valid email address",
                "Password must be at least 8 characters long",
            ]
        );
    }

    #[test]
    fn test_login() {
        assert!(validate_login(&payload(json!({
            "email": "jane@example.com", "password": "whatever"
        })))
        .is_valid);
        assert_eq!(
            validate_login(&Payload::new()).errors,
            vec!["Email is required", "Password is required"]
        );
    }

    #[test]
    fn test_rating_data() {
        assert!(validate_rating_data(&payload(json!({
            "target": "movie", "targetId": 3, "score": 0
        })))
        .is_valid);

        let report = validate_rating_data(&payload(json!({
            "target": "book", "targetId": "abc", "score": 12, "review": 5
        })));
        assert_eq!(
            report.errors,
            vec![
                "Target must be one of: movie, episode",
                "Target ID must be a positive integer",
                "Score must be a number between 0 and 10",
                "Review must be a string of at most 2000 characters"
            ]
        );

        assert_eq!(
            validate_rating_data(&Payload::new()).errors,
            vec!["Target is required", "Target ID is required", "Score is required"]
        );
    }
}
