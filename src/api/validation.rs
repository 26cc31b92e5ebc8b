use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::Deserialize;

use super::ApiError;
use crate::config::ApiConfig;
use crate::validation::Payload;

/// A JSON object body, kept untyped so the entity validators see exactly
/// what the client sent. Malformed bodies become a 400 in the usual envelope.
pub struct JsonBody(pub Payload);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Payload>::from_request(req, state).await?;
        Ok(Self(payload))
    }
}

pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request("Invalid id")),
    }
}

/// Optional query parameter. Empty means unset.
pub fn parse_param<T: std::str::FromStr>(
    name: &str,
    raw: Option<&str>,
) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Invalid {name}"))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Page number (from 1) and page size, clamped to the configured bounds.
    /// Unparseable values fall back to the defaults.
    ///
    /// The page is capped so that `(page - 1) * limit` always fits in an `i64`
    /// row offset.
    #[must_use]
    pub fn resolve(&self, api: &ApiConfig) -> (u64, u64) {
        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .map_or(api.default_page_size, |l| {
                l.clamp(1, i64::try_from(api.max_page_size).unwrap_or(i64::MAX))
                    .unsigned_abs()
            })
            .max(1);

        let last_page = i64::MAX.unsigned_abs() / limit;
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map_or(1, |p| p.max(1).unsigned_abs())
            .min(last_page);

        (page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaKind;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(parse_id("0").is_err());
        assert!(parse_id("-4").is_err());
        assert!(parse_id("abc").is_err());
    }

    #[test]
    fn test_page_defaults_and_clamping() {
        let api = ApiConfig::default();

        assert_eq!(query(None, None).resolve(&api), (1, 20));
        assert_eq!(query(Some("3"), Some("50")).resolve(&api), (3, 50));
        assert_eq!(query(Some("0"), Some("0")).resolve(&api), (1, 1));
        assert_eq!(query(Some("-2"), Some("1000")).resolve(&api), (1, 200));
        assert_eq!(query(Some("x"), Some("y")).resolve(&api), (1, 20));
    }

    #[test]
    fn test_page_offset_stays_in_range() {
        let api = ApiConfig::default();

        for (page, limit) in [
            (Some("9223372036854775807"), Some("200")),
            (Some("9223372036854775807"), None),
            (Some("9223372036854775807"), Some("1")),
            (Some("4611686018427387904"), Some("3")),
        ] {
            let (page, limit) = query(page, limit).resolve(&api);
            assert!(page >= 1);
            let offset = (page - 1).checked_mul(limit).expect("offset overflowed");
            assert!(i64::try_from(offset).is_ok());
        }

        // Too large for an i64 at all: falls back to the first page.
        let (page, _) = query(Some("99999999999999999999"), Some("10")).resolve(&api);
        assert_eq!(page, 1);
    }

    #[test]
    fn test_optional_params() {
        assert_eq!(parse_param::<i32>("year", Some("1999")).unwrap(), Some(1999));
        assert_eq!(parse_param::<i32>("year", Some("")).unwrap(), None);
        assert!(parse_param::<i32>("year", Some("soon")).is_err());

        let kind: Option<MediaKind> = parse_param("type", Some("Film")).unwrap();
        assert_eq!(kind, Some(MediaKind::Film));
        assert!(parse_param::<MediaKind>("type", Some("Book")).is_err());
    }
}
