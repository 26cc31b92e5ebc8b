//! Domain primitives shared by storage, services and the HTTP layer.
//!
//! Each enum stores as its wire spelling so the database, JSON bodies and
//! query strings all agree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseVariantError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseVariantError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// The two kinds of catalog entry.
///
/// A film carries a running time, a serie carries a status and owns seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Film,
    Serie,
}

string_enum!(MediaKind, "media type", { Film => "Film", Serie => "Serie" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerieStatus {
    Ongoing,
    Finished,
    #[serde(rename = "On_hold")]
    OnHold,
}

string_enum!(SerieStatus, "serie status", {
    Ongoing => "Ongoing",
    Finished => "Finished",
    OnHold => "On_hold",
});

/// What a rating points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTarget {
    Movie,
    Episode,
}

string_enum!(RatingTarget, "rating target", { Movie => "movie", Episode => "episode" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

string_enum!(Role, "role", { User => "user", Admin => "admin" });

impl Role {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spelling_round_trips() {
        assert_eq!("On_hold".parse::<SerieStatus>(), Ok(SerieStatus::OnHold));
        assert_eq!(SerieStatus::OnHold.to_string(), "On_hold");
        assert_eq!(
            serde_json::to_value(SerieStatus::OnHold).unwrap(),
            serde_json::json!("On_hold")
        );
        assert_eq!("episode".parse::<RatingTarget>(), Ok(RatingTarget::Episode));
        assert_eq!(
            serde_json::to_value(RatingTarget::Movie).unwrap(),
            serde_json::json!("movie")
        );
    }

    #[test]
    fn test_unknown_variant() {
        let err = "Documentary".parse::<MediaKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown media type: Documentary");
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role() {
        assert_eq!(Role::default(), Role::User);
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }
}
