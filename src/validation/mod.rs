//! Payload validation and catalog integrity rules.
//!
//! Validators never fail with `Err` for bad input. They return a
//! [`ValidationReport`] or [`FieldCheck`] value and leave the status code to
//! the caller. Only the integrity checks, which read stored data, can fail
//! with a lookup error.

pub mod entities;
pub mod fields;
pub mod integrity;
pub mod payload;
pub mod report;

pub use entities::{
    validate_episode_data, validate_field, validate_login, validate_media_data,
    validate_profile_update, validate_rating_data, validate_registration, validate_season_data,
};
pub use integrity::{
    CatalogLookup, IntegrityError, check_new_episode, check_new_rating, check_new_season,
};
pub use payload::Payload;
pub use report::{FieldCheck, ValidationReport};
