pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod rating_service;
pub mod rating_service_impl;
pub use rating_service::{RatingError, RatingService};
pub use rating_service_impl::SeaOrmRatingService;

pub mod logs;
pub use logs::{LogLevel, LogService};
