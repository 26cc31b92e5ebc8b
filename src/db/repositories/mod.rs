pub mod logs;
pub mod media;
pub mod rating;
pub mod season;
pub mod user;
