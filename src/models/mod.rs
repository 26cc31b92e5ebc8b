pub mod episode;
pub mod media;
pub mod rating;
pub mod user;
