pub mod prelude;

pub mod episodes;
pub mod favorites;
pub mod media;
pub mod ratings;
pub mod seasons;
pub mod system_logs;
pub mod users;
