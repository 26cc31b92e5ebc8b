pub use super::episodes::Entity as Episodes;
pub use super::favorites::Entity as Favorites;
pub use super::media::Entity as Media;
pub use super::ratings::Entity as Ratings;
pub use super::seasons::Entity as Seasons;
pub use super::system_logs::Entity as SystemLogs;
pub use super::users::Entity as Users;
