mod users;

pub use users::{cmd_list_users, cmd_promote_user, cmd_rotate_key};
