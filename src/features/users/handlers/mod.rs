pub mod user_handler;

pub use user_handler::{list_users, login_user, register_user};
