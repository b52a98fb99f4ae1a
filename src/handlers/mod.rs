pub mod user_handlers;

pub use user_handlers::{
    create_user_handler, delete_user_handler, list_users_handler, update_user_handler,
};
