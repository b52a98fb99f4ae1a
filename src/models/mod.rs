pub mod user;

pub use user::{
    CreateUserPayload, DeleteUserPayload, UpdateUserPayload, User, UserChanges, UserSummary,
};
