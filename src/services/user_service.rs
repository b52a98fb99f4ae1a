use crate::models::user::{
    CreateUserPayload, DeleteUserPayload, UpdateUserPayload, User, UserChanges, UserSummary,
};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::services::validation::{is_strong_password, is_valid_email, non_blank};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("{0}")]
    MissingFields(&'static str),
    #[error("Invalid email format")]
    InvalidEmail,
    #[error(
        "Password must be at least 8 characters long and contain at least one letter and one number"
    )]
    WeakPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, request: CreateUserPayload) -> Result<User, UserServiceError> {
        let (full_name, email, password) = match (
            non_blank(request.full_name),
            non_blank(request.email),
            non_blank(request.password),
        ) {
            (Some(full_name), Some(email), Some(password)) => (full_name, email, password),
            _ => {
                return Err(UserServiceError::MissingFields(
                    "Please provide full name, email, and password",
                ))
            }
        };

        if !is_valid_email(&email) {
            return Err(UserServiceError::InvalidEmail);
        }
        if !is_strong_password(&password) {
            return Err(UserServiceError::WeakPassword);
        }

        let password_hash = hash_password(password).await?;

        match self
            .repository
            .create_user(&full_name, &email, &password_hash)
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = user.id, "user created");
                Ok(user)
            }
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, UserServiceError> {
        Ok(self.repository.list_users().await?)
    }

    pub async fn delete_user(&self, request: DeleteUserPayload) -> Result<(), UserServiceError> {
        let email = non_blank(request.email).ok_or(UserServiceError::MissingFields(
            "Please provide email for user deletion",
        ))?;

        match self.repository.delete_by_email(&email).await {
            Ok(()) => {
                tracing::info!("user deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    /// Overwrites only the fields present in the request. A supplied password
    /// must pass the same strength rule as on creation.
    pub async fn update_user(&self, request: UpdateUserPayload) -> Result<(), UserServiceError> {
        let email = non_blank(request.email).ok_or(UserServiceError::MissingFields(
            "Please provide email for user update",
        ))?;

        let password_hash = match non_blank(request.password) {
            Some(password) => {
                if !is_strong_password(&password) {
                    return Err(UserServiceError::WeakPassword);
                }
                Some(hash_password(password).await?)
            }
            None => None,
        };

        let changes = UserChanges {
            full_name: non_blank(request.full_name),
            password_hash,
        };

        if changes.is_empty() {
            tracing::debug!("update request carries no changes");
        }

        match self.repository.update_user(&email, changes).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }
}

/// Hashes on the blocking thread pool; Argon2 holds the CPU for tens of
/// milliseconds.
async fn hash_password(password: String) -> Result<String, UserServiceError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| UserServiceError::HashingError(e.to_string()))?
}
