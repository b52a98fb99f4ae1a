use crate::error::AppError;
use crate::models::user::{CreateUserPayload, DeleteUserPayload, UpdateUserPayload, UserSummary};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// A request without a JSON content type carries no fields, so validation
/// answers with the endpoint's own missing-field message.
fn into_payload<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

pub async fn create_user_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateUserPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let payload = into_payload(payload)?;

    app_state.user_service.create_user(payload).await?;

    Ok((
        StatusCode::CREATED,
        MessageResponse::new("User created successfully"),
    )
        .into_response())
}

pub async fn delete_user_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<DeleteUserPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let payload = into_payload(payload)?;

    app_state.user_service.delete_user(payload).await?;

    Ok(MessageResponse::new("User deleted successfully"))
}

pub async fn list_users_handler(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = app_state.user_service.list_users().await?;
    Ok(Json(users))
}

pub async fn update_user_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<UpdateUserPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let payload = into_payload(payload)?;

    app_state.user_service.update_user(payload).await?;

    Ok(MessageResponse::new("User details updated successfully"))
}
