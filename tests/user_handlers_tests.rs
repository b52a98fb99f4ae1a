use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use user_records::{app, test_utils::test_helpers, AppState};

async fn setup_app() -> anyhow::Result<(Router, sqlx::SqlitePool)> {
    let pool = test_helpers::create_test_db().await?;
    let router = app(AppState::from_pool(pool.clone()));
    Ok((router, pool))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes)?
    };
    Ok((status, body))
}

async fn create(router: &Router, full_name: &str, email: &str, password: &str) -> StatusCode {
    let request = json_request(
        Method::POST,
        "/user/create",
        json!({ "fullName": full_name, "email": email, "password": password }),
    );
    send(router, request).await.unwrap().0
}

async fn list(router: &Router) -> Vec<Value> {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/user/getAll")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(router, request).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    body.as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_create_user_returns_created() -> anyhow::Result<()> {
    let (router, _pool) = setup_app().await?;

    let request = json_request(
        Method::POST,
        "/user/create",
        json!({ "fullName": "Ada Lovelace", "email": "ada@example.com", "password": "goodPass1" }),
    );
    let (status, body) = send(&router, request).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    Ok(())
}

#[tokio::test]
async fn test_create_user_missing_field_is_bad_request() -> anyhow::Result<()> {
    let (router, pool) = setup_app().await?;

    let request = json_request(
        Method::POST,
        "/user/create",
        json!({ "email": "ada@example.com", "password": "goodPass1" }),
    );
    let (status, body) = send(&router, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide full name, email, and password");
    assert_eq!(test_helpers::count_users(&pool).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_create_user_rejects_bad_email_and_weak_password() -> anyhow::Result<()> {
    let (router, pool) = setup_app().await?;

    let request = json_request(
        Method::POST,
        "/user/create",
        json!({ "fullName": "Bad Email", "email": "not-an-email", "password": "goodPass1" }),
    );
    let (status, body) = send(&router, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");

    let request = json_request(
        Method::POST,
        "/user/create",
        json!({ "fullName": "Weak", "email": "a@b.co", "password": "short1" }),
    );
    let (status, body) = send(&router, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Password must be at least 8 characters long and contain at least one letter and one number"
    );

    assert_eq!(test_helpers::count_users(&pool).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_create_user_duplicate_email_is_conflict() -> anyhow::Result<()> {
    let (router, _pool) = setup_app().await?;

    assert_eq!(
        create(&router, "First", "dup@example.com", "goodPass1").await,
        StatusCode::CREATED
    );
    assert_eq!(
        create(&router, "Second", "dup@example.com", "goodPass2").await,
        StatusCode::CONFLICT
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() -> anyhow::Result<()> {
    let (router, _pool) = setup_app().await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let (status, body) = send(&router, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_delete_without_body_or_content_type_is_bad_request() -> anyhow::Result<()> {
    let (router, pool) = setup_app().await?;
    create(&router, "Ada Lovelace", "ada@example.com", "goodPass1").await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/user/delete")
        .body(Body::empty())?;
    let (status, body) = send(&router, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    assert_eq!(body["message"], "Please provide email for user deletion");
    assert_eq!(test_helpers::count_users(&pool).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_create_without_json_content_type_reports_missing_fields() -> anyhow::Result<()> {
    let (router, pool) = setup_app().await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/create")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(
            json!({ "fullName": "Ada", "email": "ada@example.com", "password": "goodPass1" })
                .to_string(),
        ))?;
    let (status, body) = send(&router, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide full name, email, and password");
    assert_eq!(test_helpers::count_users(&pool).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_list_users_never_returns_password() -> anyhow::Result<()> {
    let (router, _pool) = setup_app().await?;

    create(&router, "Ada Lovelace", "ada@example.com", "goodPass1").await;
    create(&router, "Alan Turing", "alan@example.com", "goodPass2").await;

    let users = list(&router).await;
    assert_eq!(users.len(), 2);
    assert_eq!(
        users[0],
        json!({ "fullName": "Ada Lovelace", "email": "ada@example.com" })
    );
    for user in &users {
        let object = user.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("passwordHash"));
    }
    Ok(())
}

#[tokio::test]
async fn test_delete_user_flow() -> anyhow::Result<()> {
    let (router, _pool) = setup_app().await?;

    create(&router, "Ada Lovelace", "ada@example.com", "goodPass1").await;
    create(&router, "Alan Turing", "alan@example.com", "goodPass2").await;

    let request = json_request(
        Method::DELETE,
        "/user/delete",
        json!({ "email": "ada@example.com" }),
    );
    let (status, body) = send(&router, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let users = list(&router).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "alan@example.com");

    let request = json_request(
        Method::DELETE,
        "/user/delete",
        json!({ "email": "ada@example.com" }),
    );
    let (status, body) = send(&router, request).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
    Ok(())
}

#[tokio::test]
async fn test_delete_user_requires_email() -> anyhow::Result<()> {
    let (router, _pool) = setup_app().await?;

    let request = json_request(Method::DELETE, "/user/delete", json!({}));
    let (status, body) = send(&router, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide email for user deletion");
    Ok(())
}

#[tokio::test]
async fn test_edit_user_flow() -> anyhow::Result<()> {
    let (router, pool) = setup_app().await?;

    create(&router, "Ada Lovelace", "ada@example.com", "goodPass1").await;
    let before: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE email = ?")
        .bind("ada@example.com")
        .fetch_one(&pool)
        .await?;

    let request = json_request(
        Method::PUT,
        "/user/edit",
        json!({ "email": "ada@example.com", "fullName": "Ada King" }),
    );
    let (status, body) = send(&router, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User details updated successfully");

    let after: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE email = ?")
        .bind("ada@example.com")
        .fetch_one(&pool)
        .await?;
    assert_eq!(before, after);

    let users = list(&router).await;
    assert_eq!(users[0]["fullName"], "Ada King");
    Ok(())
}

#[tokio::test]
async fn test_edit_user_errors() -> anyhow::Result<()> {
    let (router, _pool) = setup_app().await?;

    let request = json_request(Method::PUT, "/user/edit", json!({ "fullName": "No Email" }));
    let (status, body) = send(&router, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide email for user update");

    let request = json_request(
        Method::PUT,
        "/user/edit",
        json!({ "email": "ghost@example.com", "fullName": "Ghost" }),
    );
    let (status, _) = send(&router, request).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    create(&router, "Ada Lovelace", "ada@example.com", "goodPass1").await;
    let request = json_request(
        Method::PUT,
        "/user/edit",
        json!({ "email": "ada@example.com", "password": "short1" }),
    );
    let (status, _) = send(&router, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_store_failure_is_internal_error() -> anyhow::Result<()> {
    let (router, pool) = setup_app().await?;
    pool.close().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/user/getAll")
        .body(Body::empty())?;
    let (status, body) = send(&router, request).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
    Ok(())
}
