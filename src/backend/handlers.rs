//! Request handlers for the development backend.
//!
//! Every error body is `{"message": "..."}`, the shape the client reads.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::auth::Role;
use crate::backend::state::{Account, AccountError, BackendState, StoredFile};
use crate::forms::is_valid_email;

/// Error response with a JSON `message`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let status = match err {
            AccountError::AlreadyExists => StatusCode::CONFLICT,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::NotFound => StatusCode::NOT_FOUND,
        };
        Self::new(status, err.to_string())
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn parse_role(raw: &str) -> ApiResult<Role> {
    raw.parse().map_err(|_| ApiError::bad_request("Invalid role"))
}

/// Account behind the bearer token, which must hold `role`.
fn authorize(state: &BackendState, headers: &HeaderMap, role: Role) -> ApiResult<Account> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
    let account = state
        .authenticate(token)
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;
    if account.role != role {
        return Err(ApiError::new(StatusCode::FORBIDDEN, "Access denied for this role"));
    }
    Ok(account)
}

pub async fn register(
    State(state): State<BackendState>,
    Path(role): Path<String>,
    Json(body): Json<Credentials>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let role = parse_role(&role)?;
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }
    if !is_valid_email(&body.email) {
        return Err(ApiError::bad_request("Please enter a valid email address"));
    }
    if body.password.chars().count() < 8 {
        return Err(ApiError::bad_request("Password must be at least 8 characters long"));
    }

    let account = state.register(role, &body.email, &body.password)?;
    tracing::info!(role = %role, user_id = %account.id, "Account registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "user": account.to_json() })),
    ))
}

pub async fn login(
    State(state): State<BackendState>,
    Path(role): Path<String>,
    Json(body): Json<Credentials>,
) -> ApiResult<Json<Value>> {
    let role = parse_role(&role)?;
    let (token, account) = state.login(role, &body.email, &body.password)?;
    tracing::info!(role = %role, user_id = %account.id, "Login");
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": account.to_json(),
    })))
}

pub async fn get_profile(
    State(state): State<BackendState>,
    Path(role): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let account = authorize(&state, &headers, parse_role(&role)?)?;
    Ok(Json(json!({ "user": account.to_json() })))
}

pub async fn update_profile(
    State(state): State<BackendState>,
    Path(role): Path<String>,
    headers: HeaderMap,
    Json(fields): Json<Map<String, Value>>,
) -> ApiResult<Json<Value>> {
    let account = authorize(&state, &headers, parse_role(&role)?)?;
    let updated = state.update_profile(&account.id, fields)?;
    tracing::info!(user_id = %updated.id, "Profile updated");
    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": updated.to_json(),
    })))
}

pub async fn upload_profile_picture(
    State(state): State<BackendState>,
    Path(role): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let account = authorize(&state, &headers, parse_role(&role)?)?;
    let (file_name, file) = read_file_field(multipart, "profilePicture").await?;
    if !file.content_type.starts_with("image/") {
        return Err(ApiError::bad_request("Please upload an image file"));
    }

    let url = state.store_file(file_name.as_deref(), file);
    let mut fields = Map::new();
    fields.insert("profilePicture".to_string(), Value::String(url.clone()));
    state.update_profile(&account.id, fields)?;

    tracing::info!(user_id = %account.id, url = %url, "Profile picture stored");
    Ok(Json(json!({
        "message": "Profile picture uploaded successfully",
        "profilePictureUrl": url,
    })))
}

/// Generic file upload used by bulk uploads.
pub async fn upload_file(
    State(state): State<BackendState>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let (file_name, file) = read_file_field(multipart, "file").await?;
    let url = state.store_file(file_name.as_deref(), file);
    Ok(Json(json!({ "url": url })))
}

pub async fn serve_file(
    State(state): State<BackendState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let file = state
        .file(&name)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "File not found"))?;
    Ok(([(header::CONTENT_TYPE, file.content_type)], file.bytes).into_response())
}

async fn read_file_field(
    mut multipart: Multipart,
    name: &str,
) -> ApiResult<(Option<String>, StoredFile)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(name) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        return Ok((
            file_name,
            StoredFile {
                content_type,
                bytes: bytes.to_vec(),
            },
        ));
    }
    Err(ApiError::bad_request(format!("Missing '{name}' file field")))
}
