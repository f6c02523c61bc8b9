use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::UserDto;
use crate::app::AppState;
use crate::database::models::{NewUser, UserChanges};
use crate::error::ApiError;
use crate::handlers::{parse_id, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn check_name(errors: &mut FieldErrors, name: &str) {
    if name.is_empty() {
        errors.add("name", "Name is required");
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !email.contains('@') {
        errors.add("email", "Email must contain '@'");
    }
}

/// Accounts can only be changed by their own session
fn ensure_self(session: &SessionUser, id: Uuid) -> Result<(), ApiError> {
    if session.user_id == id {
        Ok(())
    } else {
        Err(ApiError::forbidden("Users can only modify their own account"))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl CreateUserRequest {
    fn validate(self) -> Result<NewUser, ApiError> {
        let name = self.name.trim().to_string();
        let email = normalize_email(&self.email);

        let mut errors = FieldErrors::default();
        check_name(&mut errors, &name);
        check_email(&mut errors, &email);
        errors.finish("Invalid user")?;

        Ok(NewUser { name, email })
    }
}

impl UpdateUserRequest {
    fn validate(self) -> Result<UserChanges, ApiError> {
        let name = self.name.map(|n| n.trim().to_string());
        let email = self.email.as_deref().map(normalize_email);

        let mut errors = FieldErrors::default();
        if let Some(name) = &name {
            check_name(&mut errors, name);
        }
        if let Some(email) = &email {
            check_email(&mut errors, email);
        }
        errors.finish("Invalid user")?;

        Ok(UserChanges { name, email })
    }
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserDto>> {
    let users = state.store.list_users().await?;
    Ok(ApiResponse::success(users.into_iter().map(UserDto::from).collect()))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<UserDto> {
    let Json(request) = payload?;
    let user = state.store.create_user(request.validate()?).await?;
    tracing::info!("Created user {}", user.id);
    Ok(ApiResponse::created(user.into()))
}

/// GET /api/users/me - the user behind the current session
pub async fn current_user(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> ApiResult<UserDto> {
    let user = state
        .store
        .get_user(session.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Session user not found"))?;
    Ok(ApiResponse::success(user.into()))
}

/// GET /api/users/:id
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserDto> {
    let id = parse_id(&id)?;
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user.into()))
}

/// PUT /api/users/:id - partial update of the session user's own record
pub async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<UserDto> {
    let id = parse_id(&id)?;
    ensure_self(&session, id)?;
    let Json(request) = payload?;
    let user = state
        .store
        .update_user(id, request.validate()?)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user.into()))
}

/// DELETE /api/users/:id - own account only, also removes the user's assets
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    ensure_self(&session, id)?;
    if !state.store.delete_user(id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!("Deleted user {}", id);
    Ok(ApiResponse::no_content())
}
