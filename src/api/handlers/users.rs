//! User lookup and subscription tier

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::handlers::model_label;
use crate::error::{AppError, Result};
use crate::prompt::fields::filled_text;
use crate::AppState;

const DEFAULT_USER: &str = "default";

fn require_user_id(user_id: &Option<String>) -> Result<&str> {
    filled_text(user_id).ok_or_else(|| AppError::InvalidRequest("user_id is required".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UserStatusQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct UserStatusResponse {
    success: bool,
    user_id: String,
    is_paid: bool,
    email: Option<String>,
    model: &'static str,
}

/// GET /api/user-status
pub async fn user_status(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserStatusQuery>,
) -> Result<Json<UserStatusResponse>> {
    let user_id = filled_text(&query.user_id).unwrap_or(DEFAULT_USER);
    let user = state.users.get_or_create(user_id).await?;

    Ok(Json(UserStatusResponse {
        success: true,
        model: model_label(user.is_paid),
        user_id: user.user_id,
        is_paid: user.is_paid,
        email: user.email,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
}

#[derive(Serialize)]
pub struct UserChangeResponse {
    success: bool,
    message: String,
    user_id: String,
    is_paid: bool,
    model: &'static str,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserChangeResponse>)> {
    let user_id = require_user_id(&request.user_id)?;
    let email = filled_text(&request.email).map(str::to_string);
    let user = state.users.create(user_id, email, request.is_paid).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserChangeResponse {
            success: true,
            message: "User created successfully".to_string(),
            model: model_label(user.is_paid),
            is_paid: user.is_paid,
            user_id: user.user_id,
        }),
    ))
}

/// PUT /api/users/subscription
pub async fn update_subscription(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SubscriptionRequest>,
) -> Result<Json<UserChangeResponse>> {
    let user_id = require_user_id(&request.user_id)?;
    state.users.get_or_create(user_id).await?;
    let user = state.users.set_subscription(user_id, request.is_paid).await?;

    Ok(Json(UserChangeResponse {
        success: true,
        message: format!(
            "User subscription updated to {}",
            if user.is_paid { "paid" } else { "free" }
        ),
        model: model_label(user.is_paid),
        is_paid: user.is_paid,
        user_id: user.user_id,
    }))
}
