//! User registration, login and profile endpoints.

use api_types::{
    ApiResponse,
    user::{AvatarUpdate, UserLogin, UserRegister, UserUpdate},
};
use axum::{Extension, Json, extract::State};
use engine::{NewUser, User};

use crate::{
    ServerError,
    extract::JsonBody,
    server::{AuthUser, ServerState},
};

pub async fn register(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<UserRegister>,
) -> Result<Json<ApiResponse<User>>, ServerError> {
    let mut cmd = NewUser::new(payload.name, payload.email, payload.password);
    if let Some(avatar) = payload.avatar {
        cmd = cmd.avatar(avatar);
    }
    let user = state.engine.register_user(cmd).await?;
    Ok(Json(ApiResponse::ok("User registered successfully!", user)))
}

/// Check credentials and echo the profile; later calls use Basic auth.
pub async fn login(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<UserLogin>,
) -> Result<Json<ApiResponse<User>>, ServerError> {
    let user = state
        .engine
        .authenticate(&payload.email, &payload.password)
        .await?;
    Ok(Json(ApiResponse::ok("User logged in successfully!", user)))
}

pub async fn info(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<User>>, ServerError> {
    let user = state.engine.user_info(user.id).await?;
    Ok(Json(ApiResponse::ok("User info retrieved successfully!", user)))
}

pub async fn list(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<User>>>, ServerError> {
    let users = state.engine.list_users(user.id).await?;
    Ok(Json(ApiResponse::ok("Users retrieved successfully!", users)))
}

pub async fn update(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<UserUpdate>,
) -> Result<Json<ApiResponse<User>>, ServerError> {
    let update = engine::UserUpdate {
        name: payload.name,
        email: payload.email,
        password: payload.password,
    };
    let user = state.engine.update_user(user.id, update).await?;
    Ok(Json(ApiResponse::ok("User updated successfully!", user)))
}

pub async fn update_avatar(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<AvatarUpdate>,
) -> Result<Json<ApiResponse<User>>, ServerError> {
    let user = state.engine.update_avatar(user.id, &payload.avatar).await?;
    Ok(Json(ApiResponse::ok("Avatar updated successfully!", user)))
}
