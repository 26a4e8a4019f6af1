use api_types::{ApiResponse, friend::FriendQuery};
use axum::{Extension, Json, extract::State};
use engine::{Friend, FriendBalance, FriendExpense};

use crate::{
    ServerError,
    extract::QueryParams,
    server::{AuthUser, ServerState},
};

pub async fn list(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<Friend>>>, ServerError> {
    let friends = state.engine.list_friends(user.id).await?;
    Ok(Json(ApiResponse::ok(
        "Friend list retrieved successfully!",
        friends,
    )))
}

/// Ledger rows shared with one friend.
pub async fn individual(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<FriendQuery>,
) -> Result<Json<ApiResponse<Vec<FriendExpense>>>, ServerError> {
    let expenses = state
        .engine
        .friend_expenses(user.id, query.friend_id)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Friend expenses retrieved successfully!",
        expenses,
    )))
}

pub async fn balance(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<FriendQuery>,
) -> Result<Json<ApiResponse<FriendBalance>>, ServerError> {
    let balance = state
        .engine
        .friend_balance(user.id, query.friend_id)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Friend balance retrieved successfully!",
        balance,
    )))
}
