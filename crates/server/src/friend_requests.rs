use api_types::{
    ApiResponse,
    friend_request::{
        FriendRequestAccept, FriendRequestSend, FriendRequestTarget, FriendshipCreated,
    },
};
use axum::{Extension, Json, extract::State};
use engine::{FriendRequest, FriendRequests};

use crate::{
    ServerError,
    extract::JsonBody,
    server::{AuthUser, ServerState},
};

pub async fn send(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<FriendRequestSend>,
) -> Result<Json<ApiResponse<FriendRequest>>, ServerError> {
    let request = state
        .engine
        .send_friend_request(user.id, payload.receiver_id)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Friend request sent successfully!",
        request,
    )))
}

pub async fn accept(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<FriendRequestAccept>,
) -> Result<Json<ApiResponse<FriendshipCreated>>, ServerError> {
    let friendship_id = state
        .engine
        .accept_friend_request(user.id, payload.sender_id)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Friend request accepted successfully!",
        FriendshipCreated { friendship_id },
    )))
}

pub async fn list(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<FriendRequests>>, ServerError> {
    let requests = state.engine.list_friend_requests(user.id).await?;
    Ok(Json(ApiResponse::ok(
        "Friend requests retrieved successfully!",
        requests,
    )))
}

pub async fn reject(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<FriendRequestTarget>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .reject_friend_request(user.id, payload.friend_request_id)
        .await?;
    Ok(Json(ApiResponse::done("Friend request rejected successfully!")))
}

pub async fn remove(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<FriendRequestTarget>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .remove_friend_request(user.id, payload.friend_request_id)
        .await?;
    Ok(Json(ApiResponse::done("Friend request removed successfully!")))
}
