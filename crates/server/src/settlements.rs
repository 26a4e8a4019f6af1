use api_types::{
    ApiResponse,
    settlement::{SettleRequestSend, SettleRequestTarget},
};
use axum::{Extension, Json, extract::State};
use engine::{SettleOutcome, SettleRequest, SettleRequests, SettleScope};

use crate::{
    ServerError,
    extract::JsonBody,
    server::{AuthUser, ServerState},
};

fn scope_from(payload: &SettleRequestSend) -> Result<SettleScope, ServerError> {
    match (payload.is_settle_all, payload.expense_id) {
        (true, _) => Ok(SettleScope::All),
        (false, Some(expense_id)) => Ok(SettleScope::Individual(expense_id)),
        (false, None) => Err(ServerError::Generic(
            "expense_id is required unless is_settle_all is set".to_string(),
        )),
    }
}

pub async fn send(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<SettleRequestSend>,
) -> Result<Json<ApiResponse<SettleRequest>>, ServerError> {
    let scope = scope_from(&payload)?;
    let request = state
        .engine
        .send_settle_request(user.id, payload.receiver_id, scope)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Settle expense request sent successfully!",
        request,
    )))
}

pub async fn accept(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<SettleRequestTarget>,
) -> Result<Json<ApiResponse<SettleOutcome>>, ServerError> {
    let outcome = state
        .engine
        .accept_settle_request(user.id, payload.settle_expense_request_id)
        .await?;
    Ok(Json(ApiResponse::ok("Expenses settled successfully!", outcome)))
}

pub async fn reject(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<SettleRequestTarget>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .reject_settle_request(user.id, payload.settle_expense_request_id)
        .await?;
    Ok(Json(ApiResponse::done(
        "Settle expense request rejected successfully!",
    )))
}

pub async fn remove(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<SettleRequestTarget>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .remove_settle_request(user.id, payload.settle_expense_request_id)
        .await?;
    Ok(Json(ApiResponse::done(
        "Settle expense request removed successfully!",
    )))
}

pub async fn list(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<SettleRequests>>, ServerError> {
    let requests = state.engine.list_settle_requests(user.id).await?;
    Ok(Json(ApiResponse::ok(
        "Settle expense requests retrieved successfully!",
        requests,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn payload(is_settle_all: bool, expense_id: Option<Uuid>) -> SettleRequestSend {
        SettleRequestSend {
            receiver_id: Uuid::new_v4(),
            is_settle_all,
            expense_id,
        }
    }

    #[test]
    fn settle_all_ignores_expense_id() {
        let scope = scope_from(&payload(true, Some(Uuid::new_v4()))).ok();
        assert_eq!(scope, Some(SettleScope::All));
    }

    #[test]
    fn individual_needs_expense_id() {
        let expense_id = Uuid::new_v4();
        let scope = scope_from(&payload(false, Some(expense_id))).ok();
        assert_eq!(scope, Some(SettleScope::Individual(expense_id)));
        assert!(scope_from(&payload(false, None)).is_err());
    }
}
