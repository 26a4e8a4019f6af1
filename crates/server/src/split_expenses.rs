//! Shared expenses; update and delete reuse the expense operations.

use api_types::{
    ApiResponse,
    expense::{ExpenseNew, ExpenseTarget, ExpenseUpdate},
};
use axum::{Extension, Json, extract::State};
use engine::Expense;

use crate::{
    ServerError,
    extract::JsonBody,
    expenses::{to_expense_update, to_new_expense},
    server::{AuthUser, ServerState},
};

pub async fn create(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<ExpenseNew>,
) -> Result<Json<ApiResponse<Expense>>, ServerError> {
    let expense = state
        .engine
        .create_split_expense(to_new_expense(user.id, payload))
        .await?;
    Ok(Json(ApiResponse::ok("Split expense created successfully!", expense)))
}

pub async fn update(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<ExpenseUpdate>,
) -> Result<Json<ApiResponse<Expense>>, ServerError> {
    let expense = state
        .engine
        .update_expense(to_expense_update(user.id, payload))
        .await?;
    Ok(Json(ApiResponse::ok(
        "Split expense updated successfully!",
        expense,
    )))
}

pub async fn delete(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<ExpenseTarget>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .delete_expense(user.id, payload.expense_id)
        .await?;
    Ok(Json(ApiResponse::done("Split expense deleted successfully!")))
}
