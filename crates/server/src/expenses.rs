//! Personal expenses and the owner's expense list.

use api_types::{
    ApiResponse,
    expense::{ExpenseNew, ExpenseTarget, ExpenseUpdate, SplitShare},
};
use axum::{Extension, Json, extract::State};
use engine::{Amount, Expense, ExpenseList, NewExpense};
use uuid::Uuid;

use crate::{
    ServerError,
    extract::JsonBody,
    server::{AuthUser, ServerState},
};

pub(crate) fn to_shares(splits: Vec<SplitShare>) -> Vec<engine::SplitShare> {
    splits
        .into_iter()
        .map(|share| engine::SplitShare {
            participant: share.user_id,
            amount: Amount::new(share.amount_minor),
            description: share.description,
        })
        .collect()
}

pub(crate) fn to_new_expense(user_id: Uuid, payload: ExpenseNew) -> NewExpense {
    NewExpense {
        user_id,
        amount: Amount::new(payload.amount_minor),
        description: payload.description,
        category: payload.category,
        splits: to_shares(payload.splits),
    }
}

pub(crate) fn to_expense_update(user_id: Uuid, payload: ExpenseUpdate) -> engine::ExpenseUpdate {
    engine::ExpenseUpdate {
        expense_id: payload.expense_id,
        user_id,
        amount: payload.amount_minor.map(Amount::new),
        description: payload.description,
        category: payload.category,
        splits: payload.splits.map(to_shares),
    }
}

pub async fn create(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<ExpenseNew>,
) -> Result<Json<ApiResponse<Expense>>, ServerError> {
    if !payload.splits.is_empty() {
        return Err(ServerError::Generic(
            "use /splitExpense/create for shared expenses".to_string(),
        ));
    }
    let expense = state
        .engine
        .create_personal_expense(to_new_expense(user.id, payload))
        .await?;
    Ok(Json(ApiResponse::ok("Expense created successfully!", expense)))
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
    Ok(Json(ApiResponse::ok("Expense updated successfully!", expense)))
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
    Ok(Json(ApiResponse::done("Expense deleted successfully!")))
}

pub async fn list(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<ExpenseList>>, ServerError> {
    let expenses = state.engine.list_expenses(user.id).await?;
    Ok(Json(ApiResponse::ok(
        "Expenses retrieved successfully!",
        expenses,
    )))
}
