//! Expenses, personal or split.
//!
//! A split expense owns one ledger row per participant (see
//! [`split_expenses`](super::split_expenses)); a personal expense owns none
//! and is settled from the start.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, EngineError, ExpenseCategory};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_by: Uuid,
    pub amount: i64,
    pub description: String,
    pub category: String,
    pub is_personal: bool,
    pub is_settled: bool,
    pub total_splitted_amount: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::split_expenses::Entity")]
    SplitExpenses,
}

impl Related<super::split_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SplitExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub created_by: Uuid,
    pub amount: Amount,
    pub description: String,
    pub category: ExpenseCategory,
    pub is_personal: bool,
    pub is_settled: bool,
    pub total_splitted_amount: Option<Amount>,
    /// Users this expense is split with, in ledger order.
    pub participants: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub(crate) fn from_model(model: Model, participants: Vec<Uuid>) -> Result<Self, EngineError> {
        Ok(Self {
            id: model.id,
            created_by: model.created_by,
            amount: Amount::new(model.amount),
            description: model.description,
            category: ExpenseCategory::try_from(model.category.as_str())?,
            is_personal: model.is_personal,
            is_settled: model.is_settled,
            total_splitted_amount: model.total_splitted_amount.map(Amount::new),
            participants,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id),
            created_by: ActiveValue::Set(expense.created_by),
            amount: ActiveValue::Set(expense.amount.minor()),
            description: ActiveValue::Set(expense.description.clone()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            is_personal: ActiveValue::Set(expense.is_personal),
            is_settled: ActiveValue::Set(expense.is_settled),
            total_splitted_amount: ActiveValue::Set(
                expense.total_splitted_amount.map(Amount::minor),
            ),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
        }
    }
}

/// Per-kind breakdown used by [`ExpenseSummary`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown<T> {
    pub personal: T,
    pub split: T,
    pub total: T,
}

/// Aggregate counts and amounts over a user's expenses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub count: Breakdown<u64>,
    pub amount: Breakdown<Amount>,
}

impl ExpenseSummary {
    /// Fails with `InvalidAmount` when a total leaves the amount range.
    pub fn from_expenses<'a>(
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> Result<Self, EngineError> {
        let mut summary = Self::default();
        for expense in expenses {
            if expense.is_personal {
                summary.count.personal += 1;
                summary.amount.personal = summary.amount.personal.try_add(expense.amount)?;
            } else {
                summary.count.split += 1;
                summary.amount.split = summary.amount.split.try_add(expense.amount)?;
            }
            summary.count.total += 1;
            summary.amount.total = summary.amount.total.try_add(expense.amount)?;
        }
        Ok(summary)
    }
}

/// Expenses owned by a user together with their aggregate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseList {
    pub expenses: Vec<Expense>,
    pub summary: ExpenseSummary,
}
