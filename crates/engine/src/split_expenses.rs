//! Ledger rows: who owes whom how much for a given expense.
//!
//! `created_by` is the payer, `created_for` the participant who owes
//! `splitted_amount` until the row is settled.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, Condition, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, ExpenseCategory};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "split_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub expense_id: Uuid,
    pub created_by: Uuid,
    pub created_for: Uuid,
    pub splitted_amount: i64,
    pub splitted_description: String,
    pub is_splitted_settled: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitExpense {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub created_by: Uuid,
    pub created_for: Uuid,
    pub splitted_amount: Amount,
    pub splitted_description: String,
    pub is_splitted_settled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SplitExpense {
    pub fn new(
        expense_id: Uuid,
        created_by: Uuid,
        created_for: Uuid,
        splitted_amount: Amount,
        splitted_description: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            expense_id,
            created_by,
            created_for,
            splitted_amount,
            splitted_description,
            is_splitted_settled: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<Model> for SplitExpense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            expense_id: model.expense_id,
            created_by: model.created_by,
            created_for: model.created_for,
            splitted_amount: Amount::new(model.splitted_amount),
            splitted_description: model.splitted_description,
            is_splitted_settled: model.is_splitted_settled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&SplitExpense> for ActiveModel {
    fn from(row: &SplitExpense) -> Self {
        Self {
            id: ActiveValue::Set(row.id),
            expense_id: ActiveValue::Set(row.expense_id),
            created_by: ActiveValue::Set(row.created_by),
            created_for: ActiveValue::Set(row.created_for),
            splitted_amount: ActiveValue::Set(row.splitted_amount.minor()),
            splitted_description: ActiveValue::Set(row.splitted_description.clone()),
            is_splitted_settled: ActiveValue::Set(row.is_splitted_settled),
            created_at: ActiveValue::Set(row.created_at),
            updated_at: ActiveValue::Set(row.updated_at),
        }
    }
}

/// A ledger row joined with its parent expense, seen from one of the two
/// parties.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendExpense {
    #[serde(flatten)]
    pub split: SplitExpense,
    pub amount: Amount,
    pub description: String,
    pub category: ExpenseCategory,
    pub is_created_by_you: bool,
}

/// Matches rows between `a` and `b`, whoever paid.
pub(crate) fn between(a: Uuid, b: Uuid) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(Column::CreatedBy.eq(a))
                .add(Column::CreatedFor.eq(b)),
        )
        .add(
            Condition::all()
                .add(Column::CreatedBy.eq(b))
                .add(Column::CreatedFor.eq(a)),
        )
}

/// Matches every row where `user_id` is either party.
pub(crate) fn touching(user_id: Uuid) -> Condition {
    Condition::any()
        .add(Column::CreatedBy.eq(user_id))
        .add(Column::CreatedFor.eq(user_id))
}
