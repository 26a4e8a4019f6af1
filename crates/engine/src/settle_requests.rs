//! Pending requests to mark ledger rows between two users as settled.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, Condition, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settle_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub expense_id: Option<Uuid>,
    pub is_settle_all: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReceiverId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}

/// What a settle request covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "expense_id", rename_all = "snake_case")]
pub enum SettleScope {
    /// Every unsettled row between the two users.
    All,
    /// The unsettled rows of one expense between the two users.
    Individual(Uuid),
}

impl SettleScope {
    pub fn is_settle_all(self) -> bool {
        matches!(self, Self::All)
    }

    pub fn expense_id(self) -> Option<Uuid> {
        match self {
            Self::All => None,
            Self::Individual(id) => Some(id),
        }
    }

    /// Rebuilds the scope from its storage columns.
    pub(crate) fn from_columns(
        is_settle_all: bool,
        expense_id: Option<Uuid>,
    ) -> Result<Self, EngineError> {
        match (is_settle_all, expense_id) {
            (true, _) => Ok(Self::All),
            (false, Some(id)) => Ok(Self::Individual(id)),
            (false, None) => Err(EngineError::InvalidInput(
                "individual settle request without expense".to_string(),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub scope: SettleScope,
    pub created_at: DateTime<Utc>,
}

impl SettleRequest {
    pub fn new(sender_id: Uuid, receiver_id: Uuid, scope: SettleScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            scope,
            created_at: Utc::now(),
        }
    }
}

impl TryFrom<Model> for SettleRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            sender_id: model.sender_id,
            receiver_id: model.receiver_id,
            scope: SettleScope::from_columns(model.is_settle_all, model.expense_id)?,
            created_at: model.created_at,
        })
    }
}

impl From<&SettleRequest> for ActiveModel {
    fn from(request: &SettleRequest) -> Self {
        Self {
            id: ActiveValue::Set(request.id),
            sender_id: ActiveValue::Set(request.sender_id),
            receiver_id: ActiveValue::Set(request.receiver_id),
            expense_id: ActiveValue::Set(request.scope.expense_id()),
            is_settle_all: ActiveValue::Set(request.scope.is_settle_all()),
            created_at: ActiveValue::Set(request.created_at),
        }
    }
}

/// Pending settle requests of a user, split by direction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleRequests {
    pub incoming: Vec<SettleRequest>,
    pub outgoing: Vec<SettleRequest>,
}

/// Result of applying an accepted settle request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleOutcome {
    pub request_id: Uuid,
    pub scope: SettleScope,
    /// Rows flipped by this call; already settled rows are not counted.
    pub settled_rows: u64,
}

/// Matches every request sent or received by `user_id`.
/// Matches requests between `a` and `b` in either direction.
pub(crate) fn between(a: Uuid, b: Uuid) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(Column::SenderId.eq(a))
                .add(Column::ReceiverId.eq(b)),
        )
        .add(
            Condition::all()
                .add(Column::SenderId.eq(b))
                .add(Column::ReceiverId.eq(a)),
        )
}

pub(crate) fn involving(user_id: Uuid) -> Condition {
    Condition::any()
        .add(Column::SenderId.eq(user_id))
        .add(Column::ReceiverId.eq(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_round_trips_through_columns() {
        let id = Uuid::new_v4();
        for scope in [SettleScope::All, SettleScope::Individual(id)] {
            let rebuilt =
                SettleScope::from_columns(scope.is_settle_all(), scope.expense_id()).unwrap();
            assert_eq!(rebuilt, scope);
        }
    }

    #[test]
    fn individual_scope_requires_expense() {
        assert!(SettleScope::from_columns(false, None).is_err());
    }
}
