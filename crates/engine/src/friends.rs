//! Confirmed friendships.
//!
//! An edge is undirected: `(user1, user2)` and `(user2, user1)` describe the
//! same friendship, and the engine never stores both.

use sea_orm::{Condition, entity::prelude::*};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "friends")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user1: Uuid,
    pub user2: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::User1",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User1,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::User2",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User2,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The other endpoint of the edge, seen from `user_id`.
    pub fn other(&self, user_id: Uuid) -> Uuid {
        if self.user1 == user_id {
            self.user2
        } else {
            self.user1
        }
    }
}

/// Matches the edge between `a` and `b` regardless of orientation.
pub(crate) fn between(a: Uuid, b: Uuid) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(Column::User1.eq(a))
                .add(Column::User2.eq(b)),
        )
        .add(
            Condition::all()
                .add(Column::User1.eq(b))
                .add(Column::User2.eq(a)),
        )
}

/// Matches every edge touching `user_id`.
pub(crate) fn touching(user_id: Uuid) -> Condition {
    Condition::any()
        .add(Column::User1.eq(user_id))
        .add(Column::User2.eq(user_id))
}
