use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, expenses, friends, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn are_friends<C: ConnectionTrait>(
        &self,
        db: &C,
        a: Uuid,
        b: Uuid,
    ) -> ResultEngine<bool> {
        Ok(friends::Entity::find()
            .filter(friends::between(a, b))
            .one(db)
            .await?
            .is_some())
    }

    pub(super) async fn require_friends<C: ConnectionTrait>(
        &self,
        db: &C,
        a: Uuid,
        b: Uuid,
    ) -> ResultEngine<()> {
        if !self.are_friends(db, a, b).await? {
            return Err(EngineError::NotFriends(b.to_string()));
        }
        Ok(())
    }

    /// Loads an expense and checks that `user_id` created it.
    pub(super) async fn require_expense_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        expense_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<expenses::Model> {
        let model = expenses::Entity::find_by_id(expense_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        if model.created_by != user_id {
            return Err(EngineError::Unauthorized(
                "only the creator can modify this expense".to_string(),
            ));
        }
        Ok(model)
    }
}
