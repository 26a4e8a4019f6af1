use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Amount, EngineError, ExpenseCategory, FriendExpense, FriendRequest, FriendRequests,
    PairSummary, ResultEngine, SplitExpense, User, expenses, friend_requests, friends,
    split_expenses, users,
};

use super::{Engine, with_tx};

/// A confirmed friend of the caller, with their shared ledger summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    #[serde(flatten)]
    pub user: User,
    pub friends_since: DateTime<Utc>,
    pub summary: PairSummary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendBalance {
    pub friend_id: Uuid,
    /// Positive: the friend owes the caller.
    pub net: Amount,
}

impl Engine {
    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> ResultEngine<FriendRequest> {
        if sender_id == receiver_id {
            return Err(EngineError::SelfRequest);
        }

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, receiver_id).await?;

            let pending = friend_requests::Entity::find()
                .filter(friend_requests::between(sender_id, receiver_id))
                .one(&db_tx)
                .await?
                .is_some();
            if pending || self.are_friends(&db_tx, sender_id, receiver_id).await? {
                return Err(EngineError::AlreadyPendingOrFriends);
            }

            let model = friend_requests::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                sender_id: ActiveValue::Set(sender_id),
                receiver_id: ActiveValue::Set(receiver_id),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%sender_id, %receiver_id, "friend request sent");
            Ok(FriendRequest::from(model))
        })
    }

    /// Accept the pending request `sender_id` sent to `receiver_id`.
    ///
    /// Returns the id of the new friendship edge.
    pub async fn accept_friend_request(
        &self,
        receiver_id: Uuid,
        sender_id: Uuid,
    ) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            let request = friend_requests::Entity::find()
                .filter(friend_requests::Column::SenderId.eq(sender_id))
                .filter(friend_requests::Column::ReceiverId.eq(receiver_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::RequestNotFound(sender_id.to_string()))?;
            if self.are_friends(&db_tx, sender_id, receiver_id).await? {
                return Err(EngineError::AlreadyFriends);
            }

            // A concurrent accept of the same request deletes zero rows.
            let deleted = friend_requests::Entity::delete_by_id(request.id)
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::RequestNotFound(sender_id.to_string()));
            }

            let (user1, user2) = if sender_id < receiver_id {
                (sender_id, receiver_id)
            } else {
                (receiver_id, sender_id)
            };
            let edge = friends::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user1: ActiveValue::Set(user1),
                user2: ActiveValue::Set(user2),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%sender_id, %receiver_id, "friend request accepted");
            Ok(edge.id)
        })
    }

    /// Decline a request addressed to `user_id`.
    pub async fn reject_friend_request(&self, user_id: Uuid, request_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let deleted = friend_requests::Entity::delete_many()
                .filter(friend_requests::Column::Id.eq(request_id))
                .filter(friend_requests::Column::ReceiverId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::RequestNotFound(request_id.to_string()));
            }
            Ok(())
        })
    }

    /// Withdraw a request sent by `user_id`.
    pub async fn remove_friend_request(&self, user_id: Uuid, request_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let deleted = friend_requests::Entity::delete_many()
                .filter(friend_requests::Column::Id.eq(request_id))
                .filter(friend_requests::Column::SenderId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::RequestNotFound(request_id.to_string()));
            }
            Ok(())
        })
    }

    pub async fn list_friend_requests(&self, user_id: Uuid) -> ResultEngine<FriendRequests> {
        let models = friend_requests::Entity::find()
            .filter(friend_requests::involving(user_id))
            .order_by_desc(friend_requests::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let (incoming, outgoing): (Vec<_>, Vec<_>) = models
            .into_iter()
            .map(FriendRequest::from)
            .partition(|request| request.receiver_id == user_id);
        Ok(FriendRequests { incoming, outgoing })
    }

    /// Friends of `user_id` with the balance each one has with them.
    pub async fn list_friends(&self, user_id: Uuid) -> ResultEngine<Vec<Friend>> {
        let edges = friends::Entity::find()
            .filter(friends::touching(user_id))
            .order_by_asc(friends::Column::CreatedAt)
            .all(&self.database)
            .await?;
        if edges.is_empty() {
            return Ok(Vec::new());
        }

        let since: HashMap<Uuid, DateTime<Utc>> = edges
            .iter()
            .map(|edge| (edge.other(user_id), edge.created_at))
            .collect();
        let profiles = users::Entity::find()
            .filter(users::Column::Id.is_in(since.keys().copied()))
            .order_by_asc(users::Column::Name)
            .all(&self.database)
            .await?;
        let rows: Vec<SplitExpense> = split_expenses::Entity::find()
            .filter(split_expenses::touching(user_id))
            .all(&self.database)
            .await?
            .into_iter()
            .map(SplitExpense::from)
            .collect();

        profiles
            .into_iter()
            .filter_map(|profile| {
                let friends_since = *since.get(&profile.id)?;
                Some(
                    PairSummary::from_rows(&rows, user_id, profile.id).map(|summary| Friend {
                        user: profile.into(),
                        friends_since,
                        summary,
                    }),
                )
            })
            .collect()
    }

    /// Ledger rows between `user_id` and `friend_id`, newest first, joined
    /// with their parent expense.
    pub async fn friend_expenses(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> ResultEngine<Vec<FriendExpense>> {
        self.require_friends(&self.database, user_id, friend_id)
            .await?;

        let rows = split_expenses::Entity::find()
            .filter(split_expenses::between(user_id, friend_id))
            .find_also_related(expenses::Entity)
            .order_by_desc(split_expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;

        rows.into_iter()
            .filter_map(|(row, expense)| expense.map(|expense| (row, expense)))
            .map(|(row, expense)| {
                Ok(FriendExpense {
                    is_created_by_you: row.created_by == user_id,
                    split: row.into(),
                    amount: Amount::new(expense.amount),
                    description: expense.description,
                    category: ExpenseCategory::try_from(expense.category.as_str())?,
                })
            })
            .collect()
    }

    pub async fn friend_balance(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> ResultEngine<FriendBalance> {
        self.require_friends(&self.database, user_id, friend_id)
            .await?;
        let net = self
            .net_balance(&self.database, user_id, friend_id)
            .await?;
        Ok(FriendBalance { friend_id, net })
    }
}
