use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, SettleOutcome, SettleRequest, SettleRequests, SettleScope,
    expenses, settle_requests,
};

use super::{Engine, with_tx};

impl Engine {
    /// Ask `receiver_id` to confirm that the rows covered by `scope` are paid.
    pub async fn send_settle_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        scope: SettleScope,
    ) -> ResultEngine<SettleRequest> {
        if sender_id == receiver_id {
            return Err(EngineError::SelfRequest);
        }

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, receiver_id).await?;

            let duplicate = settle_requests::Entity::find()
                .filter(settle_requests::Column::SenderId.eq(sender_id))
                .filter(settle_requests::Column::ReceiverId.eq(receiver_id))
                .filter(settle_requests::Column::IsSettleAll.eq(scope.is_settle_all()))
                .one(&db_tx)
                .await?
                .is_some();
            if duplicate {
                return Err(EngineError::DuplicateSettleRequest);
            }

            match scope {
                SettleScope::All => {
                    let net = self.net_balance(&db_tx, sender_id, receiver_id).await?;
                    if net.is_zero() {
                        return Err(EngineError::NothingToSettle(
                            "balance is already zero".to_string(),
                        ));
                    }
                }
                SettleScope::Individual(expense_id) => {
                    let exists = expenses::Entity::find_by_id(expense_id)
                        .one(&db_tx)
                        .await?
                        .is_some();
                    if !exists {
                        return Err(EngineError::KeyNotFound("expense not exists".to_string()));
                    }
                    let open = self
                        .count_unsettled(&db_tx, sender_id, receiver_id, scope)
                        .await?;
                    if open == 0 {
                        return Err(EngineError::NothingToSettle(format!(
                            "no unsettled share of expense {expense_id}"
                        )));
                    }
                }
            }

            let request = SettleRequest::new(sender_id, receiver_id, scope);
            let model: settle_requests::ActiveModel = (&request).into();
            model.insert(&db_tx).await?;
            tracing::info!(
                request_id = %request.id,
                %sender_id,
                %receiver_id,
                settle_all = scope.is_settle_all(),
                "settle request sent"
            );
            Ok(request)
        })
    }

    /// Confirm a settle request addressed to `user_id` and settle its rows.
    pub async fn accept_settle_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> ResultEngine<SettleOutcome> {
        with_tx!(self, |db_tx| {
            let model = settle_requests::Entity::find_by_id(request_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::RequestNotFound(request_id.to_string()))?;
            let request = SettleRequest::try_from(model)?;
            if request.receiver_id != user_id {
                return Err(EngineError::Unauthorized(
                    "only the receiver can accept this request".to_string(),
                ));
            }
            self.require_friends(&db_tx, request.receiver_id, request.sender_id)
                .await?;

            // A concurrent accept of the same request deletes zero rows.
            let deleted = settle_requests::Entity::delete_by_id(request.id)
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::RequestNotFound(request_id.to_string()));
            }

            let settled_rows = self
                .settle_rows(&db_tx, request.sender_id, request.receiver_id, request.scope)
                .await?;
            tracing::info!(
                %request_id,
                sender_id = %request.sender_id,
                receiver_id = %request.receiver_id,
                settled_rows,
                "settle request accepted"
            );
            Ok(SettleOutcome {
                request_id,
                scope: request.scope,
                settled_rows,
            })
        })
    }

    /// Decline a settle request addressed to `user_id`.
    pub async fn reject_settle_request(&self, user_id: Uuid, request_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let deleted = settle_requests::Entity::delete_many()
                .filter(settle_requests::Column::Id.eq(request_id))
                .filter(settle_requests::Column::ReceiverId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::RequestNotFound(request_id.to_string()));
            }
            Ok(())
        })
    }

    /// Withdraw a settle request sent by `user_id`.
    pub async fn remove_settle_request(&self, user_id: Uuid, request_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let deleted = settle_requests::Entity::delete_many()
                .filter(settle_requests::Column::Id.eq(request_id))
                .filter(settle_requests::Column::SenderId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::RequestNotFound(request_id.to_string()));
            }
            Ok(())
        })
    }

    pub async fn list_settle_requests(&self, user_id: Uuid) -> ResultEngine<SettleRequests> {
        let models = settle_requests::Entity::find()
            .filter(settle_requests::involving(user_id))
            .order_by_desc(settle_requests::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let mut requests = SettleRequests::default();
        for model in models {
            let request = SettleRequest::try_from(model)?;
            if request.receiver_id == user_id {
                requests.incoming.push(request);
            } else {
                requests.outgoing.push(request);
            }
        }
        Ok(requests)
    }
}
