use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{Amount, ResultEngine, SettleScope, SplitExpense, expenses, split_expenses};

use super::Engine;

impl Engine {
    /// Ledger rows between `a` and `b` in either direction, oldest first.
    pub async fn split_rows_between(&self, a: Uuid, b: Uuid) -> ResultEngine<Vec<SplitExpense>> {
        self.rows_between(&self.database, a, b).await
    }

    pub(super) async fn rows_between<C: ConnectionTrait>(
        &self,
        db: &C,
        a: Uuid,
        b: Uuid,
    ) -> ResultEngine<Vec<SplitExpense>> {
        let models = split_expenses::Entity::find()
            .filter(split_expenses::between(a, b))
            .order_by_asc(split_expenses::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(models.into_iter().map(SplitExpense::from).collect())
    }

    /// Net unsettled amount between `a` and `b`; positive when `b` owes `a`.
    pub(super) async fn net_balance<C: ConnectionTrait>(
        &self,
        db: &C,
        a: Uuid,
        b: Uuid,
    ) -> ResultEngine<Amount> {
        let rows = self.rows_between(db, a, b).await?;
        crate::net_balance(&rows, a, b)
    }

    /// Number of unsettled rows between `a` and `b` covered by `scope`.
    pub(super) async fn count_unsettled<C: ConnectionTrait>(
        &self,
        db: &C,
        a: Uuid,
        b: Uuid,
        scope: SettleScope,
    ) -> ResultEngine<u64> {
        let mut query = split_expenses::Entity::find()
            .filter(split_expenses::between(a, b))
            .filter(split_expenses::Column::IsSplittedSettled.eq(false));
        if let Some(expense_id) = scope.expense_id() {
            query = query.filter(split_expenses::Column::ExpenseId.eq(expense_id));
        }
        Ok(query.count(db).await?)
    }

    /// Flip every still unsettled row between `a` and `b` covered by `scope`.
    ///
    /// Returns the number of rows flipped by this call, so settling twice is
    /// a no-op. Parents whose rows end up all settled are marked settled.
    pub(super) async fn settle_rows<C: ConnectionTrait>(
        &self,
        db: &C,
        a: Uuid,
        b: Uuid,
        scope: SettleScope,
    ) -> ResultEngine<u64> {
        let mut pending = split_expenses::Entity::find()
            .select_only()
            .column(split_expenses::Column::ExpenseId)
            .filter(split_expenses::between(a, b))
            .filter(split_expenses::Column::IsSplittedSettled.eq(false));
        if let Some(expense_id) = scope.expense_id() {
            pending = pending.filter(split_expenses::Column::ExpenseId.eq(expense_id));
        }
        let touched: BTreeSet<Uuid> = pending
            .into_tuple::<Uuid>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let mut update = split_expenses::Entity::update_many()
            .col_expr(split_expenses::Column::IsSplittedSettled, Expr::value(true))
            .col_expr(split_expenses::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(split_expenses::between(a, b))
            .filter(split_expenses::Column::IsSplittedSettled.eq(false));
        if let Some(expense_id) = scope.expense_id() {
            update = update.filter(split_expenses::Column::ExpenseId.eq(expense_id));
        }
        let settled = update.exec(db).await?.rows_affected;

        for expense_id in touched {
            self.refresh_expense_settled(db, expense_id).await?;
        }
        Ok(settled)
    }

    /// Recompute `is_settled` of a split expense from its rows.
    pub(super) async fn refresh_expense_settled<C: ConnectionTrait>(
        &self,
        db: &C,
        expense_id: Uuid,
    ) -> ResultEngine<()> {
        let unsettled = split_expenses::Entity::find()
            .filter(split_expenses::Column::ExpenseId.eq(expense_id))
            .filter(split_expenses::Column::IsSplittedSettled.eq(false))
            .count(db)
            .await?;
        expenses::Entity::update_many()
            .col_expr(expenses::Column::IsSettled, Expr::value(unsettled == 0))
            .filter(expenses::Column::Id.eq(expense_id))
            .filter(expenses::Column::IsPersonal.eq(false))
            .exec(db)
            .await?;
        Ok(())
    }
}
