use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Amount, EngineError, Expense, ExpenseCategory, ExpenseList, ExpenseSummary, ExpenseUpdate,
    NewExpense, ResultEngine, SplitExpense, SplitShare, expenses, settle_requests,
    split_expenses,
    util::{
        normalize_description, validate_expense_amount, validate_participants,
        validate_share_amount,
    },
};

use super::{Engine, with_tx};

/// Field checks that need no database access, in reporting order.
struct CheckedFields {
    amount: Option<Amount>,
    description: Option<String>,
    category: Option<ExpenseCategory>,
    shares: Option<Vec<CheckedShare>>,
}

struct CheckedShare {
    participant: Uuid,
    amount: Amount,
    description: Option<String>,
}

impl CheckedShare {
    fn description_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.description.as_deref().unwrap_or(fallback)
    }
}

fn check_fields(
    user_id: Uuid,
    amount: Option<Amount>,
    description: Option<&str>,
    category: Option<&str>,
    splits: Option<&[SplitShare]>,
) -> ResultEngine<CheckedFields> {
    if let Some(amount) = amount {
        validate_expense_amount(amount)?;
    }
    for share in splits.unwrap_or_default() {
        validate_share_amount(share.amount)?;
    }

    let description = description
        .map(|value| normalize_description(value, "description"))
        .transpose()?;
    let shares = splits
        .map(|splits| {
            splits
                .iter()
                .map(|share| {
                    Ok(CheckedShare {
                        participant: share.participant,
                        amount: share.amount,
                        description: share
                            .description
                            .as_deref()
                            .map(|value| normalize_description(value, "splitted description"))
                            .transpose()?,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
        .transpose()?;

    let category = category
        .map(|raw| ExpenseCategory::parse_optional(Some(raw)))
        .transpose()?;

    if let Some(shares) = &shares {
        let participants: Vec<Uuid> = shares.iter().map(|share| share.participant).collect();
        validate_participants(user_id, &participants)?;
    }

    Ok(CheckedFields {
        amount,
        description,
        category,
        shares,
    })
}

fn check_split_total(shares: &[CheckedShare], amount: Amount) -> ResultEngine<Amount> {
    let total = Amount::checked_sum(shares.iter().map(|share| share.amount))?;
    if total > amount {
        return Err(EngineError::SplitExceedsTotal(format!(
            "splitted total {total} is greater than amount {amount}"
        )));
    }
    Ok(total)
}

impl Engine {
    /// Record an expense paid by and for `cmd.user_id` alone.
    pub async fn create_personal_expense(&self, cmd: NewExpense) -> ResultEngine<Expense> {
        let fields = check_fields(
            cmd.user_id,
            Some(cmd.amount),
            Some(&cmd.description),
            cmd.category.as_deref(),
            None,
        )?;
        if !cmd.splits.is_empty() {
            return Err(EngineError::InvalidInput(
                "a personal expense cannot have splits".to_string(),
            ));
        }

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            created_by: cmd.user_id,
            amount: cmd.amount,
            description: fields.description.unwrap_or_default(),
            category: fields.category.unwrap_or_default(),
            is_personal: true,
            is_settled: true,
            total_splitted_amount: None,
            participants: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            let model: expenses::ActiveModel = (&expense).into();
            model.insert(&db_tx).await?;
            tracing::info!(
                expense_id = %expense.id,
                user_id = %cmd.user_id,
                "personal expense created"
            );
            Ok(expense)
        })
    }

    /// Record an expense paid by `cmd.user_id` and split with friends.
    ///
    /// Every share becomes an unsettled ledger row owed to the creator.
    pub async fn create_split_expense(&self, cmd: NewExpense) -> ResultEngine<Expense> {
        let fields = check_fields(
            cmd.user_id,
            Some(cmd.amount),
            Some(&cmd.description),
            cmd.category.as_deref(),
            Some(cmd.splits.as_slice()),
        )?;
        let shares = fields.shares.unwrap_or_default();
        if shares.is_empty() {
            return Err(EngineError::InvalidInput(
                "a split expense needs at least one participant".to_string(),
            ));
        }
        let total = check_split_total(&shares, cmd.amount)?;
        let description = fields.description.unwrap_or_default();

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            created_by: cmd.user_id,
            amount: cmd.amount,
            description: description.clone(),
            category: fields.category.unwrap_or_default(),
            is_personal: false,
            is_settled: false,
            total_splitted_amount: Some(total),
            participants: shares.iter().map(|share| share.participant).collect(),
            created_at: now,
            updated_at: now,
        };

        with_tx!(self, |db_tx| {
            for share in &shares {
                self.require_friends(&db_tx, cmd.user_id, share.participant)
                    .await?;
            }

            let model: expenses::ActiveModel = (&expense).into();
            model.insert(&db_tx).await?;
            for share in &shares {
                let row = SplitExpense::new(
                    expense.id,
                    cmd.user_id,
                    share.participant,
                    share.amount,
                    share.description_or(&description).to_string(),
                );
                let row_model: split_expenses::ActiveModel = (&row).into();
                row_model.insert(&db_tx).await?;
            }
            tracing::info!(
                expense_id = %expense.id,
                user_id = %cmd.user_id,
                participants = shares.len(),
                "split expense created"
            );
            Ok(expense)
        })
    }

    /// Apply a partial update to an expense owned by `cmd.user_id`.
    ///
    /// A `splits` list replaces the participants: missing ones lose their
    /// row, kept ones keep their settled flag, new ones get a fresh row. An
    /// empty list turns the expense personal.
    pub async fn update_expense(&self, cmd: ExpenseUpdate) -> ResultEngine<Expense> {
        if cmd.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one field is required".to_string(),
            ));
        }
        let fields = check_fields(
            cmd.user_id,
            cmd.amount,
            cmd.description.as_deref(),
            cmd.category.as_deref(),
            cmd.splits.as_deref(),
        )?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_expense_owner(&db_tx, cmd.expense_id, cmd.user_id)
                .await?;
            let amount = fields.amount.unwrap_or(Amount::new(model.amount));
            let description = fields
                .description
                .clone()
                .unwrap_or_else(|| model.description.clone());
            let now = Utc::now();

            let mut active: expenses::ActiveModel = model.clone().into();
            active.amount = ActiveValue::Set(amount.minor());
            active.description = ActiveValue::Set(description.clone());
            if let Some(category) = fields.category {
                active.category = ActiveValue::Set(category.as_str().to_string());
            }
            active.updated_at = ActiveValue::Set(now);

            match &fields.shares {
                Some(shares) if shares.is_empty() => {
                    split_expenses::Entity::delete_many()
                        .filter(split_expenses::Column::ExpenseId.eq(model.id))
                        .exec(&db_tx)
                        .await?;
                    settle_requests::Entity::delete_many()
                        .filter(settle_requests::Column::ExpenseId.eq(model.id))
                        .exec(&db_tx)
                        .await?;
                    active.is_personal = ActiveValue::Set(true);
                    active.is_settled = ActiveValue::Set(true);
                    active.total_splitted_amount = ActiveValue::Set(None);
                }
                Some(shares) => {
                    let total = check_split_total(shares, amount)?;
                    for share in shares {
                        self.require_friends(&db_tx, cmd.user_id, share.participant)
                            .await?;
                    }
                    self.replace_shares(&db_tx, &model, shares, &description)
                        .await?;
                    active.is_personal = ActiveValue::Set(false);
                    active.total_splitted_amount = ActiveValue::Set(Some(total.minor()));
                }
                None => {
                    if let Some(total) = model.total_splitted_amount
                        && Amount::new(total) > amount
                    {
                        return Err(EngineError::SplitExceedsTotal(format!(
                            "splitted total {} is greater than amount {amount}",
                            Amount::new(total)
                        )));
                    }
                }
            }

            active.update(&db_tx).await?;
            if matches!(&fields.shares, Some(shares) if !shares.is_empty()) {
                self.refresh_expense_settled(&db_tx, model.id).await?;
            }

            let updated = expenses::Entity::find_by_id(model.id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
            let participants = self.participants_of(&db_tx, model.id).await?;
            tracing::info!(expense_id = %model.id, "expense updated");
            Expense::from_model(updated, participants)
        })
    }

    /// Delete an expense owned by `user_id`, with its ledger rows and any
    /// settle request pointing at it.
    pub async fn delete_expense(&self, user_id: Uuid, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_expense_owner(&db_tx, expense_id, user_id)
                .await?;

            settle_requests::Entity::delete_many()
                .filter(settle_requests::Column::ExpenseId.eq(model.id))
                .exec(&db_tx)
                .await?;
            let rows = split_expenses::Entity::delete_many()
                .filter(split_expenses::Column::ExpenseId.eq(model.id))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            tracing::info!(
                %expense_id,
                rows = rows.rows_affected,
                "expense deleted"
            );
            Ok(())
        })
    }

    /// Expenses created by `user_id`, newest first.
    pub async fn list_expenses(&self, user_id: Uuid) -> ResultEngine<ExpenseList> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::CreatedBy.eq(user_id))
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let mut participants: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if !models.is_empty() {
            let rows = split_expenses::Entity::find()
                .filter(split_expenses::Column::ExpenseId.is_in(models.iter().map(|m| m.id)))
                .order_by_asc(split_expenses::Column::CreatedAt)
                .all(&self.database)
                .await?;
            for row in rows {
                participants
                    .entry(row.expense_id)
                    .or_default()
                    .push(row.created_for);
            }
        }

        let expenses = models
            .into_iter()
            .map(|model| {
                let ids = participants.remove(&model.id).unwrap_or_default();
                Expense::from_model(model, ids)
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        let summary = ExpenseSummary::from_expenses(&expenses)?;
        Ok(ExpenseList { expenses, summary })
    }

    async fn participants_of<C: ConnectionTrait>(
        &self,
        db: &C,
        expense_id: Uuid,
    ) -> ResultEngine<Vec<Uuid>> {
        let rows = split_expenses::Entity::find()
            .filter(split_expenses::Column::ExpenseId.eq(expense_id))
            .order_by_asc(split_expenses::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|row| row.created_for).collect())
    }

    /// Diff the stored rows of `expense` against `shares`.
    async fn replace_shares<C: ConnectionTrait>(
        &self,
        db: &C,
        expense: &expenses::Model,
        shares: &[CheckedShare],
        description: &str,
    ) -> ResultEngine<()> {
        let mut existing: HashMap<Uuid, split_expenses::Model> = split_expenses::Entity::find()
            .filter(split_expenses::Column::ExpenseId.eq(expense.id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| (row.created_for, row))
            .collect();
        let now = Utc::now();

        for share in shares {
            let row_description = share.description_or(description).to_string();
            match existing.remove(&share.participant) {
                Some(row) => {
                    let mut active: split_expenses::ActiveModel = row.into();
                    active.splitted_amount = ActiveValue::Set(share.amount.minor());
                    active.splitted_description = ActiveValue::Set(row_description);
                    active.updated_at = ActiveValue::Set(now);
                    active.update(db).await?;
                }
                None => {
                    let row = SplitExpense::new(
                        expense.id,
                        expense.created_by,
                        share.participant,
                        share.amount,
                        row_description,
                    );
                    let model: split_expenses::ActiveModel = (&row).into();
                    model.insert(db).await?;
                }
            }
        }

        if !existing.is_empty() {
            split_expenses::Entity::delete_many()
                .filter(split_expenses::Column::Id.is_in(existing.values().map(|row| row.id)))
                .exec(db)
                .await?;
            // Requests to settle this expense with a dropped participant
            // have nothing left to settle.
            for participant in existing.keys() {
                settle_requests::Entity::delete_many()
                    .filter(settle_requests::Column::ExpenseId.eq(expense.id))
                    .filter(settle_requests::between(expense.created_by, *participant))
                    .exec(db)
                    .await?;
            }
        }
        Ok(())
    }
}
