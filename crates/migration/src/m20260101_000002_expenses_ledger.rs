//! Expenses, their ledger rows and settle requests.

use sea_orm_migration::prelude::*;

use crate::m20260101_000001_users_friends::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    CreatedBy,
    Amount,
    Description,
    Category,
    IsPersonal,
    IsSettled,
    TotalSplittedAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SplitExpenses {
    Table,
    Id,
    ExpenseId,
    CreatedBy,
    CreatedFor,
    SplittedAmount,
    SplittedDescription,
    IsSplittedSettled,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SettleRequests {
    Table,
    Id,
    SenderId,
    ReceiverId,
    ExpenseId,
    IsSettleAll,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Expenses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Expenses::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Expenses::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::Category)
                            .string()
                            .not_null()
                            .default("miscellaneous"),
                    )
                    .col(ColumnDef::new(Expenses::IsPersonal).boolean().not_null())
                    .col(ColumnDef::new(Expenses::IsSettled).boolean().not_null())
                    .col(ColumnDef::new(Expenses::TotalSplittedAmount).big_integer())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-created_by")
                            .from(Expenses::Table, Expenses::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-created_by-created_at")
                    .table(Expenses::Table)
                    .col(Expenses::CreatedBy)
                    .col(Expenses::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SplitExpenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SplitExpenses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SplitExpenses::ExpenseId).uuid().not_null())
                    .col(ColumnDef::new(SplitExpenses::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(SplitExpenses::CreatedFor).uuid().not_null())
                    .col(
                        ColumnDef::new(SplitExpenses::SplittedAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SplitExpenses::SplittedDescription)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SplitExpenses::IsSplittedSettled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SplitExpenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SplitExpenses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-split_expenses-expense_id")
                            .from(SplitExpenses::Table, SplitExpenses::ExpenseId)
                            .to(Expenses::Table, Expenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-split_expenses-created_by")
                            .from(SplitExpenses::Table, SplitExpenses::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-split_expenses-created_for")
                            .from(SplitExpenses::Table, SplitExpenses::CreatedFor)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-split_expenses-expense_id-created_for-unique")
                    .table(SplitExpenses::Table)
                    .col(SplitExpenses::ExpenseId)
                    .col(SplitExpenses::CreatedFor)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-split_expenses-pair")
                    .table(SplitExpenses::Table)
                    .col(SplitExpenses::CreatedBy)
                    .col(SplitExpenses::CreatedFor)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SettleRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SettleRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SettleRequests::SenderId).uuid().not_null())
                    .col(ColumnDef::new(SettleRequests::ReceiverId).uuid().not_null())
                    .col(ColumnDef::new(SettleRequests::ExpenseId).uuid())
                    .col(
                        ColumnDef::new(SettleRequests::IsSettleAll)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SettleRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settle_requests-sender_id")
                            .from(SettleRequests::Table, SettleRequests::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settle_requests-receiver_id")
                            .from(SettleRequests::Table, SettleRequests::ReceiverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settle_requests-expense_id")
                            .from(SettleRequests::Table, SettleRequests::ExpenseId)
                            .to(Expenses::Table, Expenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One outstanding request per (sender, receiver, kind).
        manager
            .create_index(
                Index::create()
                    .name("idx-settle_requests-sender-receiver-kind-unique")
                    .table(SettleRequests::Table)
                    .col(SettleRequests::SenderId)
                    .col(SettleRequests::ReceiverId)
                    .col(SettleRequests::IsSettleAll)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SettleRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SplitExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        Ok(())
    }
}
