//! Pure reductions over ledger rows.
//!
//! Sign convention: a balance computed from `me`'s point of view is
//! positive when the other party owes `me`, negative when `me` owes them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, EngineError, SplitExpense};

/// Net unsettled amount between `me` and `other`.
///
/// Rows not between the two users are ignored, so the caller may pass a
/// wider slice of the ledger.
pub fn net_balance<'a>(
    rows: impl IntoIterator<Item = &'a SplitExpense>,
    me: Uuid,
    other: Uuid,
) -> Result<Amount, EngineError> {
    Ok(PairSummary::from_rows(rows, me, other)?.net)
}

/// How many rows each side created between two users.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCount {
    pub current_user: u64,
    pub friend: u64,
}

/// Balance and activity between `me` and a friend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSummary {
    /// Positive: the friend owes `me`.
    pub net: Amount,
    pub expense_count: ExpenseCount,
    pub unsettled_count: u64,
}

impl PairSummary {
    pub fn from_rows<'a>(
        rows: impl IntoIterator<Item = &'a SplitExpense>,
        me: Uuid,
        other: Uuid,
    ) -> Result<Self, EngineError> {
        let mut summary = Self::default();
        for row in rows {
            let owed_to_me = if row.created_by == me && row.created_for == other {
                summary.expense_count.current_user += 1;
                true
            } else if row.created_by == other && row.created_for == me {
                summary.expense_count.friend += 1;
                false
            } else {
                continue;
            };

            if row.is_splitted_settled {
                continue;
            }
            summary.unsettled_count += 1;
            summary.net = if owed_to_me {
                summary.net.try_add(row.splitted_amount)?
            } else {
                summary.net.try_sub(row.splitted_amount)?
            };
        }
        Ok(summary)
    }
}
