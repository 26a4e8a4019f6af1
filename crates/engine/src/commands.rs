//! Command structs for engine operations.
//!
//! These types group parameters for write operations (registration,
//! expense creation and update), keeping call sites readable and avoiding
//! long argument lists.

use uuid::Uuid;

use crate::Amount;

/// Register a new user.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

impl NewUser {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            avatar: None,
        }
    }

    #[must_use]
    pub fn avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar = Some(url.into());
        self
    }
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// One participant's share of a split expense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitShare {
    pub participant: Uuid,
    pub amount: Amount,
    /// Falls back to the expense description when absent.
    pub description: Option<String>,
}

impl SplitShare {
    #[must_use]
    pub fn new(participant: Uuid, amount: Amount) -> Self {
        Self {
            participant,
            amount,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Create an expense, personal or split.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub user_id: Uuid,
    pub amount: Amount,
    pub description: String,
    pub category: Option<String>,
    pub splits: Vec<SplitShare>,
}

impl NewExpense {
    #[must_use]
    pub fn new(user_id: Uuid, amount: Amount, description: impl Into<String>) -> Self {
        Self {
            user_id,
            amount,
            description: description.into(),
            category: None,
            splits: Vec::new(),
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn split(mut self, share: SplitShare) -> Self {
        self.splits.push(share);
        self
    }
}

/// Update an expense owned by `user_id`.
#[derive(Clone, Debug)]
pub struct ExpenseUpdate {
    pub expense_id: Uuid,
    pub user_id: Uuid,
    pub amount: Option<Amount>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Replaces the whole participant list when present.
    pub splits: Option<Vec<SplitShare>>,
}

impl ExpenseUpdate {
    #[must_use]
    pub fn new(expense_id: Uuid, user_id: Uuid) -> Self {
        Self {
            expense_id,
            user_id,
            amount: None,
            description: None,
            category: None,
            splits: None,
        }
    }

    #[must_use]
    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn splits(mut self, splits: Vec<SplitShare>) -> Self {
        self.splits = Some(splits);
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.splits.is_none()
    }
}
