//! Core of the expense-splitting service.
//!
//! The [`Engine`] owns the database connection and exposes every operation:
//! users, friendships, expenses with their ledger rows, and settle requests.
//! Each mutating operation runs inside a single database transaction.

pub use category::ExpenseCategory;
pub use commands::{ExpenseUpdate, NewExpense, NewUser, SplitShare, UserUpdate};
pub use error::{EngineError, ErrorKind};
pub use expenses::{Breakdown, Expense, ExpenseList, ExpenseSummary};
pub use friend_requests::{FriendRequest, FriendRequests};
pub use ledger::{ExpenseCount, PairSummary, net_balance};
pub use money::Amount;
pub use ops::{Engine, EngineBuilder, Friend, FriendBalance};
pub use settle_requests::{SettleOutcome, SettleRequest, SettleRequests, SettleScope};
pub use split_expenses::{FriendExpense, SplitExpense};
pub use users::User;

mod category;
mod commands;
mod error;
pub mod expenses;
pub mod friend_requests;
pub mod friends;
mod ledger;
mod money;
mod ops;
mod password;
pub mod settle_requests;
pub mod split_expenses;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
