use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping every JSON response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Successful response without a payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserRegister {
        pub name: String,
        pub email: String,
        pub password: String,
        /// URL of an already uploaded image.
        pub avatar: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserLogin {
        pub email: String,
        pub password: String,
    }

    /// Absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AvatarUpdate {
        pub avatar: String,
    }
}

pub mod friend_request {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FriendRequestSend {
        pub receiver_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FriendRequestAccept {
        pub sender_id: Uuid,
    }

    /// Body of the reject and remove routes.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FriendRequestTarget {
        pub friend_request_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FriendshipCreated {
        pub friendship_id: Uuid,
    }
}

pub mod friend {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FriendQuery {
        pub friend_id: Uuid,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SplitShare {
        pub user_id: Uuid,
        /// Must be >= 0.
        pub amount_minor: i64,
        /// Defaults to the expense description.
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// Must be > 0.
        pub amount_minor: i64,
        pub description: String,
        pub category: Option<String>,
        /// Required and non-empty on `/splitExpense/create`, ignored otherwise.
        #[serde(default)]
        pub splits: Vec<SplitShare>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub expense_id: Uuid,
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub category: Option<String>,
        /// Replaces the participants; an empty list makes the expense personal.
        pub splits: Option<Vec<SplitShare>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseTarget {
        pub expense_id: Uuid,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettleRequestSend {
        pub receiver_id: Uuid,
        pub is_settle_all: bool,
        /// Required when `is_settle_all` is false.
        pub expense_id: Option<Uuid>,
    }

    /// Body of the accept, reject and remove routes.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettleRequestTarget {
        pub settle_expense_request_id: Uuid,
    }
}
