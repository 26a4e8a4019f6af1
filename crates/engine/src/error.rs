//! The module contains the error the engine can throw.
//!
//! Every operation either succeeds or fails with exactly one
//! [`EngineError`]. [`EngineError::kind`] groups the variants into the
//! coarse [`ErrorKind`] taxonomy the transport layer maps onto status codes.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Splitted amount exceeds expense amount: {0}")]
    SplitExceedsTotal(String),
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),
    #[error("Cannot split an expense with yourself")]
    SelfSplit,
    #[error("Cannot send a request to yourself")]
    SelfRequest,
    #[error("Not friends: {0}")]
    NotFriends(String),
    #[error("A friend request or friendship already exists between these users")]
    AlreadyPendingOrFriends,
    #[error("Friendship already exists between these users")]
    AlreadyFriends,
    #[error("Request not found: {0}")]
    RequestNotFound(String),
    #[error("Settle request already exists")]
    DuplicateSettleRequest,
    #[error("Nothing to settle: {0}")]
    NothingToSettle(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Password hashing failed: {0}")]
    Crypto(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Coarse classification of [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    Internal,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidAmount(_)
            | Self::InvalidCategory(_)
            | Self::SplitExceedsTotal(_)
            | Self::DuplicateParticipant(_)
            | Self::SelfSplit
            | Self::SelfRequest
            | Self::NothingToSettle(_) => ErrorKind::Validation,
            Self::InvalidCredentials => ErrorKind::Authentication,
            Self::Unauthorized(_) | Self::NotFriends(_) => ErrorKind::Authorization,
            Self::KeyNotFound(_) | Self::RequestNotFound(_) => ErrorKind::NotFound,
            Self::ExistingKey(_)
            | Self::AlreadyPendingOrFriends
            | Self::AlreadyFriends
            | Self::DuplicateSettleRequest => ErrorKind::Conflict,
            Self::Crypto(_) | Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::SplitExceedsTotal(a), Self::SplitExceedsTotal(b)) => a == b,
            (Self::DuplicateParticipant(a), Self::DuplicateParticipant(b)) => a == b,
            (Self::SelfSplit, Self::SelfSplit) => true,
            (Self::SelfRequest, Self::SelfRequest) => true,
            (Self::NotFriends(a), Self::NotFriends(b)) => a == b,
            (Self::AlreadyPendingOrFriends, Self::AlreadyPendingOrFriends) => true,
            (Self::AlreadyFriends, Self::AlreadyFriends) => true,
            (Self::RequestNotFound(a), Self::RequestNotFound(b)) => a == b,
            (Self::DuplicateSettleRequest, Self::DuplicateSettleRequest) => true,
            (Self::NothingToSettle(a), Self::NothingToSettle(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Crypto(a), Self::Crypto(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
