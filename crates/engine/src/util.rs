//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same rules.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{Amount, EngineError, ResultEngine};

const DESCRIPTION_MIN: usize = 2;
const DESCRIPTION_MAX: usize = 200;
const NAME_MIN: usize = 3;
const NAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 5;

/// Trim a description and check its length.
pub(crate) fn normalize_description(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&len) {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blank to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn normalize_user_name(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(EngineError::InvalidInput(format!(
            "name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Emails are compared case-insensitively, so they are stored lowercased.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(EngineError::InvalidInput(format!("invalid email: {value}")));
    }
    Ok(email)
}

pub(crate) fn validate_password(value: &str) -> ResultEngine<()> {
    if value.chars().count() < PASSWORD_MIN {
        return Err(EngineError::InvalidInput(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

/// Expense totals must be strictly positive.
pub(crate) fn validate_expense_amount(amount: Amount) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Shares may be zero but never negative.
pub(crate) fn validate_share_amount(amount: Amount) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(
            "splitted amount cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Reject repeated participants, then the creator splitting with themselves.
pub(crate) fn validate_participants(creator: Uuid, participants: &[Uuid]) -> ResultEngine<()> {
    let mut seen = HashSet::new();
    if let Some(duplicate) = participants.iter().find(|id| !seen.insert(**id)) {
        return Err(EngineError::DuplicateParticipant(duplicate.to_string()));
    }
    if participants.contains(&creator) {
        return Err(EngineError::SelfSplit);
    }
    Ok(())
}
