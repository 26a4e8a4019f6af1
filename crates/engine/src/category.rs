//! Expense categories.

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Transportation,
    Entertainment,
    Utilities,
    Healthcare,
    Education,
    Housing,
    PersonalCare,
    Debt,
    Savings,
    Investment,
    #[default]
    Miscellaneous,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 12] = [
        Self::Food,
        Self::Transportation,
        Self::Entertainment,
        Self::Utilities,
        Self::Healthcare,
        Self::Education,
        Self::Housing,
        Self::PersonalCare,
        Self::Debt,
        Self::Savings,
        Self::Investment,
        Self::Miscellaneous,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Housing => "housing",
            Self::PersonalCare => "personal_care",
            Self::Debt => "debt",
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::Miscellaneous => "miscellaneous",
        }
    }

    /// Resolves an optional user-supplied category; blank means the default.
    pub fn parse_optional(value: Option<&str>) -> Result<Self, EngineError> {
        match value.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Self::try_from(raw),
            None => Ok(Self::default()),
        }
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let key = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == key)
            .ok_or_else(|| EngineError::InvalidCategory(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values_case_insensitively() {
        assert_eq!(ExpenseCategory::try_from("food").unwrap(), ExpenseCategory::Food);
        assert_eq!(
            ExpenseCategory::try_from("Personal_Care").unwrap(),
            ExpenseCategory::PersonalCare
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert_eq!(
            ExpenseCategory::try_from("groceries").unwrap_err(),
            EngineError::InvalidCategory("groceries".to_string())
        );
    }

    #[test]
    fn missing_category_defaults_to_miscellaneous() {
        assert_eq!(
            ExpenseCategory::parse_optional(None).unwrap(),
            ExpenseCategory::Miscellaneous
        );
        assert_eq!(
            ExpenseCategory::parse_optional(Some("  ")).unwrap(),
            ExpenseCategory::Miscellaneous
        );
    }

    #[test]
    fn round_trips_through_storage_string() {
        for category in ExpenseCategory::ALL {
            assert_eq!(ExpenseCategory::try_from(category.as_str()).unwrap(), category);
        }
    }
}
