//! The filter set sent to the backend when listing expenses.

use crate::expense::Category;

/// Criteria narrowing which expenses are requested.
///
/// Text fields hold what the user typed. A blank field places no constraint
/// on the query and is left out of it entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub business_name: String,
    /// `None` means every category.
    pub category: Option<Category>,
    pub start_date: String,
    pub end_date: String,
    pub min_amount: String,
    pub max_amount: String,
}

/// A partial update to an [ExpenseFilter]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub business_name: Option<String>,
    pub category: Option<Option<Category>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
}

impl FilterPatch {
    pub fn business_name(value: impl Into<String>) -> Self {
        Self {
            business_name: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn category(value: Option<Category>) -> Self {
        Self {
            category: Some(value),
            ..Self::default()
        }
    }

    pub fn start_date(value: impl Into<String>) -> Self {
        Self {
            start_date: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn end_date(value: impl Into<String>) -> Self {
        Self {
            end_date: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn min_amount(value: impl Into<String>) -> Self {
        Self {
            min_amount: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn max_amount(value: impl Into<String>) -> Self {
        Self {
            max_amount: Some(value.into()),
            ..Self::default()
        }
    }
}

impl ExpenseFilter {
    /// A new filter set with `patch` applied on top of this one.
    pub fn merged(&self, patch: FilterPatch) -> Self {
        Self {
            business_name: patch
                .business_name
                .unwrap_or_else(|| self.business_name.clone()),
            category: patch.category.unwrap_or(self.category),
            start_date: patch.start_date.unwrap_or_else(|| self.start_date.clone()),
            end_date: patch.end_date.unwrap_or_else(|| self.end_date.clone()),
            min_amount: patch.min_amount.unwrap_or_else(|| self.min_amount.clone()),
            max_amount: patch.max_amount.unwrap_or_else(|| self.max_amount.clone()),
        }
    }

    /// The query parameters for `GET /api/expenses`, blank fields omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let category = self
            .category
            .map(|category| category.wire_value().to_owned())
            .unwrap_or_default();

        [
            ("category", category.as_str()),
            ("business_name", self.business_name.as_str()),
            ("start_date", self.start_date.as_str()),
            ("end_date", self.end_date.as_str()),
            ("min_amount", self.min_amount.as_str()),
            ("max_amount", self.max_amount.as_str()),
        ]
        .into_iter()
        .map(|(name, value)| (name, value.trim()))
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name, value.to_owned()))
        .collect()
    }

    /// Whether no field constrains the query.
    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }
}
