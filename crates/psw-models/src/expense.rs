//! Expense model

use std::fmt;

use psw_core::traits::{Entity, Id, Identifiable, Patch};
use psw_core::types::generate_id;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExpenseCategory {
    #[default]
    Travel,
    Meals,
    Software,
    #[serde(rename = "Professional Fees")]
    ProfessionalFees,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Travel,
        ExpenseCategory::Meals,
        ExpenseCategory::Software,
        ExpenseCategory::ProfessionalFees,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Travel => "Travel",
            Self::Meals => "Meals",
            Self::Software => "Software",
            Self::ProfessionalFees => "Professional Fees",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project expense
///
/// Every expense is a cost; only billable ones are also revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Id,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub is_billable: bool,
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Expense {
    const TYPE_NAME: &'static str = "Expense";
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewExpense {
    pub category: ExpenseCategory,
    pub description: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub amount: f64,
    pub is_billable: bool,
}

impl Default for NewExpense {
    fn default() -> Self {
        Self {
            category: ExpenseCategory::Travel,
            description: String::new(),
            amount: 0.0,
            is_billable: true,
        }
    }
}

impl From<NewExpense> for Expense {
    fn from(new: NewExpense) -> Self {
        Self {
            id: generate_id(),
            category: new.category,
            description: new.description,
            amount: new.amount,
            is_billable: new.is_billable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    pub category: Option<ExpenseCategory>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub amount: Option<f64>,
    pub is_billable: Option<bool>,
}

impl Patch<Expense> for ExpensePatch {
    fn apply_to(&self, expense: &mut Expense) {
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(ref description) = self.description {
            expense.description = description.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(billable) = self.is_billable {
            expense.is_billable = billable;
        }
    }

    fn is_empty(&self) -> bool {
        *self == ExpensePatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ExpenseCategory::ProfessionalFees).unwrap();
        assert_eq!(json, "\"Professional Fees\"");
        assert_eq!(ExpenseCategory::ALL.len(), 5);
    }

    #[test]
    fn test_new_expense_is_billable_travel() {
        let expense: Expense = NewExpense::default().into();
        assert_eq!(expense.category, ExpenseCategory::Travel);
        assert!(expense.is_billable);
    }

    #[test]
    fn test_patch() {
        let mut expense: Expense = NewExpense {
            amount: 1500.0,
            ..Default::default()
        }
        .into();
        let patch = ExpensePatch {
            is_billable: Some(false),
            ..Default::default()
        };
        patch.apply_to(&mut expense);
        assert!(!expense.is_billable);
        assert_eq!(expense.amount, 1500.0);

        let bad = ExpensePatch {
            amount: Some(-5.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
