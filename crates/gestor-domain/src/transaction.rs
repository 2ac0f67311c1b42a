//! Domain models for revenue and expense transactions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{Amounted, Displayable, Identifiable, SYSTEM_USER};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Expense label from [`ExpenseCategory`] or free text for revenue.
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub company_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default = "Transaction::default_created_by")]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn default_created_by() -> String {
        SYSTEM_USER.to_string()
    }

    pub fn is_revenue(&self) -> bool {
        self.kind == TransactionKind::Revenue
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the sign implied by the transaction kind.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Revenue => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Parses the category into the fixed expense enumeration, if it matches.
    pub fn expense_category(&self) -> Option<ExpenseCategory> {
        ExpenseCategory::from_label(&self.category)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{} {}]", self.id, self.kind, self.category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Revenue,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Revenue => "Receita",
            TransactionKind::Expense => "Despesa",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "revenue" | "receita" | "r" | "+" => Ok(TransactionKind::Revenue),
            "expense" | "despesa" | "e" | "-" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Fixed set of expense categories offered when recording costs.
pub enum ExpenseCategory {
    #[serde(rename = "Viagem")]
    Travel,
    #[serde(rename = "Diária Hotel")]
    Hotel,
    #[serde(rename = "Manutenção Carro")]
    Maintenance,
    #[serde(rename = "Salário/Colaborador")]
    Salary,
    #[serde(rename = "Escritório")]
    Office,
    #[serde(rename = "Outros")]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Travel,
        ExpenseCategory::Hotel,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Salary,
        ExpenseCategory::Office,
        ExpenseCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Travel => "Viagem",
            ExpenseCategory::Hotel => "Diária Hotel",
            ExpenseCategory::Maintenance => "Manutenção Carro",
            ExpenseCategory::Salary => "Salário/Colaborador",
            ExpenseCategory::Office => "Escritório",
            ExpenseCategory::Other => "Outros",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == label.trim())
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    /// Accepts either the Portuguese label or a short English keyword.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(category) = Self::from_label(value) {
            return Ok(category);
        }
        match value.trim().to_ascii_lowercase().as_str() {
            "travel" | "viagem" => Ok(ExpenseCategory::Travel),
            "hotel" => Ok(ExpenseCategory::Hotel),
            "maintenance" | "car" | "carro" => Ok(ExpenseCategory::Maintenance),
            "salary" | "salario" => Ok(ExpenseCategory::Salary),
            "office" | "escritorio" => Ok(ExpenseCategory::Office),
            "other" | "outros" => Ok(ExpenseCategory::Other),
            other => Err(format!("unknown expense category `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_in_upper_case() {
        let json = serde_json::to_string(&TransactionKind::Revenue).unwrap();
        assert_eq!(json, "\"REVENUE\"");
    }

    #[test]
    fn expense_category_accepts_labels_and_keywords() {
        assert_eq!(
            "Manutenção Carro".parse::<ExpenseCategory>().unwrap(),
            ExpenseCategory::Maintenance
        );
        assert_eq!(
            "hotel".parse::<ExpenseCategory>().unwrap(),
            ExpenseCategory::Hotel
        );
        assert!("Consultoria Extra".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn transaction_parses_exported_json_shape() {
        let raw = r#"{
            "id": "k3j2h1g0f",
            "type": "EXPENSE",
            "category": "Viagem",
            "amount": 350.5,
            "date": "2024-03-10",
            "description": "Combustível",
            "companyId": "2",
            "employeeId": "e2",
            "createdBy": "e1",
            "createdAt": "2024-03-10T14:22:01.123Z"
        }"#;
        let txn: Transaction = serde_json::from_str(raw).unwrap();
        assert!(txn.is_expense());
        assert_eq!(txn.expense_category(), Some(ExpenseCategory::Travel));
        assert_eq!(txn.employee_id.as_deref(), Some("e2"));
        assert_eq!(txn.signed_amount(), -350.5);
    }
}
