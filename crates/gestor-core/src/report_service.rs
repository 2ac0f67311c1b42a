//! Narrows the snapshot by company scope and shapes the per-tab report views.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use gestor_domain::{AppData, CompanyScope, Contract, Employee, Transaction};
use serde::Serialize;

use crate::{aggregation_service::AggregationService, CoreError};

/// Report tabs available in the reports view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Financial,
    Contracts,
    Employees,
    Fleet,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Financial,
        ReportKind::Contracts,
        ReportKind::Employees,
        ReportKind::Fleet,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            ReportKind::Financial => "financial",
            ReportKind::Contracts => "contracts",
            ReportKind::Employees => "employees",
            ReportKind::Fleet => "fleet",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Financial => "Financeiro",
            ReportKind::Contracts => "Contratos",
            ReportKind::Employees => "Colaboradores",
            ReportKind::Fleet => "Frota",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == needle)
            .ok_or_else(|| CoreError::InvalidOperation(format!("unknown report `{value}`")))
    }
}

/// A transaction line with its owning company resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialRow {
    pub transaction: Transaction,
    pub company_name: String,
}

/// A contract annotated with its client and expiry window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractStatusRow {
    pub contract: Contract,
    pub client_name: String,
    pub days_remaining: i64,
    pub urgent: bool,
}

/// Sum and number of expenses attributed to one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeExpenseRow {
    pub employee: Employee,
    pub total_expense: f64,
    pub expense_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "lowercase")]
pub enum ReportView {
    Financial(Vec<FinancialRow>),
    Contracts(Vec<ContractStatusRow>),
    Employees(Vec<EmployeeExpenseRow>),
    /// Reserved tab; fleet data is not tracked yet.
    Fleet,
}

impl ReportView {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportView::Financial(_) => ReportKind::Financial,
            ReportView::Contracts(_) => ReportKind::Contracts,
            ReportView::Employees(_) => ReportKind::Employees,
            ReportView::Fleet => ReportKind::Fleet,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ReportView::Financial(rows) => rows.is_empty(),
            ReportView::Contracts(rows) => rows.is_empty(),
            ReportView::Employees(rows) => rows.is_empty(),
            ReportView::Fleet => true,
        }
    }
}

pub struct ReportService;

impl ReportService {
    pub fn scope_transactions<'a>(data: &'a AppData, scope: &CompanyScope) -> Vec<&'a Transaction> {
        data.transactions
            .iter()
            .filter(|txn| scope.includes(&txn.company_id))
            .collect()
    }

    pub fn scope_contracts<'a>(data: &'a AppData, scope: &CompanyScope) -> Vec<&'a Contract> {
        data.contracts
            .iter()
            .filter(|contract| scope.includes(&contract.company_id))
            .collect()
    }

    /// Owned copy of `data` with transactions and contracts narrowed to `scope`.
    /// Reference collections are left whole.
    pub fn scoped(data: &AppData, scope: &CompanyScope) -> AppData {
        if scope.is_all() {
            return data.clone();
        }
        AppData {
            companies: data.companies.clone(),
            clients: data.clients.clone(),
            employees: data.employees.clone(),
            contracts: Self::scope_contracts(data, scope)
                .into_iter()
                .cloned()
                .collect(),
            transactions: Self::scope_transactions(data, scope)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn build(
        data: &AppData,
        kind: ReportKind,
        scope: &CompanyScope,
        as_of: DateTime<Utc>,
        threshold_days: i64,
    ) -> ReportView {
        match kind {
            ReportKind::Financial => ReportView::Financial(
                Self::scope_transactions(data, scope)
                    .into_iter()
                    .map(|txn| FinancialRow {
                        company_name: data.company_name(&txn.company_id).to_string(),
                        transaction: txn.clone(),
                    })
                    .collect(),
            ),
            ReportKind::Contracts => ReportView::Contracts(
                Self::scope_contracts(data, scope)
                    .into_iter()
                    .map(|contract| {
                        let days_remaining =
                            AggregationService::contract_days_remaining(contract, as_of);
                        ContractStatusRow {
                            client_name: data.client_name(&contract.client_id).to_string(),
                            days_remaining,
                            urgent: AggregationService::is_urgent(days_remaining, threshold_days),
                            contract: contract.clone(),
                        }
                    })
                    .collect(),
            ),
            // Employee totals are computed over every company, whatever the scope.
            ReportKind::Employees => ReportView::Employees(
                data.employees
                    .iter()
                    .map(|employee| {
                        let expenses: Vec<&Transaction> = data
                            .transactions
                            .iter()
                            .filter(|txn| {
                                txn.is_expense()
                                    && txn.employee_id.as_deref() == Some(employee.id.as_str())
                            })
                            .collect();
                        EmployeeExpenseRow {
                            total_expense: expenses.iter().map(|txn| txn.amount).sum(),
                            expense_count: expenses.len(),
                            employee: employee.clone(),
                        }
                    })
                    .collect(),
            ),
            ReportKind::Fleet => ReportView::Fleet,
        }
    }
}
