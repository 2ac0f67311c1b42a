//! Aggregation helpers turning raw transactions and contracts into consolidated metrics.
//!
//! Every function here is pure: the same snapshot always yields the same figures and
//! empty inputs produce zero sums or empty collections instead of errors.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use gestor_domain::{AppData, Company, CompanyScope, Contract, Transaction, TransactionKind};
use serde::Serialize;

use crate::report_service::ReportService;

/// Contracts ending within this many days are flagged as urgent.
pub const DEFAULT_URGENCY_THRESHOLD_DAYS: i64 = 90;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Summed expense amount for a single category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Revenue and expense attributed to one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyComparison {
    pub company_id: String,
    pub name: String,
    pub revenue: f64,
    pub expense: f64,
}

impl CompanyComparison {
    pub fn result(&self) -> f64 {
        self.revenue - self.expense
    }
}

/// All headline figures of the consolidated dashboard for one scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub scope: CompanyScope,
    pub total_revenue: f64,
    pub total_expense: f64,
    pub recurring_revenue: f64,
    pub active_recurring_revenue: f64,
    pub net_result: f64,
    pub expense_by_category: Vec<CategoryTotal>,
    pub company_comparison: Vec<CompanyComparison>,
    pub urgent_contracts: usize,
}

pub struct AggregationService;

impl AggregationService {
    pub fn total_revenue(transactions: &[Transaction]) -> f64 {
        sum_kind(transactions, TransactionKind::Revenue)
    }

    pub fn total_expense(transactions: &[Transaction]) -> f64 {
        sum_kind(transactions, TransactionKind::Expense)
    }

    /// Monthly value of every contract, regardless of its validity window.
    pub fn recurring_revenue(contracts: &[Contract]) -> f64 {
        contracts.iter().map(|contract| contract.monthly_value).sum()
    }

    /// Monthly value of the contracts whose validity window contains `date`.
    pub fn recurring_revenue_active_on(contracts: &[Contract], date: NaiveDate) -> f64 {
        contracts
            .iter()
            .filter(|contract| contract.is_active_on(date))
            .map(|contract| contract.monthly_value)
            .sum()
    }

    pub fn net_result(transactions: &[Transaction], contracts: &[Contract]) -> f64 {
        Self::total_revenue(transactions) + Self::recurring_revenue(contracts)
            - Self::total_expense(transactions)
    }

    /// Expense totals keyed by category, in first-seen order.
    pub fn expense_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for txn in transactions.iter().filter(|txn| txn.is_expense()) {
            match totals.iter_mut().find(|entry| entry.category == txn.category) {
                Some(entry) => entry.amount += txn.amount,
                None => totals.push(CategoryTotal {
                    category: txn.category.clone(),
                    amount: txn.amount,
                }),
            }
        }
        totals
    }

    /// One row per company in declared order; companies without records report zero.
    pub fn per_company_comparison(
        companies: &[Company],
        transactions: &[Transaction],
        contracts: &[Contract],
    ) -> Vec<CompanyComparison> {
        companies
            .iter()
            .map(|company| {
                let direct_revenue: f64 = transactions
                    .iter()
                    .filter(|txn| txn.company_id == company.id && txn.is_revenue())
                    .map(|txn| txn.amount)
                    .sum();
                let contract_revenue: f64 = contracts
                    .iter()
                    .filter(|contract| contract.company_id == company.id)
                    .map(|contract| contract.monthly_value)
                    .sum();
                let expense: f64 = transactions
                    .iter()
                    .filter(|txn| txn.company_id == company.id && txn.is_expense())
                    .map(|txn| txn.amount)
                    .sum();
                CompanyComparison {
                    company_id: company.id.clone(),
                    name: company.name.clone(),
                    revenue: direct_revenue + contract_revenue,
                    expense,
                }
            })
            .collect()
    }

    /// Whole days from `as_of` until the contract's end date (midnight UTC), rounded up.
    /// Negative for expired contracts.
    pub fn contract_days_remaining(contract: &Contract, as_of: DateTime<Utc>) -> i64 {
        let end = DateTime::<Utc>::from_naive_utc_and_offset(
            contract.end_date.and_time(NaiveTime::MIN),
            Utc,
        );
        let millis = (end - as_of).num_milliseconds();
        let days = millis.div_euclid(MILLIS_PER_DAY);
        if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
            days
        } else {
            days + 1
        }
    }

    pub fn is_urgent(days_remaining: i64, threshold_days: i64) -> bool {
        days_remaining < threshold_days
    }

    /// Computes the dashboard for `scope`. Only transactions are narrowed to the
    /// scope; contracts always count in full, so recurring revenue and each
    /// company's contract income stay visible under any filter.
    pub fn dashboard(
        data: &AppData,
        scope: &CompanyScope,
        as_of: DateTime<Utc>,
        threshold_days: i64,
    ) -> DashboardSummary {
        let scoped: Vec<Transaction> = ReportService::scope_transactions(data, scope)
            .into_iter()
            .cloned()
            .collect();
        let transactions = scoped.as_slice();
        let contracts = &data.contracts;
        let urgent_contracts = contracts
            .iter()
            .filter(|contract| {
                Self::is_urgent(
                    Self::contract_days_remaining(contract, as_of),
                    threshold_days,
                )
            })
            .count();

        DashboardSummary {
            scope: scope.clone(),
            total_revenue: Self::total_revenue(transactions),
            total_expense: Self::total_expense(transactions),
            recurring_revenue: Self::recurring_revenue(contracts),
            active_recurring_revenue: Self::recurring_revenue_active_on(
                contracts,
                as_of.date_naive(),
            ),
            net_result: Self::net_result(transactions, contracts),
            expense_by_category: Self::expense_by_category(transactions),
            company_comparison: Self::per_company_comparison(
                &data.companies,
                transactions,
                contracts,
            ),
            urgent_contracts,
        }
    }
}

fn sum_kind(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|txn| txn.kind == kind)
        .map(|txn| txn.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(kind: TransactionKind, category: &str, amount: f64, company: &str) -> Transaction {
        Transaction {
            id: gestor_domain::new_id(),
            kind,
            category: category.into(),
            amount,
            date: date(2024, 5, 1),
            description: String::new(),
            company_id: company.into(),
            employee_id: None,
            contract_id: None,
            created_by: "e1".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_inputs_yield_zero_and_empty() {
        assert_eq!(AggregationService::total_revenue(&[]), 0.0);
        assert_eq!(AggregationService::total_expense(&[]), 0.0);
        assert_eq!(AggregationService::recurring_revenue(&[]), 0.0);
        assert_eq!(AggregationService::net_result(&[], &[]), 0.0);
        assert!(AggregationService::expense_by_category(&[]).is_empty());
        assert!(AggregationService::per_company_comparison(&[], &[], &[]).is_empty());
    }

    #[test]
    fn contract_only_counts_as_recurring_revenue() {
        let contract = Contract::new("c1", "1", 5000.0, date(2024, 1, 1), date(2024, 12, 31));
        let contracts = vec![contract];
        assert_eq!(AggregationService::recurring_revenue(&contracts), 5000.0);
        assert_eq!(AggregationService::total_revenue(&[]), 0.0);
        assert_eq!(AggregationService::net_result(&[], &contracts), 5000.0);
    }

    #[test]
    fn expired_contracts_still_count_unless_filtered_by_date() {
        let contracts = vec![
            Contract::new("c1", "1", 1000.0, date(2020, 1, 1), date(2020, 12, 31)),
            Contract::new("c1", "1", 2000.0, date(2024, 1, 1), date(2024, 12, 31)),
        ];
        assert_eq!(AggregationService::recurring_revenue(&contracts), 3000.0);
        assert_eq!(
            AggregationService::recurring_revenue_active_on(&contracts, date(2024, 6, 1)),
            2000.0
        );
    }

    #[test]
    fn revenue_and_expense_net_out_per_company() {
        let transactions = vec![
            txn(TransactionKind::Revenue, "Consultoria Extra", 1000.0, "1"),
            txn(TransactionKind::Expense, "Viagem", 400.0, "1"),
        ];
        assert_eq!(AggregationService::net_result(&transactions, &[]), 600.0);

        let companies = gestor_domain::AppData::seed().companies;
        let rows = AggregationService::per_company_comparison(&companies, &transactions, &[]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].revenue, 1000.0);
        assert_eq!(rows[0].expense, 400.0);
        assert_eq!(rows[0].result(), 600.0);
        assert!(rows[1..]
            .iter()
            .all(|row| row.revenue == 0.0 && row.expense == 0.0));
    }

    #[test]
    fn expense_categories_keep_first_seen_order() {
        let transactions = vec![
            txn(TransactionKind::Expense, "Diária Hotel", 200.0, "1"),
            txn(TransactionKind::Revenue, "Consultoria", 900.0, "1"),
            txn(TransactionKind::Expense, "Viagem", 100.0, "2"),
            txn(TransactionKind::Expense, "Diária Hotel", 50.0, "3"),
            txn(TransactionKind::Expense, "Pedágio", 10.0, "3"),
        ];
        let totals = AggregationService::expense_by_category(&transactions);
        let labels: Vec<_> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(labels, vec!["Diária Hotel", "Viagem", "Pedágio"]);
        assert_eq!(totals[0].amount, 250.0);
    }

    #[test]
    fn days_remaining_rounds_up_and_goes_negative() {
        let contract = Contract::new("c1", "1", 1.0, date(2024, 1, 1), date(2024, 3, 31));
        let morning = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(AggregationService::contract_days_remaining(&contract, morning), 30);

        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(AggregationService::contract_days_remaining(&contract, midnight), 30);

        let later = Utc.with_ymd_and_hms(2024, 4, 10, 10, 0, 0).unwrap();
        assert_eq!(AggregationService::contract_days_remaining(&contract, later), -10);
    }

    #[test]
    fn contract_expiring_in_thirty_days_is_urgent() {
        let now = Utc::now();
        let end = (now + Duration::days(30)).date_naive();
        let contract = Contract::new("c1", "1", 1.0, now.date_naive(), end);
        let days = AggregationService::contract_days_remaining(&contract, now);
        assert!((29..=30).contains(&days), "unexpected days remaining: {days}");
        assert!(AggregationService::is_urgent(
            days,
            DEFAULT_URGENCY_THRESHOLD_DAYS
        ));
        assert!(!AggregationService::is_urgent(90, DEFAULT_URGENCY_THRESHOLD_DAYS));
    }

    #[test]
    fn dashboard_scopes_transactions_only() {
        let mut data = gestor_domain::AppData::seed();
        data.transactions = vec![
            txn(TransactionKind::Revenue, "Consultoria", 1000.0, "1"),
            txn(TransactionKind::Expense, "Viagem", 300.0, "2"),
        ];
        data.contracts = vec![Contract::new(
            "c1",
            "2",
            5000.0,
            date(2024, 1, 1),
            date(2024, 12, 31),
        )];
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let all = AggregationService::dashboard(&data, &CompanyScope::All, as_of, 90);
        assert_eq!(all.net_result, 5700.0);
        assert_eq!(all.company_comparison.len(), 4);

        let beta = AggregationService::dashboard(&data, &CompanyScope::company("2"), as_of, 90);
        assert_eq!(beta.total_revenue, 0.0);
        assert_eq!(beta.total_expense, 300.0);
        assert_eq!(beta.recurring_revenue, 5000.0);
        assert_eq!(beta.active_recurring_revenue, 5000.0);
        assert_eq!(beta.net_result, 4700.0);
        assert_eq!(beta.company_comparison[0].revenue, 0.0);
        assert_eq!(beta.urgent_contracts, 0);
    }

    #[test]
    fn dashboard_keeps_other_company_contracts_under_a_filter() {
        let mut data = gestor_domain::AppData::seed();
        data.transactions = vec![txn(TransactionKind::Revenue, "Consultoria", 1000.0, "1")];
        data.contracts = vec![Contract::new(
            "c1",
            "1",
            5000.0,
            date(2024, 1, 1),
            date(2024, 6, 20),
        )];
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let beta = AggregationService::dashboard(&data, &CompanyScope::company("2"), as_of, 90);
        assert_eq!(beta.total_revenue, 0.0);
        assert_eq!(beta.recurring_revenue, 5000.0);
        assert_eq!(beta.net_result, 5000.0);
        assert_eq!(beta.urgent_contracts, 1);
        assert_eq!(beta.company_comparison[0].company_id, "1");
        assert_eq!(beta.company_comparison[0].revenue, 5000.0);
        assert_eq!(beta.company_comparison[1].revenue, 0.0);
    }
}
