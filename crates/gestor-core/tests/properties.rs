use chrono::{NaiveDate, TimeZone, Utc};
use gestor_core::{AggregationService, AppStore, FixedClock, MemoryBlobStore, TransactionDraft};
use gestor_domain::{new_id, AppData, Company, Contract, Transaction, TransactionKind};
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

fn company_ids() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["1", "2", "3", "4"]).prop_map(str::to_string)
}

fn categories() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Viagem",
        "Diária Hotel",
        "Manutenção Carro",
        "Salário/Colaborador",
        "Escritório",
        "Outros",
    ])
    .prop_map(str::to_string)
}

/// Amounts in whole cents keep float sums well within tolerance.
fn amounts() -> impl Strategy<Value = f64> {
    (1i64..10_000_000i64).prop_map(|cents| cents as f64 / 100.0)
}

/// Any finite positive double, including ones that need all 17 digits.
fn exact_amounts() -> impl Strategy<Value = f64> {
    prop::num::f64::POSITIVE | prop::num::f64::NORMAL
}

fn kinds() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::Revenue), Just(TransactionKind::Expense)]
}

fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (kinds(), categories(), amounts(), company_ids()).prop_map(|(kind, category, amount, company)| {
        Transaction {
            id: new_id(),
            kind,
            category,
            amount,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            description: String::new(),
            company_id: company,
            employee_id: None,
            contract_id: None,
            created_by: "system".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        }
    })
}

fn contract_strategy() -> impl Strategy<Value = Contract> {
    (company_ids(), amounts()).prop_map(|(company, monthly)| {
        Contract::new(
            "c1",
            company,
            monthly,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
    })
}

fn companies() -> Vec<Company> {
    AppData::seed().companies
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn revenue_and_expense_partition_all_amounts(
        transactions in prop::collection::vec(transaction_strategy(), 0..64),
    ) {
        let total: f64 = transactions.iter().map(|txn| txn.amount.abs()).sum();
        let split = AggregationService::total_revenue(&transactions)
            + AggregationService::total_expense(&transactions);
        prop_assert!(close(split, total), "{split} != {total}");
    }

    #[test]
    fn net_result_moves_by_exactly_the_added_amount(
        transactions in prop::collection::vec(transaction_strategy(), 0..32),
        contracts in prop::collection::vec(contract_strategy(), 0..8),
        extra in transaction_strategy(),
    ) {
        let before = AggregationService::net_result(&transactions, &contracts);
        let mut grown = transactions.clone();
        grown.insert(0, extra.clone());
        let after = AggregationService::net_result(&grown, &contracts);
        let expected = before + extra.signed_amount();
        prop_assert!(close(after, expected), "{after} != {expected}");
    }

    #[test]
    fn category_breakdown_covers_expenses_exactly(
        transactions in prop::collection::vec(transaction_strategy(), 0..64),
    ) {
        let breakdown = AggregationService::expense_by_category(&transactions);
        let mut expected: Vec<&str> = Vec::new();
        for txn in transactions.iter().filter(|txn| txn.is_expense()) {
            if !expected.contains(&txn.category.as_str()) {
                expected.push(&txn.category);
            }
        }
        let keys: Vec<&str> = breakdown.iter().map(|entry| entry.category.as_str()).collect();
        prop_assert_eq!(keys, expected);

        let sum: f64 = breakdown.iter().map(|entry| entry.amount).sum();
        prop_assert!(close(sum, AggregationService::total_expense(&transactions)));
    }

    #[test]
    fn per_company_rows_add_up_to_global_totals(
        transactions in prop::collection::vec(transaction_strategy(), 0..64),
        contracts in prop::collection::vec(contract_strategy(), 0..8),
    ) {
        let rows = AggregationService::per_company_comparison(&companies(), &transactions, &contracts);
        let revenue: f64 = rows.iter().map(|row| row.revenue).sum();
        let expense: f64 = rows.iter().map(|row| row.expense).sum();

        let expected_revenue = AggregationService::total_revenue(&transactions)
            + AggregationService::recurring_revenue(&contracts);
        prop_assert!(close(revenue, expected_revenue));
        prop_assert!(close(expense, AggregationService::total_expense(&transactions)));
    }

    #[test]
    fn export_import_round_trip_is_identity(
        drafts in prop::collection::vec((kinds(), categories(), exact_amounts(), company_ids()), 0..16),
    ) {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
        let mut store = AppStore::open(Box::new(MemoryBlobStore::new()), Box::new(clock))
            .expect("open store");
        for (kind, category, amount, company) in drafts {
            let draft = TransactionDraft::new(
                kind,
                category,
                Some(amount),
                NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
                company,
            );
            store.add_transaction(draft).expect("record");
        }

        let before = store.data().clone();
        let exported = store.export_json().expect("export");
        store.import_json(&exported, || true).expect("import");
        prop_assert_eq!(store.data(), &before);
    }
}
