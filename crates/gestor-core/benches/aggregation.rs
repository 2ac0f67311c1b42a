use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gestor_core::{AggregationService, ReportKind, ReportService, DEFAULT_URGENCY_THRESHOLD_DAYS};
use gestor_domain::{new_id, AppData, CompanyScope, Contract, Transaction, TransactionKind};

const CATEGORIES: [&str; 6] = [
    "Viagem",
    "Diária Hotel",
    "Manutenção Carro",
    "Salário/Colaborador",
    "Escritório",
    "Outros",
];

fn build_sample_data(txn_count: usize) -> AppData {
    let mut data = AppData::seed();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for idx in 0..txn_count {
        let kind = if idx % 3 == 0 {
            TransactionKind::Revenue
        } else {
            TransactionKind::Expense
        };
        data.transactions.push(Transaction {
            id: new_id(),
            kind,
            category: CATEGORIES[idx % CATEGORIES.len()].to_string(),
            amount: 50.0 + (idx % 100) as f64,
            date: start + Duration::days((idx % 365) as i64),
            description: String::new(),
            company_id: ((idx % 4) + 1).to_string(),
            employee_id: Some(if idx % 2 == 0 { "e1" } else { "e2" }.to_string()),
            contract_id: None,
            created_by: "system".into(),
            created_at: created,
        });
    }

    for idx in 0..200 {
        data.contracts.push(Contract::new(
            "c1",
            ((idx % 4) + 1).to_string(),
            1000.0 + idx as f64,
            start,
            start + Duration::days(30 + idx as i64 * 3),
        ));
    }
    data
}

fn bench_dashboard(c: &mut Criterion) {
    let data = build_sample_data(black_box(10_000));
    let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    c.bench_function("dashboard_all_10k", |b| {
        b.iter(|| {
            let summary = AggregationService::dashboard(
                &data,
                &CompanyScope::All,
                as_of,
                DEFAULT_URGENCY_THRESHOLD_DAYS,
            );
            black_box(summary);
        })
    });

    c.bench_function("dashboard_scoped_10k", |b| {
        b.iter(|| {
            let summary = AggregationService::dashboard(
                &data,
                &CompanyScope::company("2"),
                as_of,
                DEFAULT_URGENCY_THRESHOLD_DAYS,
            );
            black_box(summary);
        })
    });

    c.bench_function("employees_report_10k", |b| {
        b.iter(|| {
            let view = ReportService::build(
                &data,
                ReportKind::Employees,
                &CompanyScope::All,
                as_of,
                DEFAULT_URGENCY_THRESHOLD_DAYS,
            );
            black_box(view);
        })
    });
}

criterion_group!(benches, bench_dashboard);
criterion_main!(benches);
