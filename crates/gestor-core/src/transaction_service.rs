//! Business logic for recording new transactions.

use chrono::NaiveDate;
use gestor_domain::{new_id, AppData, CompanyScope, Transaction, TransactionKind, SYSTEM_USER};

use crate::{time::Clock, CoreError};

/// Partial user input collected before a transaction is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Option<f64>,
    pub date: NaiveDate,
    pub description: String,
    pub company_id: String,
    pub employee_id: Option<String>,
    pub contract_id: Option<String>,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Option<f64>,
        date: NaiveDate,
        company_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            date,
            description: String::new(),
            company_id: company_id.into(),
            employee_id: None,
            contract_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    pub fn with_contract(mut self, contract_id: impl Into<String>) -> Self {
        self.contract_id = Some(contract_id.into());
        self
    }
}

/// Session facts stamped onto every recorded transaction.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    pub active_user: Option<String>,
    pub scope: CompanyScope,
}

/// Validates drafts and commits them newest-first.
pub struct TransactionService;

impl TransactionService {
    /// Builds a well-formed transaction from `draft`, attaching the audit fields.
    ///
    /// An active company scope overrides the draft's own company.
    pub fn build(
        draft: TransactionDraft,
        context: &RecordingContext,
        clock: &dyn Clock,
    ) -> Result<Transaction, CoreError> {
        let amount = match draft.amount {
            Some(value) if value.is_finite() && value != 0.0 => value.abs(),
            Some(value) => {
                return Err(CoreError::Validation(format!("invalid amount `{value}`")))
            }
            None => return Err(CoreError::Validation("amount is required".into())),
        };

        let company_id = match context.scope.company_id() {
            Some(scoped) => scoped.to_string(),
            None => draft.company_id.trim().to_string(),
        };
        if company_id.is_empty() {
            return Err(CoreError::Validation("company is required".into()));
        }

        let created_by = context
            .active_user
            .clone()
            .filter(|user| !user.trim().is_empty())
            .unwrap_or_else(|| SYSTEM_USER.to_string());

        Ok(Transaction {
            id: new_id(),
            kind: draft.kind,
            category: draft.category,
            amount,
            date: draft.date,
            description: draft.description,
            company_id,
            employee_id: non_empty(draft.employee_id),
            contract_id: non_empty(draft.contract_id),
            created_by,
            created_at: clock.now(),
        })
    }

    /// Builds and prepends the transaction, returning a reference to the stored record.
    pub fn record<'a>(
        data: &'a mut AppData,
        draft: TransactionDraft,
        context: &RecordingContext,
        clock: &dyn Clock,
    ) -> Result<&'a Transaction, CoreError> {
        let transaction = Self::build(draft, context, clock)?;
        data.transactions.insert(0, transaction);
        Ok(&data.transactions[0])
    }

    /// Most recent `limit` transactions inside `scope`, as stored.
    pub fn recent<'a>(
        data: &'a AppData,
        scope: &CompanyScope,
        limit: usize,
    ) -> Vec<&'a Transaction> {
        data.transactions
            .iter()
            .filter(|txn| scope.includes(&txn.company_id))
            .take(limit)
            .collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap())
    }

    fn draft(amount: Option<f64>, company: &str) -> TransactionDraft {
        TransactionDraft::new(
            TransactionKind::Expense,
            "Viagem",
            amount,
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            company,
        )
    }

    #[test]
    fn rejects_missing_or_non_numeric_amount() {
        let ctx = RecordingContext::default();
        for amount in [None, Some(f64::NAN), Some(f64::INFINITY), Some(0.0)] {
            let err = TransactionService::build(draft(amount, "1"), &ctx, &clock())
                .expect_err("draft must be rejected");
            assert!(matches!(err, CoreError::Validation(_)), "unexpected: {err:?}");
        }
    }

    #[test]
    fn rejects_empty_company_when_scope_is_all() {
        let ctx = RecordingContext::default();
        let err = TransactionService::build(draft(Some(10.0), "  "), &ctx, &clock())
            .expect_err("company is required");
        assert!(matches!(err, CoreError::Validation(ref m) if m.contains("company")));
    }

    #[test]
    fn active_scope_overrides_draft_company() {
        let ctx = RecordingContext {
            active_user: Some("e2".into()),
            scope: CompanyScope::company("3"),
        };
        let txn = TransactionService::build(draft(Some(120.0), "1"), &ctx, &clock()).unwrap();
        assert_eq!(txn.company_id, "3");
        assert_eq!(txn.created_by, "e2");
        assert_eq!(txn.created_at, clock().0);
    }

    #[test]
    fn missing_user_is_stamped_as_system() {
        let ctx = RecordingContext::default();
        let txn = TransactionService::build(
            draft(Some(-45.0), "1").with_employee(""),
            &ctx,
            &clock(),
        )
        .unwrap();
        assert_eq!(txn.created_by, SYSTEM_USER);
        assert_eq!(txn.amount, 45.0);
        assert!(txn.employee_id.is_none());
    }

    #[test]
    fn record_prepends_without_resorting_by_date() {
        let mut data = AppData::seed();
        let ctx = RecordingContext::default();
        let first = draft(Some(10.0), "1");
        let mut older = draft(Some(20.0), "1");
        older.date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        TransactionService::record(&mut data, first, &ctx, &clock()).unwrap();
        let id = TransactionService::record(&mut data, older, &ctx, &clock())
            .unwrap()
            .id
            .clone();

        assert_eq!(data.transactions.len(), 2);
        assert_eq!(data.transactions[0].id, id);
        assert_eq!(data.transactions[0].amount, 20.0);
    }

    #[test]
    fn rejected_draft_leaves_data_untouched() {
        let mut data = AppData::seed();
        let before = data.clone();
        let result =
            TransactionService::record(&mut data, draft(None, "1"), &Default::default(), &clock());
        assert!(result.is_err());
        assert_eq!(data, before);
    }

    #[test]
    fn recent_filters_by_scope_and_limits() {
        let mut data = AppData::seed();
        let ctx = RecordingContext::default();
        for company in ["1", "2", "1", "1"] {
            TransactionService::record(&mut data, draft(Some(1.0), company), &ctx, &clock())
                .unwrap();
        }
        assert_eq!(
            TransactionService::recent(&data, &CompanyScope::company("1"), 2).len(),
            2
        );
        assert_eq!(
            TransactionService::recent(&data, &CompanyScope::company("2"), 15).len(),
            1
        );
        assert_eq!(TransactionService::recent(&data, &CompanyScope::All, 15).len(), 4);
    }
}
