//! The single owner of application state: snapshot, session and persistence.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use gestor_domain::{AppData, Client, CompanyScope, Contract, Employee, Transaction};
use tracing::{debug, info, warn};

use crate::{
    aggregation_service::{AggregationService, DashboardSummary},
    report_service::{ReportKind, ReportService, ReportView},
    storage::{snapshot_warnings, BlobStore, STORAGE_KEY},
    time::Clock,
    transaction_service::{RecordingContext, TransactionDraft, TransactionService},
    CoreError,
};

/// Default length of the "saving" indicator after each write.
pub const DEFAULT_SAVING_INDICATOR_MS: i64 = 800;

/// Input for a new contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDraft {
    pub client_id: String,
    pub company_id: String,
    pub monthly_value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
}

/// Result of an import attempt that parsed successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Replaced,
    Cancelled,
}

pub struct AppStore {
    data: AppData,
    current_user: Option<String>,
    scope: CompanyScope,
    storage: Box<dyn BlobStore>,
    clock: Box<dyn Clock>,
    saving_indicator: Duration,
    last_saved_at: Option<DateTime<Utc>>,
}

impl AppStore {
    /// Loads the persisted snapshot, falling back to the seed dataset when nothing
    /// was saved yet or the stored blob cannot be parsed.
    pub fn open(storage: Box<dyn BlobStore>, clock: Box<dyn Clock>) -> Result<Self, CoreError> {
        let data = match storage.load(STORAGE_KEY)? {
            Some(blob) => match serde_json::from_str::<AppData>(&blob) {
                Ok(data) => {
                    info!(
                        transactions = data.transactions.len(),
                        contracts = data.contracts.len(),
                        "loaded persisted snapshot"
                    );
                    data
                }
                Err(err) => {
                    warn!(error = %err, "stored snapshot is unreadable; starting from seed data");
                    AppData::seed()
                }
            },
            None => {
                info!("no persisted snapshot; starting from seed data");
                AppData::seed()
            }
        };

        Ok(Self {
            data,
            current_user: None,
            scope: CompanyScope::All,
            storage,
            clock,
            saving_indicator: Duration::milliseconds(DEFAULT_SAVING_INDICATOR_MS),
            last_saved_at: None,
        })
    }

    pub fn with_saving_indicator_ms(mut self, millis: u64) -> Self {
        self.saving_indicator = Duration::milliseconds(i64::try_from(millis).unwrap_or(i64::MAX));
        self
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Records a transaction for the active session. Validation rejections are
    /// dropped silently and reported as `Ok(None)`. A failed save removes the
    /// transaction again.
    pub fn add_transaction(
        &mut self,
        draft: TransactionDraft,
    ) -> Result<Option<&Transaction>, CoreError> {
        let context = self.recording_context();
        match TransactionService::build(draft, &context, self.clock.as_ref()) {
            Ok(transaction) => {
                self.data.transactions.insert(0, transaction);
                if let Err(err) = self.persist() {
                    self.data.transactions.remove(0);
                    return Err(err);
                }
                Ok(self.data.transactions.first())
            }
            Err(CoreError::Validation(reason)) => {
                debug!(%reason, "transaction draft rejected");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn add_client(
        &mut self,
        name: impl Into<String>,
        city: impl Into<String>,
    ) -> Result<&Client, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation("client name is required".into()));
        }
        self.data.clients.push(Client::new(name, city));
        if let Err(err) = self.persist() {
            self.data.clients.pop();
            return Err(err);
        }
        self.data
            .clients
            .last()
            .ok_or_else(|| CoreError::InvalidOperation("client was not stored".into()))
    }

    pub fn add_contract(&mut self, draft: ContractDraft) -> Result<&Contract, CoreError> {
        if self.data.client(&draft.client_id).is_none() {
            return Err(CoreError::ClientNotFound(draft.client_id));
        }
        if self.data.company(&draft.company_id).is_none() {
            return Err(CoreError::CompanyNotFound(draft.company_id));
        }
        if !draft.monthly_value.is_finite() || draft.monthly_value < 0.0 {
            return Err(CoreError::Validation(format!(
                "invalid monthly value `{}`",
                draft.monthly_value
            )));
        }

        let contract = Contract::new(
            draft.client_id,
            draft.company_id,
            draft.monthly_value,
            draft.start_date,
            draft.end_date,
        )
        .with_description(draft.description);
        self.data.contracts.push(contract);
        if let Err(err) = self.persist() {
            self.data.contracts.pop();
            return Err(err);
        }
        self.data
            .contracts
            .last()
            .ok_or_else(|| CoreError::InvalidOperation("contract was not stored".into()))
    }

    /// Swaps the whole snapshot and persists it. When the save fails the
    /// previous snapshot and scope are restored.
    pub fn replace(&mut self, data: AppData) -> Result<(), CoreError> {
        let previous = std::mem::replace(&mut self.data, data);
        let previous_scope = self.scope.clone();
        if let Some(id) = self.scope.company_id() {
            if self.data.company(id).is_none() {
                self.scope = CompanyScope::All;
            }
        }
        if let Err(err) = self.persist() {
            warn!(error = %err, "snapshot not saved; restoring previous state");
            self.data = previous;
            self.scope = previous_scope;
            return Err(err);
        }
        Ok(())
    }

    /// True while the last write is still within the saving indicator window.
    pub fn is_saving(&self, now: DateTime<Utc>) -> bool {
        self.last_saved_at
            .map(|saved| now >= saved && now - saved < self.saving_indicator)
            .unwrap_or(false)
    }

    pub fn login(&mut self, employee_id: &str) -> Result<&Employee, CoreError> {
        let employee = self
            .data
            .employee(employee_id)
            .ok_or_else(|| CoreError::EmployeeNotFound(employee_id.to_string()))?;
        self.current_user = Some(employee.id.clone());
        info!(user = %employee.id, "session started");
        Ok(employee)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            info!(%user, "session ended");
        }
    }

    pub fn current_user(&self) -> Option<&Employee> {
        self.current_user
            .as_deref()
            .and_then(|id| self.data.employee(id))
    }

    pub fn set_scope(&mut self, scope: CompanyScope) -> Result<(), CoreError> {
        if let Some(id) = scope.company_id() {
            if self.data.company(id).is_none() {
                return Err(CoreError::CompanyNotFound(id.to_string()));
            }
        }
        self.scope = scope;
        Ok(())
    }

    pub fn scope(&self) -> &CompanyScope {
        &self.scope
    }

    pub fn dashboard(&self, threshold_days: i64) -> DashboardSummary {
        AggregationService::dashboard(&self.data, &self.scope, self.clock.now(), threshold_days)
    }

    pub fn report(&self, kind: ReportKind, scope: &CompanyScope, threshold_days: i64) -> ReportView {
        ReportService::build(&self.data, kind, scope, self.clock.now(), threshold_days)
    }

    /// Pretty-printed snapshot, two-space indented.
    pub fn export_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn export_file_name(date: NaiveDate) -> String {
        format!("backup_financeiro_{}.json", date.format("%Y-%m-%d"))
    }

    /// Parses `raw` and, once `confirm` agrees, replaces the whole state with it.
    /// A parse failure leaves the current state untouched.
    pub fn import_json<F>(&mut self, raw: &str, confirm: F) -> Result<ImportOutcome, CoreError>
    where
        F: FnOnce() -> bool,
    {
        let imported: AppData =
            serde_json::from_str(raw).map_err(|err| CoreError::Import(err.to_string()))?;
        if !confirm() {
            info!("import cancelled");
            return Ok(ImportOutcome::Cancelled);
        }
        info!(
            transactions = imported.transactions.len(),
            contracts = imported.contracts.len(),
            "snapshot imported"
        );
        self.replace(imported)?;
        Ok(ImportOutcome::Replaced)
    }

    pub fn warnings(&self) -> Vec<String> {
        snapshot_warnings(&self.data)
    }

    fn recording_context(&self) -> RecordingContext {
        RecordingContext {
            active_user: self.current_user.clone(),
            scope: self.scope.clone(),
        }
    }

    fn persist(&mut self) -> Result<(), CoreError> {
        let blob = serde_json::to_string(&self.data)?;
        self.storage.save(STORAGE_KEY, &blob)?;
        self.last_saved_at = Some(self.clock.now());
        debug!(bytes = blob.len(), "snapshot persisted");
        Ok(())
    }
}
