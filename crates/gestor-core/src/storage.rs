use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use gestor_domain::AppData;

use crate::CoreError;

/// Key under which the application snapshot is persisted.
pub const STORAGE_KEY: &str = "baiao_gestor_v1";

/// Opaque key-value blob persistence used by the state store.
pub trait BlobStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` when nothing was saved yet.
    fn load(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn save(&self, key: &str, blob: &str) -> Result<(), CoreError>;
}

/// Volatile blob store, useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, blob: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), blob.into());
        }
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|err| CoreError::Storage(err.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| CoreError::Storage(err.to_string()))?;
        entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Detects dangling references within a snapshot. Purely informational.
pub fn snapshot_warnings(data: &AppData) -> Vec<String> {
    let company_ids: HashSet<_> = data.companies.iter().map(|c| c.id.as_str()).collect();
    let client_ids: HashSet<_> = data.clients.iter().map(|c| c.id.as_str()).collect();
    let employee_ids: HashSet<_> = data.employees.iter().map(|e| e.id.as_str()).collect();
    let contract_ids: HashSet<_> = data.contracts.iter().map(|c| c.id.as_str()).collect();
    let mut warnings = Vec::new();

    for txn in &data.transactions {
        if !company_ids.contains(txn.company_id.as_str()) {
            warnings.push(format!(
                "transaction {} references unknown company {}",
                txn.id, txn.company_id
            ));
        }
        if let Some(employee) = txn.employee_id.as_deref() {
            if !employee_ids.contains(employee) {
                warnings.push(format!(
                    "transaction {} references unknown employee {}",
                    txn.id, employee
                ));
            }
        }
        if let Some(contract) = txn.contract_id.as_deref() {
            if !contract_ids.contains(contract) {
                warnings.push(format!(
                    "transaction {} references unknown contract {}",
                    txn.id, contract
                ));
            }
        }
    }

    for contract in &data.contracts {
        if !client_ids.contains(contract.client_id.as_str()) {
            warnings.push(format!(
                "contract {} references unknown client {}",
                contract.id, contract.client_id
            ));
        }
        if !company_ids.contains(contract.company_id.as_str()) {
            warnings.push(format!(
                "contract {} references unknown company {}",
                contract.id, contract.company_id
            ));
        }
        if contract.end_date <= contract.start_date {
            warnings.push(format!(
                "contract {} ends on or before its start date",
                contract.id
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gestor_domain::Contract;

    #[test]
    fn memory_store_round_trips_blobs() {
        let store = MemoryBlobStore::new();
        assert!(store.load(STORAGE_KEY).unwrap().is_none());
        store.save(STORAGE_KEY, "{}").unwrap();
        assert_eq!(store.load(STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn warnings_flag_dangling_contract_references() {
        let mut data = AppData::seed();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        data.contracts
            .push(Contract::new("ghost", "1", 1000.0, start, end));
        let warnings = snapshot_warnings(&data);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unknown client ghost"));
    }

    #[test]
    fn seed_has_no_warnings() {
        assert!(snapshot_warnings(&AppData::seed()).is_empty());
    }
}
