use chrono::{NaiveDate, TimeZone, Utc};
use gestor_core::{
    storage::STORAGE_KEY, AppStore, BlobStore, FixedClock, ImportOutcome, TransactionDraft,
};
use gestor_domain::{AppData, TransactionKind};
use gestor_storage_json::{list_exports, read_import, write_export, JsonBlobStore};
use std::fs;
use tempfile::tempdir;

fn clock() -> Box<FixedClock> {
    Box::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()))
}

#[test]
fn blob_store_reports_missing_key_as_none() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonBlobStore::new(dir.path().join("data")).expect("create storage");
    assert!(storage.load(STORAGE_KEY).expect("load").is_none());
}

#[test]
fn blob_store_saves_atomically_and_reloads() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonBlobStore::new(dir.path().to_path_buf()).expect("create storage");

    storage.save(STORAGE_KEY, "{\"companies\":[]}").expect("save");
    let path = storage.blob_path(STORAGE_KEY);
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(
        storage.load(STORAGE_KEY).expect("load").as_deref(),
        Some("{\"companies\":[]}")
    );
}

#[test]
fn store_state_survives_process_restart() {
    let dir = tempdir().expect("tempdir");
    {
        let storage = JsonBlobStore::new(dir.path().to_path_buf()).expect("create storage");
        let mut store = AppStore::open(Box::new(storage), clock()).expect("open");
        store.login("e1").expect("login");
        store
            .add_transaction(TransactionDraft::new(
                TransactionKind::Expense,
                "Diária Hotel",
                Some(480.0),
                NaiveDate::from_ymd_opt(2024, 5, 28).unwrap(),
                "3",
            ))
            .expect("record");
    }

    let storage = JsonBlobStore::new(dir.path().to_path_buf()).expect("create storage");
    let store = AppStore::open(Box::new(storage), clock()).expect("reopen");
    assert_eq!(store.data().transactions.len(), 1);
    assert_eq!(store.data().transactions[0].category, "Diária Hotel");
}

#[test]
fn corrupt_file_on_disk_falls_back_to_seed() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonBlobStore::new(dir.path().to_path_buf()).expect("create storage");
    fs::write(storage.blob_path(STORAGE_KEY), "[[[").expect("write garbage");

    let store = AppStore::open(Box::new(storage), clock()).expect("open");
    assert_eq!(store.data(), &AppData::seed());
}

#[test]
fn export_file_imports_back_into_a_fresh_store() {
    let dir = tempdir().expect("tempdir");
    let exports = dir.path().join("exports");

    let source = JsonBlobStore::new(dir.path().join("a")).expect("storage a");
    let mut original = AppStore::open(Box::new(source), clock()).expect("open a");
    original
        .add_client("Prefeitura de Santos", "Santos - SP")
        .expect("client");
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let path = write_export(&exports, &original.export_json().expect("export"), date)
        .expect("write export");
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("backup_financeiro_2024-06-01.json")
    );
    assert_eq!(list_exports(&exports).expect("list"), vec![path.clone()]);

    let target = JsonBlobStore::new(dir.path().join("b")).expect("storage b");
    let mut restored = AppStore::open(Box::new(target), clock()).expect("open b");
    let raw = read_import(&path).expect("read");
    let outcome = restored.import_json(&raw, || true).expect("import");
    assert_eq!(outcome, ImportOutcome::Replaced);
    assert_eq!(restored.data(), original.data());
}

#[test]
fn missing_import_file_is_an_import_error() {
    let dir = tempdir().expect("tempdir");
    let err = read_import(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}
