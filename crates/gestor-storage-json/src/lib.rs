use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use gestor_core::{AppStore, BlobStore, CoreError};
use tracing::debug;

const BLOB_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const EXPORT_PREFIX: &str = "backup_financeiro_";

/// Filesystem-backed blob store keeping one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct JsonBlobStore {
    root: PathBuf,
}

impl JsonBlobStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), BLOB_EXTENSION))
    }
}

impl BlobStore for JsonBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        match fs::read_to_string(self.blob_path(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), CoreError> {
        let path = self.blob_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, blob)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "blob saved");
        Ok(())
    }
}

/// Writes an export file named after `date` into `dir` and returns its path.
pub fn write_export(dir: &Path, contents: &str, date: NaiveDate) -> Result<PathBuf, CoreError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(AppStore::export_file_name(date));
    let tmp = tmp_path(&path);
    write_atomic(&tmp, contents)?;
    fs::rename(&tmp, &path)?;
    Ok(path)
}

/// Reads an import file verbatim; parsing happens in the store.
pub fn read_import(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|err| {
        CoreError::Import(format!("cannot read `{}`: {}", path.display(), err))
    })
}

/// Export files found in `dir`, newest name first.
pub fn list_exports(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some(BLOB_EXTENSION) {
            continue;
        }
        let is_export = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(EXPORT_PREFIX))
            .unwrap_or(false);
        if is_export {
            files.push(path);
        }
    }
    files.sort();
    files.reverse();
    Ok(files)
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "snapshot".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_sanitized_for_file_names() {
        assert_eq!(canonical_key("baiao_gestor_v1"), "baiao_gestor_v1");
        assert_eq!(canonical_key("../Etc"), "___etc");
        assert_eq!(canonical_key("  "), "snapshot");
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/baiao_gestor_v1.json"));
        assert_eq!(tmp, PathBuf::from("/data/baiao_gestor_v1.json.tmp"));
    }
}
