//! JSON file form store.
//!
//! Each form lives in `<dir>/<id>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{FormError, Result};
use crate::id::{IdGenerator, UuidGenerator};
use crate::model::{FormConfig, FormPatch};
use crate::persistence::FormStore;

/// Summary of one stored form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredForm {
    pub id: String,
    pub name: String,
    pub elements: usize,
    pub modified_at: DateTime<Utc>,
}

pub struct JsonFileStore {
    dir: PathBuf,
    ids: Box<dyn IdGenerator>,
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore").field("dir", &self.dir).finish()
    }
}

impl JsonFileStore {
    /// A store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ids: Box::new(UuidGenerator),
        }
    }

    /// Replace the generator that assigns ids to created forms.
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every stored form, ordered by id.
    pub fn list(&self) -> Result<Vec<StoredForm>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut forms = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let form = match read_form(path) {
                Ok(form) => form,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable form file");
                    continue;
                }
            };
            let modified_at = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(Utc::now);

            forms.push(StoredForm {
                id: form.id,
                name: form.name,
                elements: form.elements.len(),
                modified_at,
            });
        }

        forms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(forms)
    }

    fn form_path(&self, id: &str) -> Result<PathBuf> {
        let plain = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !plain {
            return Err(FormError::FormNotFound { id: id.to_string() });
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    fn write(&self, form: &FormConfig) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| FormError::DirectoryCreateError {
                path: self.dir.clone(),
                source: e,
            })?;
        }

        let path = self.form_path(&form.id)?;
        let content = serde_json::to_string_pretty(form)?;
        fs::write(&path, content).map_err(|e| FormError::FileWriteError { path, source: e })?;
        Ok(())
    }
}

fn read_form(path: &Path) -> Result<FormConfig> {
    let content = fs::read_to_string(path).map_err(|e| FormError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

impl FormStore for JsonFileStore {
    fn create(&mut self, form: &FormConfig) -> Result<FormConfig> {
        let mut stored = form.clone();
        stored.id = self.ids.generate();
        if self.form_path(&stored.id)?.exists() {
            return Err(FormError::Persistence {
                operation: "create".to_string(),
                message: format!("a form with id {} already exists", stored.id),
            });
        }

        self.write(&stored)?;
        tracing::info!(id = %stored.id, dir = %self.dir.display(), "created form");
        Ok(stored)
    }

    fn update(&mut self, id: &str, patch: &FormPatch) -> Result<FormConfig> {
        let mut stored = self.load(id)?;
        stored.apply(patch);
        self.write(&stored)?;
        tracing::info!(id = %id, "updated form");
        Ok(stored)
    }

    fn load(&mut self, id: &str) -> Result<FormConfig> {
        let path = self.form_path(id)?;
        if !path.exists() {
            return Err(FormError::FormNotFound { id: id.to_string() });
        }
        let mut form = read_form(&path)?;
        // The file name is authoritative.
        form.id = id.to_string();
        Ok(form)
    }
}
