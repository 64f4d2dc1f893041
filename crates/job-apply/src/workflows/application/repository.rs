use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{AppliedJob, CandidateProfile, SelectedJob};

/// Raw persisted document. Records keep unknown fields so amendments never drop data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_job: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

impl StoreDocument {
    pub fn selected_job(&self) -> Option<SelectedJob> {
        self.selected_job.as_ref().and_then(SelectedJob::from_record)
    }

    pub fn candidate_profile(&self) -> Option<CandidateProfile> {
        self.user.as_ref().and_then(CandidateProfile::from_record)
    }

    fn push_applied_job(&mut self, entry: &AppliedJob) -> Result<(), StoreError> {
        let user = self
            .user
            .as_mut()
            .and_then(Value::as_object_mut)
            .ok_or(StoreError::MissingRecord("user"))?;
        let entry = serde_json::to_value(entry)?;

        match user.get_mut("appliedJobs") {
            Some(Value::Array(entries)) => entries.push(entry),
            _ => {
                user.insert("appliedJobs".to_string(), Value::Array(vec![entry]));
            }
        }
        Ok(())
    }
}

/// Typed access to the job and user records the wizard consumes.
pub trait ProfileStore: Send + Sync {
    fn selected_job(&self) -> Result<Option<SelectedJob>, StoreError>;
    fn candidate_profile(&self) -> Result<Option<CandidateProfile>, StoreError>;
    fn record_applied_job(&self, entry: AppliedJob) -> Result<(), StoreError>;
    fn replace_selected_job(&self, record: Value) -> Result<(), StoreError>;
    fn replace_user(&self, record: Value) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no {0} record stored")]
    MissingRecord(&'static str),
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    document: Mutex<StoreDocument>,
}

impl InMemoryProfileStore {
    pub fn new(document: StoreDocument) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }

    pub fn snapshot(&self) -> Result<StoreDocument, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreDocument>, StoreError> {
        self.document
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn selected_job(&self) -> Result<Option<SelectedJob>, StoreError> {
        Ok(self.lock()?.selected_job())
    }

    fn candidate_profile(&self) -> Result<Option<CandidateProfile>, StoreError> {
        Ok(self.lock()?.candidate_profile())
    }

    fn record_applied_job(&self, entry: AppliedJob) -> Result<(), StoreError> {
        self.lock()?.push_applied_job(&entry)
    }

    fn replace_selected_job(&self, record: Value) -> Result<(), StoreError> {
        self.lock()?.selected_job = Some(record);
        Ok(())
    }

    fn replace_user(&self, record: Value) -> Result<(), StoreError> {
        self.lock()?.user = Some(record);
        Ok(())
    }
}

/// Store backed by a single JSON document on disk. A missing file reads as empty.
#[derive(Debug)]
pub struct JsonFileProfileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<StoreDocument, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(StoreDocument::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn modify<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoreDocument) -> Result<(), StoreError>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        let mut document = self.load()?;
        change(&mut document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_vec_pretty(&document)?)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl ProfileStore for JsonFileProfileStore {
    fn selected_job(&self) -> Result<Option<SelectedJob>, StoreError> {
        Ok(self.load()?.selected_job())
    }

    fn candidate_profile(&self) -> Result<Option<CandidateProfile>, StoreError> {
        Ok(self.load()?.candidate_profile())
    }

    fn record_applied_job(&self, entry: AppliedJob) -> Result<(), StoreError> {
        self.modify(|document| document.push_applied_job(&entry))
    }

    fn replace_selected_job(&self, record: Value) -> Result<(), StoreError> {
        self.modify(|document| {
            document.selected_job = Some(record);
            Ok(())
        })
    }

    fn replace_user(&self, record: Value) -> Result<(), StoreError> {
        self.modify(|document| {
            document.user = Some(record);
            Ok(())
        })
    }
}

/// Pages the wizard can send the candidate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    CandidateDashboard,
}

impl Page {
    pub const fn route(self) -> &'static str {
        match self {
            Page::CandidateDashboard => "candidate-dashboard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Blocking message shown to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Outbound hooks into whatever front end hosts the wizard.
pub trait Presenter: Send + Sync {
    fn alert(&self, notice: Notice);
    fn navigate(&self, page: Page);
}
