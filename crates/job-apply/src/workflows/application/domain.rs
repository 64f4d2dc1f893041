use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resume::ResumeReference;

/// Identifier of a posted job as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier of a candidate account as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// The job the candidate picked before opening the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedJob {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
}

impl SelectedJob {
    /// Normalize a stored job record. Returns `None` when no identifier can be found.
    pub fn from_record(record: &Value) -> Option<Self> {
        let id = first_text(record, &["_id", "id", "jobId"])?;
        Some(Self {
            id: JobId(id),
            title: first_text(record, &["jobTitle", "title"]).unwrap_or_default(),
            company: first_text(record, &["company"]).unwrap_or_default(),
            location: first_text(record, &["location"]).unwrap_or_default(),
        })
    }
}

/// Candidate data the wizard reads from the stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub id: Option<CandidateId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume: Option<ResumeReference>,
    pub applied_jobs: Vec<AppliedJob>,
}

impl CandidateProfile {
    /// Normalize a stored user record. The record must at least carry an e-mail address.
    pub fn from_record(record: &Value) -> Option<Self> {
        let email = first_text(record, &["email"])?;
        let applied_jobs = record
            .get("appliedJobs")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            id: first_text(record, &["_id", "id"]).map(CandidateId),
            name: first_text(record, &["name", "fullName"]).unwrap_or_default(),
            email,
            phone: first_text(record, &["phone"]).unwrap_or_default(),
            resume: ResumeReference::from_profile_record(record),
            applied_jobs,
        })
    }

    pub fn has_applied_to(&self, job_id: &JobId) -> bool {
        self.applied_jobs.iter().any(|entry| &entry.job_id == job_id)
    }
}

fn first_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Work authorization answers offered on step two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkAuthorization {
    #[default]
    UsCitizen,
    GreenCard,
    H1bVisa,
    L1Visa,
    OptCpt,
    TnVisa,
    Other,
    RequiresSponsorship,
}

impl WorkAuthorization {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::UsCitizen,
            Self::GreenCard,
            Self::H1bVisa,
            Self::L1Visa,
            Self::OptCpt,
            Self::TnVisa,
            Self::Other,
            Self::RequiresSponsorship,
        ]
    }

    /// Value sent to the backend.
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::UsCitizen => "us_citizen",
            Self::GreenCard => "green_card",
            Self::H1bVisa => "h1b_visa",
            Self::L1Visa => "l1_visa",
            Self::OptCpt => "opt_cpt",
            Self::TnVisa => "tn_visa",
            Self::Other => "other",
            Self::RequiresSponsorship => "requires_sponsorship",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UsCitizen => "US Citizen",
            Self::GreenCard => "Green Card Holder",
            Self::H1bVisa => "H1B Visa",
            Self::L1Visa => "L1 Visa",
            Self::OptCpt => "OPT/CPT",
            Self::TnVisa => "TN Visa",
            Self::Other => "Other",
            Self::RequiresSponsorship => "Will Require Sponsorship",
        }
    }
}

impl fmt::Display for WorkAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown work authorization '{0}'")]
pub struct UnknownWorkAuthorization(pub String);

impl FromStr for WorkAuthorization {
    type Err = UnknownWorkAuthorization;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|option| {
                option.wire_value().eq_ignore_ascii_case(needle)
                    || option.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownWorkAuthorization(raw.to_string()))
    }
}

/// A local file picked by the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Cover letters stay on the client; only their presence is submitted.
pub type CoverLetter = ResumeFile;

/// Result of a successful resume upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedResume {
    pub url: String,
    pub filename: Option<String>,
}

/// Entry appended to the stored profile after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJob {
    pub job_id: JobId,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    pub applied_at: DateTime<Utc>,
    #[serde(default = "applied_status")]
    pub status: String,
}

fn applied_status() -> String {
    "applied".to_string()
}

impl AppliedJob {
    pub fn for_job(job: &SelectedJob, applied_at: DateTime<Utc>) -> Self {
        Self {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            company: job.company.clone(),
            applied_at,
            status: applied_status(),
        }
    }
}

/// Body posted to the application collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub job_id: JobId,
    pub candidate_id: Option<CandidateId>,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: String,
    pub resume_url: String,
    pub work_authorization: WorkAuthorization,
    pub has_cover_letter: bool,
    pub is_quick_apply: bool,
}

/// Backend acknowledgement for an accepted application.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub application: Option<Value>,
}

impl SubmissionReceipt {
    pub fn application_id(&self) -> Option<&str> {
        self.application
            .as_ref()
            .and_then(|application| application.get("_id").or_else(|| application.get("id")))
            .and_then(Value::as_str)
    }
}
