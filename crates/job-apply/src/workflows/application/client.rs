use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{JobId, ResumeFile, SubmissionPayload, SubmissionReceipt, UploadedResume};
use crate::config::ApiConfig;

pub const UPLOAD_RESUME_PATH: &str = "/api/upload/resume";
pub const APPLICATIONS_PATH: &str = "/api/applications";
pub const ATTACH_RESUME_PATH: &str = "/api/resume/attach";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

/// Backend operations used by the wizard.
#[async_trait]
pub trait ApplicationApi: Send + Sync {
    async fn upload_resume(&self, file: &ResumeFile) -> Result<UploadedResume, ApiError>;

    async fn submit_application(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, ApiError>;

    /// Copy a stored resume for one application, returning the copy's URL.
    async fn attach_resume(
        &self,
        resume_url: &str,
        candidate_email: &str,
        job_id: &JobId,
    ) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachRequest<'a> {
    resume_url: &'a str,
    candidate_email: &'a str,
    job_id: &'a JobId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachResponse {
    resume_url: Option<String>,
}

/// Error body shapes the backend produces: `{error}` or validator output `{errors: [{msg}]}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Debug, Deserialize)]
struct FieldError {
    #[serde(default)]
    msg: Option<String>,
}

impl ErrorBody {
    fn into_message(self, fallback: &str) -> String {
        self.error
            .or_else(|| {
                let joined = self
                    .errors
                    .into_iter()
                    .filter_map(|field| field.msg)
                    .collect::<Vec<_>>()
                    .join("; ");
                (!joined.is_empty()).then_some(joined)
            })
            .or(self.message)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// `reqwest` implementation of [`ApplicationApi`].
#[derive(Clone)]
pub struct HttpApplicationApi {
    client: Client,
    base_url: String,
}

impl HttpApplicationApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn rejection(response: Response, fallback: &str) -> ApiError {
        let status = response.status();
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.into_message(fallback);
        warn!(status = status.as_u16(), %message, "backend rejected request");
        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ApplicationApi for HttpApplicationApi {
    async fn upload_resume(&self, file: &ResumeFile) -> Result<UploadedResume, ApiError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type())?;
        let form = multipart::Form::new().part("resume", part);

        let response = self
            .client
            .post(self.endpoint(UPLOAD_RESUME_PATH))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Upload failed").await);
        }

        let body: UploadResponse = response.json().await?;
        let url = body
            .file_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::MalformedResponse("upload response lacks fileUrl".into()))?;
        debug!(%url, "resume stored by backend");

        Ok(UploadedResume {
            url,
            filename: body.filename,
        })
    }

    async fn submit_application(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, ApiError> {
        let response = self
            .client
            .post(self.endpoint(APPLICATIONS_PATH))
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Application failed").await);
        }

        // Success is decided by status alone; an empty or non-JSON body is still accepted.
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }

    async fn attach_resume(
        &self,
        resume_url: &str,
        candidate_email: &str,
        job_id: &JobId,
    ) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.endpoint(ATTACH_RESUME_PATH))
            .json(&AttachRequest {
                resume_url,
                candidate_email,
                job_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Resume attach failed").await);
        }

        let body: AttachResponse = response.json().await?;
        body.resume_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::MalformedResponse("attach response lacks resumeUrl".into()))
    }
}
