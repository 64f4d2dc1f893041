use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::WizardConfig;
use crate::workflows::application::client::{ApiError, ApplicationApi};
use crate::workflows::application::domain::{
    JobId, ResumeFile, SubmissionPayload, SubmissionReceipt, UploadedResume,
};
use crate::workflows::application::repository::{
    InMemoryProfileStore, Notice, Page, Presenter, StoreDocument,
};
use crate::workflows::application::service::ApplicationService;

pub(super) fn job_record() -> Value {
    json!({
        "_id": "665f1c2a9b1e",
        "jobTitle": "Senior Rust Engineer",
        "company": "Trinitetech",
        "location": "Chennai, Tamil Nadu"
    })
}

pub(super) fn user_record(resume: Value) -> Value {
    json!({
        "_id": "user-17",
        "fullName": "Asha Raman",
        "email": "asha@example.com",
        "phone": "+91 95000 00000",
        "resume": resume
    })
}

pub(super) fn store_with(job: Option<Value>, user: Option<Value>) -> Arc<InMemoryProfileStore> {
    Arc::new(InMemoryProfileStore::new(StoreDocument {
        selected_job: job,
        user,
    }))
}

pub(super) fn wizard_config() -> WizardConfig {
    WizardConfig {
        redirect_delay: Duration::from_millis(1500),
        ..WizardConfig::default()
    }
}

/// Canned backend reply; `ApiError` itself is not `Clone`.
#[derive(Debug, Clone)]
pub(super) enum Reply<T> {
    Ok(T),
    Rejected(u16, &'static str),
    Malformed,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Rejected(status, message) => Err(ApiError::Rejected {
                status,
                message: message.to_string(),
            }),
            Reply::Malformed => Err(ApiError::MalformedResponse("canned".to_string())),
        }
    }
}

#[derive(Default)]
pub(super) struct FakeApi {
    uploads: Mutex<VecDeque<Reply<UploadedResume>>>,
    submissions: Mutex<VecDeque<Reply<SubmissionReceipt>>>,
    attach: Mutex<Option<Reply<String>>>,
    pub(super) uploaded_files: Mutex<Vec<String>>,
    pub(super) submitted: Mutex<Vec<SubmissionPayload>>,
    pub(super) attach_calls: Mutex<Vec<(String, String, JobId)>>,
}

impl FakeApi {
    pub(super) fn queue_upload(&self, reply: Reply<UploadedResume>) {
        self.uploads.lock().expect("lock").push_back(reply);
    }

    pub(super) fn queue_submission(&self, reply: Reply<SubmissionReceipt>) {
        self.submissions.lock().expect("lock").push_back(reply);
    }

    pub(super) fn set_attach(&self, reply: Reply<String>) {
        *self.attach.lock().expect("lock") = Some(reply);
    }

    pub(super) fn submitted(&self) -> Vec<SubmissionPayload> {
        self.submitted.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ApplicationApi for FakeApi {
    async fn upload_resume(&self, file: &ResumeFile) -> Result<UploadedResume, ApiError> {
        self.uploaded_files
            .lock()
            .expect("lock")
            .push(file.file_name.clone());
        self.uploads
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Reply::Malformed)
            .into_result()
    }

    async fn submit_application(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, ApiError> {
        self.submitted.lock().expect("lock").push(payload.clone());
        self.submissions
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Reply::Ok(SubmissionReceipt::default()))
            .into_result()
    }

    async fn attach_resume(
        &self,
        resume_url: &str,
        candidate_email: &str,
        job_id: &JobId,
    ) -> Result<String, ApiError> {
        self.attach_calls.lock().expect("lock").push((
            resume_url.to_string(),
            candidate_email.to_string(),
            job_id.clone(),
        ));
        self.attach
            .lock()
            .expect("lock")
            .clone()
            .unwrap_or(Reply::Malformed)
            .into_result()
    }
}

#[derive(Default)]
pub(super) struct RecordingPresenter {
    notices: Mutex<Vec<Notice>>,
    pages: Mutex<Vec<Page>>,
}

impl RecordingPresenter {
    pub(super) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("lock").clone()
    }

    pub(super) fn pages(&self) -> Vec<Page> {
        self.pages.lock().expect("lock").clone()
    }
}

impl Presenter for RecordingPresenter {
    fn alert(&self, notice: Notice) {
        self.notices.lock().expect("lock").push(notice);
    }

    fn navigate(&self, page: Page) {
        self.pages.lock().expect("lock").push(page);
    }
}

pub(super) type TestService = ApplicationService<InMemoryProfileStore, FakeApi, RecordingPresenter>;

pub(super) struct Harness {
    pub(super) store: Arc<InMemoryProfileStore>,
    pub(super) api: Arc<FakeApi>,
    pub(super) presenter: Arc<RecordingPresenter>,
    pub(super) service: TestService,
}

pub(super) fn harness(job: Option<Value>, user: Option<Value>) -> Harness {
    let store = store_with(job, user);
    let api = Arc::new(FakeApi::default());
    let presenter = Arc::new(RecordingPresenter::default());
    let service = ApplicationService::new(
        store.clone(),
        api.clone(),
        presenter.clone(),
        &wizard_config(),
    );
    Harness {
        store,
        api,
        presenter,
        service,
    }
}

pub(super) fn pdf(name: &str) -> ResumeFile {
    ResumeFile::new(name, b"%PDF-1.4 test".to_vec())
}
