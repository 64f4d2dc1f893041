use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::client::{ApiError, ApplicationApi};
use super::domain::{
    AppliedJob, CandidateProfile, ResumeFile, SelectedJob, SubmissionPayload, SubmissionReceipt,
    UploadedResume, WorkAuthorization,
};
use super::repository::{Notice, Page, Presenter, ProfileStore, StoreError};
use super::resume::ResumeReference;
use super::wizard::{ApplicationWizard, ResumeSource, WizardStep};
use crate::config::WizardConfig;

pub const MISSING_CONTEXT_MESSAGE: &str =
    "Missing job or user information. Please select a job and log in again.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const STORE_UNAVAILABLE_MESSAGE: &str =
    "Could not read your saved profile. Please log in again.";
pub const ALREADY_APPLIED_MESSAGE: &str = "You have already applied for this job";
pub const SUBMITTED_MESSAGE: &str =
    "Application submitted successfully! You will be redirected to your dashboard.";

/// Job and candidate records read when the wizard opens.
#[derive(Debug, Clone)]
pub struct ApplicationContext {
    pub job: Option<SelectedJob>,
    pub profile: Option<CandidateProfile>,
}

/// A freshly opened wizard together with the records it was opened against.
#[derive(Debug, Clone)]
pub struct WizardSession {
    pub context: ApplicationContext,
    pub wizard: ApplicationWizard,
}

/// What a successful submission produced.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub payload: SubmissionPayload,
    pub receipt: SubmissionReceipt,
    /// Fires [`Page::CandidateDashboard`] once the redirect delay has elapsed.
    pub redirect: JoinHandle<()>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("job or candidate context missing")]
    MissingContext,
    #[error("submission is only available on the review step (currently {0:?})")]
    NotReady(WizardStep),
    #[error("a resume is required")]
    ResumeRequired,
    #[error("already applied to job {0}")]
    AlreadyApplied(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Service composing the profile store, backend client, and presenter.
pub struct ApplicationService<S, C, P> {
    store: Arc<S>,
    api: Arc<C>,
    presenter: Arc<P>,
    redirect_delay: Duration,
}

impl<S, C, P> ApplicationService<S, C, P>
where
    S: ProfileStore + 'static,
    C: ApplicationApi + 'static,
    P: Presenter + 'static,
{
    pub fn new(store: Arc<S>, api: Arc<C>, presenter: Arc<P>, config: &WizardConfig) -> Self {
        Self {
            store,
            api,
            presenter,
            redirect_delay: config.redirect_delay,
        }
    }

    /// Read the stored job and profile and start a wizard on the resume step.
    pub fn open(&self) -> Result<WizardSession, StoreError> {
        let context = self.load_context()?;
        let profile_resume = context
            .profile
            .as_ref()
            .and_then(|profile| profile.resume.clone());

        Ok(WizardSession {
            wizard: ApplicationWizard::new(profile_resume),
            context,
        })
    }

    fn load_context(&self) -> Result<ApplicationContext, StoreError> {
        Ok(ApplicationContext {
            job: self.store.selected_job()?,
            profile: self.store.candidate_profile()?,
        })
    }

    /// Upload a resume and record the returned URL. Failures leave the draft untouched.
    pub async fn upload_resume(
        &self,
        wizard: &mut ApplicationWizard,
        file: &ResumeFile,
    ) -> Result<UploadedResume, UploadError> {
        match self.api.upload_resume(file).await {
            Ok(upload) => {
                info!(file = %file.file_name, url = %upload.url, "resume uploaded");
                wizard.record_upload(upload.clone());
                Ok(upload)
            }
            Err(err) => {
                let message = match &err {
                    ApiError::Rejected { message, .. } => format!("Upload failed: {message}"),
                    ApiError::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
                    ApiError::MalformedResponse(_) => "Upload failed. Please try again.".to_string(),
                };
                self.presenter.alert(Notice::error(message));
                Err(err.into())
            }
        }
    }

    /// Submit the application built from the wizard draft. The draft is never consumed, so a
    /// failed attempt can be retried as-is.
    pub async fn submit(
        &self,
        wizard: &ApplicationWizard,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if wizard.step() != WizardStep::Review {
            return Err(SubmissionError::NotReady(wizard.step()));
        }

        let (job, profile) = self.require_context()?;
        let draft = wizard.draft();
        let resume_url = draft.resolved_resume().ok_or_else(|| {
            self.presenter
                .alert(Notice::error("Please upload your resume before submitting."));
            SubmissionError::ResumeRequired
        })?;
        if matches!(
            draft.resume_source(),
            ResumeSource::Profile(ResumeReference::Detected)
        ) {
            warn!(
                job_id = %job.id.0,
                "profile resume has no retrievable location; submitting placeholder"
            );
        }

        let payload = build_payload(
            &job,
            &profile,
            resume_url,
            draft.work_authorization(),
            draft.cover_letter().is_some(),
            false,
        );
        self.send(&job, payload).await
    }

    /// Apply with the saved profile resume in a single call, bypassing the wizard.
    pub async fn quick_apply(&self) -> Result<SubmissionOutcome, SubmissionError> {
        let (job, profile) = self.require_context()?;
        let Some(reference) = profile.resume.clone() else {
            self.presenter.alert(Notice::error(
                "Upload a resume to your profile before using Quick Apply.",
            ));
            return Err(SubmissionError::ResumeRequired);
        };

        let original = reference.submission_value().to_string();
        let resume_url = match self
            .api
            .attach_resume(&original, &profile.email, &job.id)
            .await
        {
            Ok(copy) => copy,
            Err(err) => {
                warn!(error = %err, "resume attach failed, using original reference");
                original
            }
        };

        let payload = build_payload(
            &job,
            &profile,
            resume_url,
            WorkAuthorization::default(),
            false,
            true,
        );
        self.send(&job, payload).await
    }

    fn require_context(&self) -> Result<(SelectedJob, CandidateProfile), SubmissionError> {
        let context = self.load_context().map_err(|err| {
            warn!(error = %err, "could not read stored job or profile");
            self.presenter.alert(Notice::error(STORE_UNAVAILABLE_MESSAGE));
            SubmissionError::Store(err)
        })?;
        let (Some(job), Some(profile)) = (context.job, context.profile) else {
            self.presenter.alert(Notice::error(MISSING_CONTEXT_MESSAGE));
            return Err(SubmissionError::MissingContext);
        };

        if profile.has_applied_to(&job.id) {
            self.presenter.alert(Notice::error(ALREADY_APPLIED_MESSAGE));
            return Err(SubmissionError::AlreadyApplied(job.id.0));
        }

        Ok((job, profile))
    }

    async fn send(
        &self,
        job: &SelectedJob,
        payload: SubmissionPayload,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let receipt = match self.api.submit_application(&payload).await {
            Ok(receipt) => receipt,
            Err(err) => {
                let message = match &err {
                    ApiError::Rejected { message, .. } => message.clone(),
                    ApiError::Transport(_) | ApiError::MalformedResponse(_) => {
                        NETWORK_ERROR_MESSAGE.to_string()
                    }
                };
                self.presenter.alert(Notice::error(message));
                return Err(err.into());
            }
        };

        info!(
            job_id = %job.id.0,
            application_id = receipt.application_id().unwrap_or("unknown"),
            quick_apply = payload.is_quick_apply,
            "application submitted"
        );

        if let Err(err) = self
            .store
            .record_applied_job(AppliedJob::for_job(job, Utc::now()))
        {
            warn!(error = %err, "could not record applied job on profile");
        }

        self.presenter.alert(Notice::success(SUBMITTED_MESSAGE));
        let redirect = self.schedule_navigation(Page::CandidateDashboard);

        Ok(SubmissionOutcome {
            payload,
            receipt,
            redirect,
        })
    }

    fn schedule_navigation(&self, page: Page) -> JoinHandle<()> {
        let presenter = Arc::clone(&self.presenter);
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            presenter.navigate(page);
        })
    }
}

fn build_payload(
    job: &SelectedJob,
    profile: &CandidateProfile,
    resume_url: String,
    work_authorization: WorkAuthorization,
    has_cover_letter: bool,
    is_quick_apply: bool,
) -> SubmissionPayload {
    SubmissionPayload {
        job_id: job.id.clone(),
        candidate_id: profile.id.clone(),
        candidate_name: profile.name.clone(),
        candidate_email: profile.email.clone(),
        candidate_phone: profile.phone.clone(),
        resume_url,
        work_authorization,
        has_cover_letter,
        is_quick_apply,
    }
}
