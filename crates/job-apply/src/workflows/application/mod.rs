//! Multi-step job application wizard.
//!
//! The wizard walks a candidate through three steps (resume and cover letter, work
//! authorization, review) and submits the assembled application to the job-board backend.
//! Storage, the backend, and the hosting front end are injected through the
//! [`ProfileStore`], [`ApplicationApi`] and [`Presenter`] traits so the state machine can be
//! exercised without any of them.

pub mod client;
pub mod domain;
pub mod repository;
pub mod resume;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use client::{ApiError, ApplicationApi, HttpApplicationApi};
pub use domain::{
    AppliedJob, CandidateId, CandidateProfile, CoverLetter, JobId, ResumeFile, SelectedJob,
    SubmissionPayload, SubmissionReceipt, UnknownWorkAuthorization, UploadedResume,
    WorkAuthorization,
};
pub use repository::{
    InMemoryProfileStore, JsonFileProfileStore, Notice, NoticeLevel, Page, Presenter,
    ProfileStore, StoreDocument, StoreError,
};
pub use resume::{ResumeReference, DETECTED_RESUME_PLACEHOLDER};
pub use service::{
    ApplicationContext, ApplicationService, SubmissionError, SubmissionOutcome, UploadError,
    WizardSession,
};
pub use wizard::{ApplicationDraft, ApplicationWizard, ResumeSource, Transition, WizardStep};
