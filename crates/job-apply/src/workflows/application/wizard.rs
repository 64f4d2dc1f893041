use serde::Serialize;
use tracing::debug;

use super::domain::{CoverLetter, UploadedResume, WorkAuthorization};
use super::resume::ResumeReference;

/// Steps of the application flow. Movement is strictly sequential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Resume,
    Authorization,
    Review,
}

impl WizardStep {
    pub const fn ordered() -> [Self; 3] {
        [Self::Resume, Self::Authorization, Self::Review]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Resume => 1,
            Self::Authorization => 2,
            Self::Review => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Resume => "Resume & Cover Letter",
            Self::Authorization => "Work Authorization",
            Self::Review => "Review & Submit",
        }
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: WizardStep, to: WizardStep },
    /// The request had no effect; the wizard stays on this step.
    Stayed(WizardStep),
}

impl Transition {
    pub fn current(self) -> WizardStep {
        match self {
            Transition::Moved { to, .. } => to,
            Transition::Stayed(step) => step,
        }
    }
}

/// Resume chosen for this application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResumeSource {
    Uploaded(UploadedResume),
    Profile(ResumeReference),
    #[default]
    Missing,
}

/// In-memory state collected across the three steps.
#[derive(Debug, Clone, Default)]
pub struct ApplicationDraft {
    uploaded_resume: Option<UploadedResume>,
    profile_resume: Option<ResumeReference>,
    cover_letter: Option<CoverLetter>,
    work_authorization: WorkAuthorization,
}

impl ApplicationDraft {
    pub fn new(profile_resume: Option<ResumeReference>) -> Self {
        Self {
            profile_resume,
            ..Self::default()
        }
    }

    /// The upload wins over whatever the profile carries.
    pub fn resume_source(&self) -> ResumeSource {
        match (&self.uploaded_resume, &self.profile_resume) {
            (Some(upload), _) => ResumeSource::Uploaded(upload.clone()),
            (None, Some(reference)) => ResumeSource::Profile(reference.clone()),
            (None, None) => ResumeSource::Missing,
        }
    }

    pub fn has_resume(&self) -> bool {
        self.uploaded_resume.is_some() || self.profile_resume.is_some()
    }

    /// Resolved resume value for submission, `None` only when no resume is known.
    pub fn resolved_resume(&self) -> Option<String> {
        match self.resume_source() {
            ResumeSource::Uploaded(upload) => Some(upload.url),
            ResumeSource::Profile(reference) => Some(reference.submission_value().to_string()),
            ResumeSource::Missing => None,
        }
    }

    pub fn uploaded_resume(&self) -> Option<&UploadedResume> {
        self.uploaded_resume.as_ref()
    }

    pub fn set_uploaded_resume(&mut self, upload: UploadedResume) {
        self.uploaded_resume = Some(upload);
    }

    pub fn cover_letter(&self) -> Option<&CoverLetter> {
        self.cover_letter.as_ref()
    }

    pub fn attach_cover_letter(&mut self, letter: CoverLetter) {
        self.cover_letter = Some(letter);
    }

    pub fn remove_cover_letter(&mut self) -> Option<CoverLetter> {
        self.cover_letter.take()
    }

    pub fn work_authorization(&self) -> WorkAuthorization {
        self.work_authorization
    }

    pub fn set_work_authorization(&mut self, value: WorkAuthorization) {
        self.work_authorization = value;
    }
}

/// Three-step controller: Resume & Cover Letter, Work Authorization, Review & Submit.
#[derive(Debug, Clone)]
pub struct ApplicationWizard {
    step: WizardStep,
    draft: ApplicationDraft,
}

impl ApplicationWizard {
    pub fn new(profile_resume: Option<ResumeReference>) -> Self {
        Self {
            step: WizardStep::Resume,
            draft: ApplicationDraft::new(profile_resume),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    /// Whether the forward control is enabled on the current step.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Resume => self.draft.has_resume(),
            WizardStep::Authorization => true,
            WizardStep::Review => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        match self.step {
            WizardStep::Resume => false,
            WizardStep::Authorization | WizardStep::Review => true,
        }
    }

    pub fn next(&mut self) -> Transition {
        let from = self.step;
        let to = match from {
            WizardStep::Resume if self.draft.has_resume() => WizardStep::Authorization,
            WizardStep::Resume => return Transition::Stayed(from),
            WizardStep::Authorization => WizardStep::Review,
            WizardStep::Review => return Transition::Stayed(from),
        };
        self.move_to(from, to)
    }

    pub fn back(&mut self) -> Transition {
        let from = self.step;
        let to = match from {
            WizardStep::Resume => return Transition::Stayed(from),
            WizardStep::Authorization => WizardStep::Resume,
            WizardStep::Review => WizardStep::Authorization,
        };
        self.move_to(from, to)
    }

    fn move_to(&mut self, from: WizardStep, to: WizardStep) -> Transition {
        debug!(from = from.label(), to = to.label(), "wizard step changed");
        self.step = to;
        Transition::Moved { from, to }
    }

    pub fn progress_percent(&self) -> u8 {
        (u16::from(self.step.number()) * 100 / 3) as u8
    }

    pub fn record_upload(&mut self, upload: UploadedResume) {
        self.draft.set_uploaded_resume(upload);
    }

    pub fn attach_cover_letter(&mut self, letter: CoverLetter) {
        self.draft.attach_cover_letter(letter);
    }

    pub fn remove_cover_letter(&mut self) -> Option<CoverLetter> {
        self.draft.remove_cover_letter()
    }

    pub fn set_work_authorization(&mut self, value: WorkAuthorization) {
        self.draft.set_work_authorization(value);
    }
}
