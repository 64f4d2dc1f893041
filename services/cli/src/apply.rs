use crate::infra::{build_service, open_store, read_json_record, read_local_file};
use chrono::Local;
use clap::Args;
use job_apply::config::AppConfig;
use job_apply::error::AppError;
use job_apply::workflows::application::{
    ApplicationWizard, CandidateProfile, ProfileStore, ResumeReference, SelectedJob,
    SubmissionOutcome, Transition, WizardSession, WizardStep, WorkAuthorization,
};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub(crate) struct SelectJobArgs {
    /// Read the job record from a JSON file instead of the flags below
    #[arg(long, conflicts_with_all = ["id", "title", "company", "location"])]
    pub(crate) from_file: Option<PathBuf>,
    /// Backend identifier of the job
    #[arg(long)]
    pub(crate) id: Option<String>,
    /// Job title shown on the review step
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long)]
    pub(crate) company: Option<String>,
    #[arg(long)]
    pub(crate) location: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LoginArgs {
    /// Read the user record from a JSON file instead of the flags below
    #[arg(long, conflicts_with_all = ["id", "name", "email", "phone", "resume_url", "resume_file_name"])]
    pub(crate) from_file: Option<PathBuf>,
    /// Backend identifier of the candidate account
    #[arg(long)]
    pub(crate) id: Option<String>,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// URL of a resume already stored by the backend
    #[arg(long, conflicts_with = "resume_file_name")]
    pub(crate) resume_url: Option<String>,
    /// File name of a resume under the backend's uploads directory
    #[arg(long)]
    pub(crate) resume_file_name: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ApplyArgs {
    /// Resume to upload; without it the profile resume is used
    #[arg(long)]
    pub(crate) resume: Option<PathBuf>,
    /// Optional cover letter; only its presence is sent
    #[arg(long)]
    pub(crate) cover_letter: Option<PathBuf>,
    /// Work authorization value or label (see `authorizations`)
    #[arg(long)]
    pub(crate) work_authorization: Option<String>,
    /// Return as soon as the application is accepted instead of waiting for the redirect
    #[arg(long)]
    pub(crate) no_wait: bool,
}

pub(crate) fn run_select_job(config: &AppConfig, args: SelectJobArgs) -> Result<(), AppError> {
    let record = match args.from_file.as_deref() {
        Some(path) => read_json_record(path)?,
        None => job_record(&args)?,
    };
    let job = SelectedJob::from_record(&record)
        .ok_or_else(|| AppError::Input("job record needs an `_id`, `id` or `jobId`".into()))?;

    open_store(config).replace_selected_job(record)?;
    info!(job_id = %job.id.0, "job selected");
    println!("Selected {} at {} ({})", job.title, job.company, job.id.0);
    Ok(())
}

pub(crate) fn run_login(config: &AppConfig, args: LoginArgs) -> Result<(), AppError> {
    let store = open_store(config);
    let mut record = match args.from_file.as_deref() {
        Some(path) => read_json_record(path)?,
        None => user_record(&args)?,
    };
    let profile = CandidateProfile::from_record(&record)
        .ok_or_else(|| AppError::Input("user record needs an `email`".into()))?;

    if let Some(previous) = store.load()?.user {
        carry_applied_jobs(&previous, &mut record);
    }
    store.replace_user(record)?;
    info!(email = %profile.email, "candidate profile stored");
    println!("Signed in as {} <{}>", profile.name, profile.email);
    Ok(())
}

pub(crate) fn run_status(config: &AppConfig) -> Result<(), AppError> {
    let store = open_store(config);
    println!("Store: {}", store.path().display());

    match store.selected_job()? {
        Some(job) => println!(
            "Job: {} at {} [{}] ({})",
            job.title, job.company, job.location, job.id.0
        ),
        None => println!("Job: none selected"),
    }

    let Some(profile) = store.candidate_profile()? else {
        println!("Candidate: not signed in");
        return Ok(());
    };
    println!("Candidate: {} <{}>", profile.name, profile.email);
    println!("Resume: {}", describe_resume(profile.resume.as_ref()));
    if profile.applied_jobs.is_empty() {
        println!("Applications: none yet");
    } else {
        println!("Applications:");
        for entry in &profile.applied_jobs {
            println!(
                "  - {} at {} on {} ({})",
                entry.job_title,
                entry.company,
                entry.applied_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                entry.status
            );
        }
    }
    Ok(())
}

pub(crate) fn show_authorizations() {
    for option in WorkAuthorization::ordered() {
        println!("{:<22} {}", option.wire_value(), option.label());
    }
}

pub(crate) async fn run_apply(config: &AppConfig, args: ApplyArgs) -> Result<(), AppError> {
    let ApplyArgs {
        resume,
        cover_letter,
        work_authorization,
        no_wait,
    } = args;
    let work_authorization = work_authorization
        .as_deref()
        .map(str::parse::<WorkAuthorization>)
        .transpose()?;

    let service = build_service(config)?;
    let WizardSession {
        context,
        mut wizard,
    } = service.open()?;
    if let Some(job) = &context.job {
        println!("Applying to {} at {}", job.title, job.company);
    }

    print_step(&wizard);
    if let Some(path) = resume.as_deref() {
        let file = read_local_file(path)?;
        let upload = service.upload_resume(&mut wizard, &file).await?;
        println!("  uploaded {} -> {}", file.file_name, upload.url);
    }
    if let Some(path) = cover_letter.as_deref() {
        let letter = read_local_file(path)?;
        println!("  cover letter {}", letter.file_name);
        wizard.attach_cover_letter(letter);
    }
    if let Transition::Stayed(_) = wizard.next() {
        return Err(AppError::Input(
            "a resume is required: pass --resume or store one on the profile".into(),
        ));
    }

    print_step(&wizard);
    if let Some(value) = work_authorization {
        wizard.set_work_authorization(value);
    }
    println!("  {}", wizard.draft().work_authorization());
    wizard.next();

    print_step(&wizard);
    print_review(&wizard);
    let outcome = service.submit(&wizard).await?;
    finish(outcome, no_wait).await;
    Ok(())
}

pub(crate) async fn run_quick_apply(config: &AppConfig) -> Result<(), AppError> {
    let service = build_service(config)?;
    let outcome = service.quick_apply().await?;
    println!("  resume {}", outcome.payload.resume_url);
    finish(outcome, false).await;
    Ok(())
}

async fn finish(outcome: SubmissionOutcome, no_wait: bool) {
    if let Some(id) = outcome.receipt.application_id() {
        println!("Application id: {id}");
    }
    if no_wait {
        outcome.redirect.abort();
        return;
    }
    if let Err(err) = outcome.redirect.await {
        warn!(error = %err, "redirect task did not complete");
    }
}

fn print_step(wizard: &ApplicationWizard) {
    let step = wizard.step();
    println!(
        "Step {}/{}: {} ({}%)",
        step.number(),
        WizardStep::ordered().len(),
        step.label(),
        wizard.progress_percent()
    );
}

fn print_review(wizard: &ApplicationWizard) {
    let draft = wizard.draft();
    println!(
        "  resume: {}",
        draft.resolved_resume().unwrap_or_else(|| "missing".into())
    );
    println!(
        "  cover letter: {}",
        draft
            .cover_letter()
            .map(|letter| letter.file_name.as_str())
            .unwrap_or("none")
    );
    println!("  work authorization: {}", draft.work_authorization());
}

fn describe_resume(resume: Option<&ResumeReference>) -> String {
    match resume {
        Some(ResumeReference::Located(location)) => location.clone(),
        Some(ResumeReference::Detected) => "on file (location unknown)".to_string(),
        None => "none".to_string(),
    }
}

fn job_record(args: &SelectJobArgs) -> Result<Value, AppError> {
    let id = args
        .id
        .as_deref()
        .ok_or_else(|| AppError::Input("--id is required without --from-file".into()))?;
    Ok(json!({
        "_id": id,
        "jobTitle": args.title.as_deref().unwrap_or_default(),
        "company": args.company.as_deref().unwrap_or_default(),
        "location": args.location.as_deref().unwrap_or_default(),
    }))
}

fn user_record(args: &LoginArgs) -> Result<Value, AppError> {
    let email = args
        .email
        .as_deref()
        .ok_or_else(|| AppError::Input("--email is required without --from-file".into()))?;

    let mut record = Map::new();
    if let Some(id) = &args.id {
        record.insert("_id".into(), json!(id));
    }
    record.insert("name".into(), json!(args.name.as_deref().unwrap_or_default()));
    record.insert("email".into(), json!(email));
    record.insert("phone".into(), json!(args.phone.as_deref().unwrap_or_default()));
    if let Some(url) = &args.resume_url {
        record.insert("resume".into(), json!({ "url": url }));
    } else if let Some(file_name) = &args.resume_file_name {
        record.insert("resume".into(), json!({ "filename": file_name }));
    }
    Ok(Value::Object(record))
}

/// Keep the application history when the same candidate signs in again.
fn carry_applied_jobs(previous: &Value, record: &mut Value) {
    let email = previous.get("email");
    if email.is_none() || email != record.get("email") {
        return;
    }
    let Some(history) = previous.get("appliedJobs").filter(|jobs| jobs.is_array()) else {
        return;
    };
    if let Some(fields) = record.as_object_mut() {
        fields
            .entry("appliedJobs")
            .or_insert_with(|| history.clone());
    }
}
