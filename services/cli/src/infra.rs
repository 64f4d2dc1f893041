use job_apply::config::AppConfig;
use job_apply::error::AppError;
use job_apply::workflows::application::{
    ApplicationService, HttpApplicationApi, JsonFileProfileStore, Notice, NoticeLevel, Page,
    Presenter, ResumeFile,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Prints notices to the terminal; navigation is reported as the route that would open.
#[derive(Default, Clone, Copy)]
pub(crate) struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn alert(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
        }
    }

    fn navigate(&self, page: Page) {
        println!("-> /{}", page.route());
    }
}

pub(crate) type CliService =
    ApplicationService<JsonFileProfileStore, HttpApplicationApi, ConsolePresenter>;

pub(crate) fn open_store(config: &AppConfig) -> Arc<JsonFileProfileStore> {
    Arc::new(JsonFileProfileStore::new(config.wizard.store_path.clone()))
}

pub(crate) fn build_service(config: &AppConfig) -> Result<CliService, AppError> {
    let api = Arc::new(HttpApplicationApi::new(&config.api)?);
    Ok(ApplicationService::new(
        open_store(config),
        api,
        Arc::new(ConsolePresenter),
        &config.wizard,
    ))
}

pub(crate) fn read_local_file(path: &Path) -> Result<ResumeFile, AppError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::Input(format!("'{}' does not name a file", path.display())))?;
    let bytes = std::fs::read(path)?;
    Ok(ResumeFile::new(file_name, bytes))
}

pub(crate) fn read_json_record(path: &Path) -> Result<Value, AppError> {
    let bytes = std::fs::read(path)?;
    let record: Value = serde_json::from_slice(&bytes)
        .map_err(|err| AppError::Input(format!("{} is not valid JSON ({err})", path.display())))?;
    if !record.is_object() {
        return Err(AppError::Input(format!(
            "{} must contain a JSON object",
            path.display()
        )));
    }
    Ok(record)
}
