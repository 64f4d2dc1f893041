//! Canonical resume references.
//!
//! Stored user records describe resumes in several shapes: an object carrying some of
//! `filename`, `url`, `path`, `name` and `status`, a bare string, or a legacy `resumeUrl`
//! field. The record is normalized once, when the profile is loaded, so the wizard only ever
//! sees a [`ResumeReference`].

use serde_json::Value;

/// Marker submitted when a resume is known to exist but cannot be located.
pub const DETECTED_RESUME_PLACEHOLDER: &str = "resume_uploaded_via_dashboard";

/// Prefix used to turn a bare stored filename into a retrievable path.
pub const UPLOADS_PREFIX: &str = "/uploads/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeReference {
    /// A URL or path the backend can resolve.
    Located(String),
    /// The profile says a resume exists but exposes nothing retrievable.
    Detected,
}

impl ResumeReference {
    /// Probe `resume`, `profile.resume` and `resumeUrl` in that order. A located reference from
    /// any source beats a merely detected one from an earlier source.
    pub fn from_profile_record(record: &Value) -> Option<Self> {
        let sources = [
            record.get("resume"),
            record.get("profile").and_then(|profile| profile.get("resume")),
            record.get("resumeUrl"),
        ];

        let mut detected = false;
        for reference in sources.into_iter().flatten().filter_map(Self::from_source) {
            match reference {
                Self::Located(_) => return Some(reference),
                Self::Detected => detected = true,
            }
        }
        detected.then_some(Self::Detected)
    }

    /// Normalize a single resume field.
    pub fn from_source(source: &Value) -> Option<Self> {
        match source {
            Value::String(text) => non_empty(text).map(|text| Self::Located(text.to_string())),
            Value::Object(fields) => {
                let field = |key: &str| fields.get(key).and_then(Value::as_str).and_then(non_empty);

                if let Some(filename) = field("filename") {
                    return Some(Self::Located(format!("{UPLOADS_PREFIX}{filename}")));
                }
                if let Some(url) = field("url") {
                    return Some(Self::Located(url.to_string()));
                }
                if let Some(path) = field("path") {
                    return Some(Self::Located(path.to_string()));
                }

                // Non-text location fields still prove a resume exists.
                let detected = ["filename", "url", "path", "name", "status"]
                    .iter()
                    .any(|key| fields.get(*key).is_some_and(is_present));
                detected.then_some(Self::Detected)
            }
            _ => None,
        }
    }

    /// The value placed in the submission payload.
    pub fn submission_value(&self) -> &str {
        match self {
            Self::Located(location) => location,
            Self::Detected => DETECTED_RESUME_PLACEHOLDER,
        }
    }
}

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Bool(flag) => *flag,
        _ => true,
    }
}
