use serde_json::json;

use crate::workflows::application::domain::CandidateProfile;
use crate::workflows::application::resume::{ResumeReference, DETECTED_RESUME_PLACEHOLDER};

fn reference(record: serde_json::Value) -> Option<ResumeReference> {
    ResumeReference::from_profile_record(&record)
}

#[test]
fn filename_becomes_uploads_path() {
    assert_eq!(
        reference(json!({ "resume": { "filename": "cv.pdf", "url": "https://cdn/cv.pdf" } })),
        Some(ResumeReference::Located("/uploads/cv.pdf".to_string()))
    );
}

#[test]
fn url_then_path_follow_filename() {
    assert_eq!(
        reference(json!({ "resume": { "url": "https://cdn/cv.pdf", "path": "uploads/cv.pdf" } })),
        Some(ResumeReference::Located("https://cdn/cv.pdf".to_string()))
    );
    assert_eq!(
        reference(json!({ "resume": { "path": "uploads/cv.pdf", "name": "cv.pdf" } })),
        Some(ResumeReference::Located("uploads/cv.pdf".to_string()))
    );
}

#[test]
fn legacy_string_field_is_used_verbatim() {
    assert_eq!(
        reference(json!({ "resume": "  /uploads/legacy.docx " })),
        Some(ResumeReference::Located("/uploads/legacy.docx".to_string()))
    );
    assert_eq!(
        reference(json!({ "resumeUrl": "https://cdn/legacy.pdf" })),
        Some(ResumeReference::Located("https://cdn/legacy.pdf".to_string()))
    );
}

#[test]
fn nested_profile_resume_is_consulted_after_top_level() {
    assert_eq!(
        reference(json!({ "resume": "", "profile": { "resume": { "filename": "nested.pdf" } } })),
        Some(ResumeReference::Located("/uploads/nested.pdf".to_string()))
    );
}

#[test]
fn status_or_name_only_objects_are_detected_but_unresolved() {
    let status_only = reference(json!({ "resume": { "status": "uploaded" } }));
    assert_eq!(status_only, Some(ResumeReference::Detected));
    let name_only = reference(json!({ "resume": { "name": "My CV.pdf" } }));
    assert_eq!(name_only, Some(ResumeReference::Detected));
    assert_eq!(
        ResumeReference::Detected.submission_value(),
        DETECTED_RESUME_PLACEHOLDER
    );
}

#[test]
fn located_source_outranks_earlier_detected_source() {
    assert_eq!(
        reference(json!({
            "resume": { "status": "uploaded" },
            "profile": { "resume": { "filename": "cv.pdf" } },
            "resumeUrl": "https://cdn/cv.pdf"
        })),
        Some(ResumeReference::Located("/uploads/cv.pdf".to_string()))
    );
    assert_eq!(
        reference(json!({
            "resume": { "name": "My CV.pdf" },
            "resumeUrl": "https://cdn/legacy.pdf"
        })),
        Some(ResumeReference::Located("https://cdn/legacy.pdf".to_string()))
    );
}

#[test]
fn non_text_location_fields_count_as_detected() {
    assert_eq!(
        reference(json!({ "resume": { "filename": 42 } })),
        Some(ResumeReference::Detected)
    );
    assert_eq!(
        reference(json!({ "resume": { "url": { "href": "https://cdn/cv.pdf" } } })),
        Some(ResumeReference::Detected)
    );
    assert_eq!(
        reference(json!({
            "resume": { "path": 7 },
            "resumeUrl": "https://cdn/cv.pdf"
        })),
        Some(ResumeReference::Located("https://cdn/cv.pdf".to_string()))
    );
}

#[test]
fn empty_shapes_are_not_resumes() {
    assert_eq!(reference(json!({})), None);
    assert_eq!(reference(json!({ "resume": null })), None);
    assert_eq!(reference(json!({ "resume": "   " })), None);
    assert_eq!(reference(json!({ "resume": {} })), None);
    assert_eq!(reference(json!({ "resume": { "filename": "", "status": null } })), None);
}

#[test]
fn profile_normalization_carries_resume_reference() {
    let profile = CandidateProfile::from_record(&json!({
        "id": "user-1",
        "name": "Asha",
        "email": "asha@example.com",
        "resume": { "filename": "cv.pdf" },
        "appliedJobs": [
            { "jobId": "job-9", "appliedAt": "2025-06-01T10:00:00Z" },
            { "legacy": true }
        ]
    }))
    .expect("profile normalizes");

    assert_eq!(
        profile.resume,
        Some(ResumeReference::Located("/uploads/cv.pdf".to_string()))
    );
    assert_eq!(profile.applied_jobs.len(), 1);
    assert_eq!(profile.applied_jobs[0].status, "applied");
    assert!(CandidateProfile::from_record(&json!({ "name": "no email" })).is_none());
}
