//! Pending → Uploading → Verifying → {Success | RolledBack} for one file
//! field.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use tracing::{debug, warn};

use formpilot_detect::check_compatibility;
use formpilot_protocols::{
    CvRecord, FieldPort, FileHandle, FileUploadMapping, FillFeedback, FillOutcome, FillState,
    FillTarget, InputEvent, PortError,
};

use super::field::feedback;

const UPLOAD_EVENTS: [InputEvent; 4] = [
    InputEvent::Change,
    InputEvent::Input,
    InputEvent::Blur,
    InputEvent::Focus,
];

pub fn upload_file<P>(
    port: &mut P,
    upload: &FileUploadMapping,
    cv: &CvRecord,
    show_feedback: bool,
) -> FillOutcome
where
    P: FieldPort + ?Sized,
{
    let element = upload.element;
    let purpose = upload.purpose;
    let outcome = |state: FillState, detail: Option<String>| FillOutcome {
        element,
        target: FillTarget::Upload(purpose),
        state,
        detail,
    };

    if port.tag_name(element).is_none() || port.is_disabled(element) {
        return outcome(
            FillState::Skipped,
            Some("upload field is no longer available".to_string()),
        );
    }
    if !purpose.accepts_cv() {
        debug!("No stored file for {} upload {}", purpose, element);
        return outcome(
            FillState::Skipped,
            Some(format!("no stored file for {} upload", purpose)),
        );
    }
    if let Err(reason) = check_compatibility(upload, cv) {
        warn!("CV incompatible with {}: {}", element, reason);
        return outcome(
            FillState::Incompatible,
            Some(format!("Cannot upload {}: {}", cv.file_name, reason)),
        );
    }

    let data = match BASE64.decode(cv.data.trim()) {
        Ok(data) => data,
        Err(e) => {
            return outcome(
                FillState::Failed,
                Some(format!("Stored CV data is corrupt: {}", e)),
            );
        }
    };
    let handle = FileHandle::new(cv.file_name.clone(), cv.mime_type.clone(), Bytes::from(data));

    let previous = port.file_names(element);
    debug!("{} {}: {:?}", purpose, element, FillState::Uploading);
    if let Err(e) = assign(port, upload, handle) {
        warn!("Uploading to {} failed: {}", element, e);
        clear(port, upload, &previous);
        feedback(port, element, FillFeedback::Failure, show_feedback);
        return outcome(
            FillState::Failed,
            Some(format!("Failed to upload CV to {} field: {}", purpose, e)),
        );
    }

    debug!("{} {}: {:?}", purpose, element, FillState::Verifying);
    let names = port.file_names(element);
    if names.len() == 1 && names[0] == cv.file_name {
        feedback(port, element, FillFeedback::Success, show_feedback);
        outcome(FillState::Success, None)
    } else {
        warn!("{} reports {} files after upload; rolling back", element, names.len());
        clear(port, upload, &previous);
        feedback(port, element, FillFeedback::Failure, show_feedback);
        outcome(
            FillState::RolledBack,
            Some(format!("Failed to upload CV to {} field", purpose)),
        )
    }
}

fn assign<P>(port: &mut P, upload: &FileUploadMapping, handle: FileHandle) -> Result<(), PortError>
where
    P: FieldPort + ?Sized,
{
    port.set_files(upload.element, vec![handle])?;
    for event in UPLOAD_EVENTS {
        port.dispatch(upload.element, event)?;
    }
    Ok(())
}

/// Rollback empties the field. A port only exposes the names of selected
/// files, not their contents, so an earlier selection cannot be restored.
fn clear<P>(port: &mut P, upload: &FileUploadMapping, previous: &[String])
where
    P: FieldPort + ?Sized,
{
    if !previous.is_empty() {
        warn!(
            "Rollback of {} discards earlier selection: {}",
            upload.element,
            previous.join(", ")
        );
    }
    if let Err(e) = port.set_files(upload.element, Vec::new()) {
        warn!("Could not clear {}: {}", upload.element, e);
    }
}
