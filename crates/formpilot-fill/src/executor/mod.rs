//! Fill executor.
//!
//! Fields are written one at a time, in document order, with a short pause
//! between writes so host page scripts can keep up. File uploads follow,
//! CV-purpose fields first and then by confidence. Every item ends in a
//! terminal [`FillState`](formpilot_protocols::FillState); one failing item
//! never stops the rest.

mod field;
mod upload;

use std::cmp::Ordering;

use tracing::{debug, info};

use formpilot_detect::ScanSnapshot;
use formpilot_protocols::{CvRecord, FieldPort, FileUploadMapping, RunReport, UploadPurpose};

use crate::CancellationToken;
use crate::options::FillOptions;

pub use field::fill_field;
pub use upload::upload_file;

pub struct FillExecutor {
    options: FillOptions,
}

impl FillExecutor {
    pub fn new(options: FillOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FillOptions {
        &self.options
    }

    /// Execute every writable mapping and upload in `snapshot`.
    ///
    /// Cancellation stops scheduling further writes; completed writes stay.
    pub async fn run<P>(
        &self,
        port: &mut P,
        snapshot: &ScanSnapshot,
        cv: Option<&CvRecord>,
        cancel: &CancellationToken,
    ) -> RunReport
    where
        P: FieldPort + ?Sized,
    {
        let mut report = RunReport::new();
        let fields: Vec<_> = snapshot.writable(self.options.write_threshold).collect();
        debug!("Filling {} fields (run {})", fields.len(), report.run_id);

        for (index, mapping) in fields.iter().enumerate() {
            if index > 0 && !self.options.field_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.options.field_delay) => {}
                }
            }
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            report.record(fill_field(port, mapping, self.options.show_feedback));
        }

        if !report.cancelled {
            match cv {
                Some(cv) => {
                    for upload in upload_order(&snapshot.uploads) {
                        if cancel.is_cancelled() {
                            report.cancelled = true;
                            break;
                        }
                        report.record(upload_file(port, upload, cv, self.options.show_feedback));
                    }
                }
                None if !snapshot.uploads.is_empty() => {
                    debug!("No stored CV; skipping {} upload fields", snapshot.uploads.len());
                }
                None => {}
            }
        }

        report.finish();
        info!(
            run_id = %report.run_id,
            fields_filled = report.fields_filled,
            files_uploaded = report.files_uploaded,
            skipped = report.skipped,
            errors = report.errors.len(),
            cancelled = report.cancelled,
            "Fill run complete"
        );
        report
    }
}

/// CV-purpose uploads first, then by descending confidence. Stable, so equal
/// uploads keep document order.
fn upload_order(uploads: &[FileUploadMapping]) -> Vec<&FileUploadMapping> {
    let mut ordered: Vec<&FileUploadMapping> = uploads.iter().collect();
    ordered.sort_by(|a, b| {
        let a_cv = a.purpose == UploadPurpose::CvResume;
        let b_cv = b.purpose == UploadPurpose::CvResume;
        b_cv.cmp(&a_cv).then_with(|| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        })
    });
    ordered
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
