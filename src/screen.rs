use serde::Serialize;

use crate::backend::DermaBackend;
use crate::delivery::ReportSink;
use crate::enums::FormField;
use crate::error::DermaError;
use crate::form::{FieldUpdate, ImageFile, PatientForm, ValidatedSubmission};
use crate::orchestrator::{SubmissionOrchestrator, SubmitOutcome};
use crate::preview::{Channel, ImageAdjustments, ImagePreview};

pub const SUCCESS_MESSAGE: &str = "PDF report generated and downloaded successfully.";

/// The one message shown to the operator. A new message replaces the old one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum StatusMessage {
    Error(String),
    Success(String),
}

/// Serializable snapshot of an [AnalysisScreen].
#[derive(Debug, Serialize)]
pub struct ViewState<'a> {
    pub form: &'a PatientForm,
    pub adjustments: ImageAdjustments,
    pub status: Option<&'a StatusMessage>,
    pub submitting: bool,
}

/// Controller of the analysis screen: the patient form, its image preview and
/// the outcome of the latest submission.
pub struct AnalysisScreen {
    form: PatientForm,
    preview: ImagePreview,
    status: Option<StatusMessage>,
    submitting: bool,
}

impl Default for AnalysisScreen {
    fn default() -> Self {
        Self::new(ImagePreview::new())
    }
}

impl AnalysisScreen {
    pub fn new(preview: ImagePreview) -> Self {
        Self {
            form: PatientForm::new(),
            preview,
            status: None,
            submitting: false,
        }
    }

    pub fn form(&self) -> &PatientForm {
        &self.form
    }

    pub fn preview(&self) -> &ImagePreview {
        &self.preview
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Whether the submit trigger should be disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn view_state(&self) -> ViewState<'_> {
        ViewState {
            form: &self.form,
            adjustments: self.preview.adjustments(),
            status: self.status.as_ref(),
            submitting: self.submitting,
        }
    }

    pub fn update_field(&mut self, field: FormField, raw: &str) -> FieldUpdate {
        self.form.update_field(field, raw)
    }

    /// Select a new image for both submission and preview.
    ///
    /// The form keeps the file even if the preview cannot decode it.
    pub async fn select_image(&mut self, image: ImageFile) -> Result<(), DermaError> {
        let bytes = image.bytes.clone();
        self.form.set_image(image);
        self.preview.set_image(bytes).await
    }

    pub fn set_adjustment(&mut self, channel: Channel, value: u16) {
        self.preview.set_adjustment(channel, value)
    }

    /// Validate the form and mark the screen as submitting.
    ///
    /// Returns `None`, without changing anything, if a submission is already in flight.
    /// Returns `None` and shows the missing fields if the form is incomplete.
    pub fn begin_submission(&mut self) -> Option<ValidatedSubmission> {
        if self.submitting {
            tracing::debug!("submit ignored, a submission is in flight");
            return None;
        }
        match self.form.validate_for_submission() {
            Ok(submission) => {
                self.status = None;
                self.submitting = true;
                Some(submission)
            }
            Err(missing) => {
                self.status = Some(StatusMessage::Error(DermaError::from(missing).to_string()));
                None
            }
        }
    }

    /// Show the outcome of a submission and re-enable the submit trigger.
    pub fn finish_submission(&mut self, result: Result<(), DermaError>) {
        self.submitting = false;
        self.status = Some(match result {
            Ok(()) => StatusMessage::Success(SUCCESS_MESSAGE.to_string()),
            Err(e) => StatusMessage::Error(e.to_string()),
        });
    }

    /// Run a whole submission: validate, predict, generate the report and deliver it.
    pub async fn submit<B, S>(&mut self, orchestrator: &SubmissionOrchestrator<B>, sink: &mut S)
    where
        B: DermaBackend,
        S: ReportSink,
    {
        let Some(submission) = self.begin_submission() else {
            return;
        };
        match orchestrator.submit(submission).await {
            Ok(SubmitOutcome::Delivered(download)) => {
                let result = sink.deliver(download).await;
                self.finish_submission(result)
            }
            // the screen was not in flight but the orchestrator was: leave status alone
            Ok(SubmitOutcome::Skipped) => self.submitting = false,
            Err(e) => self.finish_submission(Err(e)),
        }
    }
}
