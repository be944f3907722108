use time::OffsetDateTime;
use tokio::sync::Semaphore;
use ulid::Ulid;

use crate::backend::{DermaBackend, PredictRequest};
use crate::delivery::ReportDownload;
use crate::error::DermaError;
use crate::form::ValidatedSubmission;
use crate::report_request::ReportRequest;

/// What became of a call to [SubmissionOrchestrator::submit].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Prediction and report both succeeded.
    Delivered(ReportDownload),
    /// Another submission was still in flight, so nothing was sent.
    Skipped,
}

/// Sequences the two-phase workflow: `POST /predict`, then `POST /generate-pdf` using
/// the storage locations from the prediction.
///
/// At most one submission runs at a time.
pub struct SubmissionOrchestrator<B> {
    backend: B,
    in_flight: Semaphore,
}

impl<B: DermaBackend> SubmissionOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            in_flight: Semaphore::new(1),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether a submission is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.available_permits() == 0
    }

    /// Submit the form data for prediction, then request the report.
    ///
    /// The report is only requested after a successful prediction which includes
    /// `imagen.ruta_imagen`.
    pub async fn submit(
        &self,
        submission: ValidatedSubmission,
    ) -> Result<SubmitOutcome, DermaError> {
        let Ok(_permit) = self.in_flight.try_acquire() else {
            tracing::warn!("A submission is already in flight, ignoring.");
            return Ok(SubmitOutcome::Skipped);
        };
        let submission_id = Ulid::new();
        let identification = submission.identification.clone();

        tracing::info!(submission = %submission_id, step = "predict");
        let prediction = self
            .backend
            .predict(PredictRequest::from(submission))
            .await
            .inspect_err(|e| log_failure(submission_id, "predict", e))?;

        let Some(image_path) = prediction.image_path().cloned() else {
            tracing::error!(
                submission = %submission_id,
                "prediction response is missing imagen.ruta_imagen"
            );
            return Err(DermaError::MissingImagePath);
        };
        tracing::info!(
            submission = %submission_id,
            predicted_class = prediction.predicted_class.as_deref().unwrap_or(""),
            image_path = image_path.as_str(),
            "prediction received"
        );

        let request = ReportRequest::new(prediction, image_path);
        tracing::info!(submission = %submission_id, step = "generate-pdf");
        let pdf = self
            .backend
            .generate_report(&request)
            .await
            .inspect_err(|e| log_failure(submission_id, "generate-pdf", e))?;
        tracing::info!(submission = %submission_id, size = pdf.len(), "report received");

        let today = OffsetDateTime::now_utc().date();
        Ok(SubmitOutcome::Delivered(ReportDownload::for_patient(
            &identification,
            today,
            pdf,
        )))
    }
}

fn log_failure(submission_id: Ulid, step: &'static str, e: &DermaError) {
    tracing::error!(submission = %submission_id, step, error = %e);
}
