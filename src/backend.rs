use std::future::Future;

use bytes::Bytes;

use crate::enums::{LesionLocalization, Sex};
use crate::error::DermaError;
use crate::form::{ImageFile, ValidatedSubmission};
use crate::model::{HistoricalRecord, PredictionResult, ReportFile};
use crate::report_request::ReportRequest;

/// The multipart body of `POST /predict`.
#[derive(Clone, Debug)]
pub struct PredictRequest {
    pub file: ImageFile,
    pub age: u32,
    pub sex: Sex,
    pub localization: LesionLocalization,
    pub name: String,
    pub identification: String,
    pub observacion: String,
}

impl From<ValidatedSubmission> for PredictRequest {
    fn from(submission: ValidatedSubmission) -> Self {
        Self {
            age: submission.age_number(),
            file: submission.image,
            sex: submission.sex,
            localization: submission.localization,
            name: submission.name,
            identification: submission.identification.take(),
            observacion: submission.observacion,
        }
    }
}

/// The DermaDetect inference and report service.
///
/// [crate::DermaClient] talks to it over HTTP.
pub trait DermaBackend {
    /// `POST /predict`
    fn predict(
        &self,
        request: PredictRequest,
    ) -> impl Future<Output = Result<PredictionResult, DermaError>> + Send;

    /// `POST /generate-pdf`, producing a PDF document.
    fn generate_report(
        &self,
        request: &ReportRequest,
    ) -> impl Future<Output = Result<Bytes, DermaError>> + Send;

    /// `GET /get_predictions`
    fn list_predictions(
        &self,
    ) -> impl Future<Output = Result<Vec<HistoricalRecord>, DermaError>> + Send;

    /// `GET /pdfs`
    fn list_reports(&self) -> impl Future<Output = Result<Vec<ReportFile>, DermaError>> + Send;

    /// `GET /pdfs/{patient_id}/{timestamp}/{filename}`
    fn fetch_report(
        &self,
        file: &ReportFile,
    ) -> impl Future<Output = Result<Bytes, DermaError>> + Send;

    /// `GET /imagenes/`, producing image filenames.
    fn list_gallery_images(&self)
    -> impl Future<Output = Result<Vec<String>, DermaError>> + Send;

    /// `GET /descripcion/`
    fn gallery_description(&self) -> impl Future<Output = Result<String, DermaError>> + Send;

    /// `GET /imagenes/{name}`
    fn fetch_gallery_image(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Bytes, DermaError>> + Send;

    /// URL at which a gallery image can be viewed.
    fn gallery_image_url(&self, name: &str) -> String;
}
