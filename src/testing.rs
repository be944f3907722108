//! A [DermaBackend] which records calls and answers from canned data.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use rstest::fixture;
use tokio::sync::Notify;

use crate::backend::{DermaBackend, PredictRequest};
use crate::enums::{LesionLocalization, Sex};
use crate::error::DermaError;
use crate::form::{ImageFile, ValidatedSubmission};
use crate::model::{HistoricalRecord, PredictionResult, ReportFile};
use crate::report_request::ReportRequest;
use crate::types::PatientId;

#[derive(Debug, Clone)]
pub(crate) enum StubCall {
    Predict(PredictRequest),
    GenerateReport(ReportRequest),
    ListPredictions,
    ListReports,
    FetchReport(ReportFile),
    ListGalleryImages,
    GalleryDescription,
    FetchGalleryImage(String),
}

pub(crate) struct StubBackend {
    prediction: PredictionResult,
    predict_error: Option<(reqwest::StatusCode, String)>,
    report_error: Option<(reqwest::StatusCode, String)>,
    records: Vec<HistoricalRecord>,
    reports: Vec<ReportFile>,
    gallery: Vec<String>,
    description: String,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<StubCall>>,
}

impl StubBackend {
    pub(crate) const PDF: &'static [u8] = b"%PDF-1.4 stub report";

    pub(crate) fn new(prediction: PredictionResult) -> Self {
        Self {
            prediction,
            predict_error: None,
            report_error: None,
            records: Vec::new(),
            reports: Vec::new(),
            gallery: Vec::new(),
            description: String::new(),
            gate: None,
            calls: Default::default(),
        }
    }

    pub(crate) fn failing_predict(mut self, status: reqwest::StatusCode, text: &str) -> Self {
        self.predict_error = Some((status, text.to_string()));
        self
    }

    pub(crate) fn failing_report(mut self, status: reqwest::StatusCode, text: &str) -> Self {
        self.report_error = Some((status, text.to_string()));
        self
    }

    pub(crate) fn with_records(mut self, records: Vec<HistoricalRecord>) -> Self {
        self.records = records;
        self
    }

    pub(crate) fn with_reports(mut self, reports: Vec<ReportFile>) -> Self {
        self.reports = reports;
        self
    }

    pub(crate) fn with_gallery(mut self, images: &[&str], description: &str) -> Self {
        self.gallery = images.iter().map(|s| s.to_string()).collect();
        self.description = description.to_string();
        self
    }

    /// Make `predict` wait until the returned [Notify] is notified.
    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub(crate) fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StubCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn http_error((status, text): &(reqwest::StatusCode, String)) -> DermaError {
    DermaError::Http {
        status: *status,
        text: text.clone(),
    }
}

impl DermaBackend for StubBackend {
    async fn predict(&self, request: PredictRequest) -> Result<PredictionResult, DermaError> {
        self.record(StubCall::Predict(request));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.predict_error {
            Some(e) => Err(http_error(e)),
            None => Ok(self.prediction.clone()),
        }
    }

    async fn generate_report(&self, request: &ReportRequest) -> Result<Bytes, DermaError> {
        self.record(StubCall::GenerateReport(request.clone()));
        match &self.report_error {
            Some(e) => Err(http_error(e)),
            None => Ok(Bytes::from_static(Self::PDF)),
        }
    }

    async fn list_predictions(&self) -> Result<Vec<HistoricalRecord>, DermaError> {
        self.record(StubCall::ListPredictions);
        Ok(self.records.clone())
    }

    async fn list_reports(&self) -> Result<Vec<ReportFile>, DermaError> {
        self.record(StubCall::ListReports);
        Ok(self.reports.clone())
    }

    async fn fetch_report(&self, file: &ReportFile) -> Result<Bytes, DermaError> {
        self.record(StubCall::FetchReport(file.clone()));
        Ok(Bytes::from(format!("%PDF {}", file.timestamp)))
    }

    async fn list_gallery_images(&self) -> Result<Vec<String>, DermaError> {
        self.record(StubCall::ListGalleryImages);
        Ok(self.gallery.clone())
    }

    async fn gallery_description(&self) -> Result<String, DermaError> {
        self.record(StubCall::GalleryDescription);
        Ok(self.description.clone())
    }

    async fn fetch_gallery_image(&self, name: &str) -> Result<Bytes, DermaError> {
        self.record(StubCall::FetchGalleryImage(name.to_string()));
        Ok(Bytes::from(name.as_bytes().to_vec()))
    }

    fn gallery_image_url(&self, name: &str) -> String {
        format!("http://stub/imagenes/{name}")
    }
}

/// A prediction response as returned by a well-behaved backend.
pub(crate) fn valid_prediction() -> PredictionResult {
    serde_json::from_value(serde_json::json!({
        "paciente": {
            "nombre": "Ana Lima",
            "numero_identificacion": "12345678",
            "edad": 45,
            "sexo": "femenino"
        },
        "diagnostico": {
            "localizacion": "Espalda",
            "observacion": "lesion pigmentada",
            "tipo_cancer": "benigno",
            "fecha_diagnostico": "2024-01-01T10:00:00"
        },
        "imagen": {"ruta_imagen": "/img/1.png"},
        "predicted_class": "nv",
        "probabilities": {"nv": 0.91, "mel": 0.06, "bkl": 0.03},
        "storage_info": {"patient_dir": "p1", "diagnosis_date": "2024-01-01"}
    }))
    .unwrap()
}

#[fixture]
pub(crate) fn complete_submission() -> ValidatedSubmission {
    ValidatedSubmission {
        name: "Ana Lima".to_string(),
        identification: PatientId::from_static("12345678"),
        age: "45".to_string(),
        sex: Sex::Femenino,
        localization: LesionLocalization::Espalda,
        observacion: "lesion pigmentada".to_string(),
        image: ImageFile::new("lesion.png", &b"\x89PNG\r\n\x1a\n"[..]),
    }
}
