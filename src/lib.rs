mod backend;
mod client;
mod config;
mod delivery;
mod enums;
mod error;
mod field_rules;
mod form;
mod gallery;
mod history;
mod model;
mod orchestrator;
mod preview;
mod report_request;
mod screen;
mod settings;
#[cfg(test)]
mod testing;
mod types;

pub use backend::{DermaBackend, PredictRequest};
pub use client::DermaClient;
pub use config::get_config;
pub use delivery::{DirectorySink, ReportDownload, ReportSink, report_filename};
pub use enums::{FormField, LesionLocalization, Sex, UnknownOption};
pub use error::DermaError;
pub use form::{FieldUpdate, ImageFile, MissingFields, PatientForm, ValidatedSubmission};
pub use gallery::{Gallery, GalleryEntry, download_images, load_gallery};
pub use history::{HistoryBrowser, filter_by_identification, latest_report_for};
pub use model::{
    Diagnosis, HistoricalRecord, ImageInfo, MaybeU32, Patient, PredictionResult, Probabilities,
    ReportFile, StorageInfo, format_probability,
};
pub use orchestrator::{SubmissionOrchestrator, SubmitOutcome};
pub use preview::{Channel, ImageAdjustments, ImagePreview, RenderParams};
pub use report_request::{ReportRequest, ReportResult};
pub use screen::{AnalysisScreen, SUCCESS_MESSAGE, StatusMessage, ViewState};
pub use settings::DermaSettings;
pub use types::*;
