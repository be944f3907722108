use serde::Serialize;

use crate::model::{Diagnosis, ImageInfo, Patient, PredictionResult, Probabilities};
use crate::types::ImagePath;

/// Body of `POST /generate-pdf`, derived from a [PredictionResult].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportRequest {
    pub result: ReportResult,
    pub patient_dir: String,
    pub diagnosis_date: String,
    pub original_image_path: ImagePath,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportResult {
    pub paciente: Patient,
    pub diagnostico: Diagnosis,
    pub imagen: ImageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_class: Option<String>,
    pub probabilities: Probabilities,
}

impl ReportRequest {
    /// Copy the fields of `prediction` needed by the report endpoint.
    ///
    /// `image_path` is the resolved `imagen.ruta_imagen` of the prediction. It overwrites
    /// whatever the `imagen` block contains and is repeated as `original_image_path`.
    pub fn new(prediction: PredictionResult, image_path: ImagePath) -> Self {
        let PredictionResult {
            paciente,
            diagnostico,
            imagen,
            predicted_class,
            probabilities,
            storage_info,
        } = prediction;
        let storage_info = storage_info.unwrap_or_default();
        let imagen = ImageInfo {
            ruta_imagen: Some(image_path.clone()),
            ..imagen.unwrap_or_default()
        };
        Self {
            result: ReportResult {
                paciente,
                diagnostico,
                imagen,
                predicted_class,
                probabilities,
            },
            patient_dir: storage_info.patient_dir.unwrap_or_default(),
            diagnosis_date: storage_info.diagnosis_date.unwrap_or_default(),
            original_image_path: image_path,
        }
    }
}
