//! Response bodies of the DermaDetect backend.
//!
//! Known fields are typed, every field is optional, and unknown fields are kept
//! so that a [PredictionResult] can be forwarded verbatim to the report endpoint.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::ImagePath;

/// Lesion class name to probability in [0, 1].
pub type Probabilities = BTreeMap<String, f64>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_identificacion: Option<MaybeU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edad: Option<MaybeU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sexo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_registro: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localizacion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_cancer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_diagnostico: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruta_imagen: Option<ImagePath>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where the backend stored the files of a prediction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageInfo {
    #[serde(default)]
    pub patient_dir: Option<String>,
    #[serde(default)]
    pub diagnosis_date: Option<String>,
}

/// Response of `POST /predict`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub paciente: Patient,
    #[serde(default)]
    pub diagnostico: Diagnosis,
    #[serde(default)]
    pub imagen: Option<ImageInfo>,
    #[serde(default)]
    pub predicted_class: Option<String>,
    #[serde(default)]
    pub probabilities: Probabilities,
    #[serde(default)]
    pub storage_info: Option<StorageInfo>,
}

impl PredictionResult {
    /// Where the backend stored the submitted image. An empty path counts as absent.
    pub fn image_path(&self) -> Option<&ImagePath> {
        self.imagen
            .as_ref()
            .and_then(|i| i.ruta_imagen.as_ref())
            .filter(|path| !path.as_str().is_empty())
    }

    /// The class with the greatest probability.
    pub fn most_likely_class(&self) -> Option<(&str, f64)> {
        most_likely(&self.probabilities)
    }
}

/// One row of `GET /get_predictions`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(default)]
    pub paciente: Patient,
    #[serde(default)]
    pub diagnostico: Diagnosis,
    #[serde(default)]
    pub imagen: Option<ImageInfo>,
    #[serde(default)]
    pub probabilities: Probabilities,
    #[serde(default)]
    pub predicted_class: Option<String>,
}

/// One entry of `GET /pdfs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportFile {
    pub patient_id: MaybeU32,
    pub filename: String,
    /// Lexically sortable (ISO-8601) creation time.
    pub timestamp: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// Body of `GET /imagenes/`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GalleryListing {
    #[serde(default)]
    pub imagenes: Vec<String>,
}

/// Body of `GET /descripcion/`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GalleryDescription {
    #[serde(default)]
    pub descripcion: String,
}

/// Ties go to the first class in key order.
pub(crate) fn most_likely(probabilities: &Probabilities) -> Option<(&str, f64)> {
    probabilities
        .iter()
        .fold(None, |best: Option<(&str, f64)>, (class, p)| match best {
            Some((_, best_p)) if best_p >= *p => best,
            _ => Some((class.as_str(), *p)),
        })
}

/// A probability as a percentage with one decimal, e.g. `"87.3%"`.
pub fn format_probability(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Something that is maybe a [u32], but in case it's not valid, is a [String].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybeU32 {
    U32(u32),
    String(String),
}

impl From<&str> for MaybeU32 {
    fn from(value: &str) -> Self {
        value
            .parse()
            .map(Self::U32)
            .unwrap_or_else(|_| MaybeU32::String(value.to_string()))
    }
}

impl Display for MaybeU32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MaybeU32::U32(i) => Cow::Owned(i.to_string()),
                MaybeU32::String(s) => Cow::Borrowed(s),
            }
        )
    }
}
