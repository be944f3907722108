use reqwest::Response;

use crate::form::MissingFields;
use crate::types::PatientId;

#[derive(thiserror::Error, Debug)]
pub enum DermaError {
    #[error(transparent)]
    Validation(#[from] MissingFields),

    #[error("The API URL is not configured (set DERMADETECT_API_URL)")]
    MissingApiUrl,

    #[error("The API URL \"{0}\" is not a valid base URL")]
    InvalidApiUrl(String),

    #[error("Error {status}: {text}")]
    Http {
        status: reqwest::StatusCode,
        text: String,
    },

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("The server did not return the stored image path (imagen.ruta_imagen)")]
    MissingImagePath,

    #[error("No report found for patient \"{0}\"")]
    NoReportForPatient(PatientId),

    #[error(transparent)]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

/// Turns a non-2xx response into [DermaError::Http], carrying the response body text.
pub(crate) async fn check(res: Response) -> Result<Response, DermaError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    let url = res.url().to_string();
    let text = res
        .text()
        .await
        .unwrap_or_else(|e| format!("<could not read response body: {e}>"));
    tracing::warn!(url = %url, status = status.as_u16(), "request failed");
    Err(DermaError::Http { status, text })
}
