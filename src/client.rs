use std::time::Duration;

use bytes::Bytes;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};

use crate::backend::{DermaBackend, PredictRequest};
use crate::error::{DermaError, check};
use crate::model::{
    GalleryDescription, GalleryListing, HistoricalRecord, PredictionResult, ReportFile,
};
use crate::report_request::ReportRequest;
use crate::settings::DermaSettings;

/// HTTP client of the DermaDetect backend.
///
/// Constructing a client never fails because of a missing API URL. Instead, every request
/// fails with [DermaError::MissingApiUrl] before anything is sent.
#[derive(Clone, Debug)]
pub struct DermaClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl DermaClient {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self, DermaError> {
        let mut builder = reqwest::ClientBuilder::new().use_rustls_tls();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        })
    }

    pub fn from_settings(settings: &DermaSettings) -> Result<Self, DermaError> {
        Self::new(settings.api_url.clone(), settings.request_timeout)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn url(&self, path: &str) -> Result<String, DermaError> {
        self.base_url
            .as_deref()
            .map(|base| format!("{base}{path}"))
            .ok_or(DermaError::MissingApiUrl)
    }

    /// `{base}/{segments...}`, with each segment percent-encoded.
    fn segments_url(&self, segments: &[&str]) -> Result<reqwest::Url, DermaError> {
        let base = self.base_url.as_deref().ok_or(DermaError::MissingApiUrl)?;
        let invalid = || DermaError::InvalidApiUrl(base.to_string());
        let mut url = reqwest::Url::parse(base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, DermaError> {
        let url = self.url(path)?;
        tracing::debug!(url = %url, "GET");
        let res = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let data = check(res).await?.json().await?;
        Ok(data)
    }

    async fn get_bytes(&self, url: reqwest::Url) -> Result<Bytes, DermaError> {
        tracing::debug!(url = %url, "GET");
        let res = self.client.get(url).send().await?;
        let data = check(res).await?.bytes().await?;
        Ok(data)
    }
}

impl DermaBackend for DermaClient {
    async fn predict(&self, request: PredictRequest) -> Result<PredictionResult, DermaError> {
        let url = self.url("/predict")?;
        let form = predict_form(request)?;
        let res = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;
        let data = check(res).await?.json().await?;
        Ok(data)
    }

    async fn generate_report(&self, request: &ReportRequest) -> Result<Bytes, DermaError> {
        let url = self.url("/generate-pdf")?;
        let res = self
            .client
            .post(url)
            .header(ACCEPT, "application/pdf")
            .json(request)
            .send()
            .await?;
        let data = check(res).await?.bytes().await?;
        Ok(data)
    }

    async fn list_predictions(&self) -> Result<Vec<HistoricalRecord>, DermaError> {
        self.get_json("/get_predictions").await
    }

    async fn list_reports(&self) -> Result<Vec<ReportFile>, DermaError> {
        self.get_json("/pdfs").await
    }

    async fn fetch_report(&self, file: &ReportFile) -> Result<Bytes, DermaError> {
        let patient_id = file.patient_id.to_string();
        let url = self.segments_url(&["pdfs", &patient_id, &file.timestamp, &file.filename])?;
        self.get_bytes(url).await
    }

    async fn list_gallery_images(&self) -> Result<Vec<String>, DermaError> {
        let listing: GalleryListing = self.get_json("/imagenes/").await?;
        Ok(listing.imagenes)
    }

    async fn gallery_description(&self) -> Result<String, DermaError> {
        let description: GalleryDescription = self.get_json("/descripcion/").await?;
        Ok(description.descripcion)
    }

    async fn fetch_gallery_image(&self, name: &str) -> Result<Bytes, DermaError> {
        self.get_bytes(self.segments_url(&["imagenes", name])?).await
    }

    fn gallery_image_url(&self, name: &str) -> String {
        self.segments_url(&["imagenes", name])
            .map(String::from)
            .unwrap_or_default()
    }
}

fn predict_form(request: PredictRequest) -> Result<Form, DermaError> {
    let PredictRequest {
        file,
        age,
        sex,
        localization,
        name,
        identification,
        observacion,
    } = request;
    let mime = image::guess_format(&file.bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    let part = Part::bytes(file.bytes.to_vec())
        .file_name(file.filename)
        .mime_str(mime)?;
    let form = Form::new()
        .part("file", part)
        .text("age", age.to_string())
        .text("sex", sex.as_str())
        .text("localization", localization.as_str())
        .text("name", name)
        .text("identification", identification)
        .text("observacion", observacion);
    Ok(form)
}
