use crate::backend::DermaBackend;
use crate::delivery::ReportDownload;
use crate::error::DermaError;
use crate::model::{HistoricalRecord, ReportFile};
use crate::types::{PatientId, ReportFilename};

/// Browses past predictions and re-downloads their reports.
pub struct HistoryBrowser<B> {
    backend: B,
    records: Vec<HistoricalRecord>,
}

impl<B: DermaBackend> HistoryBrowser<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            records: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch all past predictions, replacing whatever was loaded before.
    pub async fn load(&mut self) -> Result<&[HistoricalRecord], DermaError> {
        self.records = self.backend.list_predictions().await?;
        tracing::info!(count = self.records.len(), "predictions loaded");
        Ok(&self.records)
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    /// Records whose identification number contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&HistoricalRecord> {
        filter_by_identification(&self.records, query)
    }

    /// Download the most recent report of a patient.
    pub async fn download_latest_report(
        &self,
        patient_id: &PatientId,
    ) -> Result<ReportDownload, DermaError> {
        let files = self.backend.list_reports().await?;
        let file = latest_report_for(&files, patient_id)
            .ok_or_else(|| DermaError::NoReportForPatient(patient_id.clone()))?;
        tracing::info!(
            patient_id = patient_id.as_str(),
            timestamp = file.timestamp.as_str(),
            "downloading report"
        );
        let bytes = self.backend.fetch_report(file).await?;
        Ok(ReportDownload {
            filename: ReportFilename::new(file.filename.clone()),
            bytes,
        })
    }
}

pub fn filter_by_identification<'a>(
    records: &'a [HistoricalRecord],
    query: &str,
) -> Vec<&'a HistoricalRecord> {
    let query = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record
                .paciente
                .numero_identificacion
                .as_ref()
                .map(|id| id.to_string().to_lowercase())
                .unwrap_or_default()
                .contains(&query)
        })
        .collect()
}

/// The report of `patient_id` with the lexically greatest timestamp.
pub fn latest_report_for<'a>(
    files: &'a [ReportFile],
    patient_id: &PatientId,
) -> Option<&'a ReportFile> {
    files
        .iter()
        .filter(|file| file.patient_id.to_string() == patient_id.as_str())
        .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
}
