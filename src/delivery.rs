//! Handing report documents over to the host environment.
//!
//! A download is the PDF bytes together with a suggested filename. Where it ends up
//! (a directory, memory, an HTTP response of our own...) is up to the [ReportSink].

use std::future::Future;

use bytes::Bytes;
use camino::{Utf8Path, Utf8PathBuf};
use time::Date;
use time::macros::format_description;

use crate::error::DermaError;
use crate::types::{PatientId, ReportFilename};

/// A report document ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportDownload {
    pub filename: ReportFilename,
    pub bytes: Bytes,
}

impl ReportDownload {
    /// A freshly generated report, named `Reporte_Diagnostico_{identification}_{date}.pdf`.
    pub fn for_patient(identification: &PatientId, date: Date, bytes: Bytes) -> Self {
        Self {
            filename: report_filename(identification, date),
            bytes,
        }
    }
}

pub fn report_filename(identification: &PatientId, date: Date) -> ReportFilename {
    let date = date
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string());
    ReportFilename::new(format!("Reporte_Diagnostico_{identification}_{date}.pdf"))
}

/// Somewhere for downloaded reports to go.
pub trait ReportSink {
    fn deliver(
        &mut self,
        report: ReportDownload,
    ) -> impl Future<Output = Result<(), DermaError>> + Send;
}

/// Keeps reports in memory.
impl ReportSink for Vec<ReportDownload> {
    async fn deliver(&mut self, report: ReportDownload) -> Result<(), DermaError> {
        self.push(report);
        Ok(())
    }
}

/// Writes reports as files in a directory.
pub struct DirectorySink {
    dir: Utf8PathBuf,
    saved: Vec<Utf8PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            saved: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Paths of files written so far.
    pub fn saved(&self) -> &[Utf8PathBuf] {
        &self.saved
    }
}

impl ReportSink for DirectorySink {
    async fn deliver(&mut self, report: ReportDownload) -> Result<(), DermaError> {
        fs_err::tokio::create_dir_all(&self.dir).await?;
        // the filename comes from the backend for historical reports
        let basename = Utf8Path::new(report.filename.as_str())
            .file_name()
            .unwrap_or("report.pdf");
        let dst = self.dir.join(basename);
        fs_err::tokio::write(&dst, &report.bytes).await?;
        tracing::info!(path = dst.as_str(), size = report.bytes.len(), "report saved");
        self.saved.push(dst);
        Ok(())
    }
}
