use aliri_braid::braid;

/// A patient's identification number, as typed into the form or listed by the backend.
#[braid(serde)]
pub struct PatientId;

/// Path in the backend's storage to an uploaded dermatoscopic image.
#[braid(serde)]
pub struct ImagePath;

/// Suggested filename for a downloaded report.
#[braid(serde)]
pub struct ReportFilename;
