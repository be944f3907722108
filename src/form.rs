use bytes::Bytes;
use serde::Serialize;

use crate::enums::{FormField, LesionLocalization, Sex};
use crate::field_rules::{accepts_age, accepts_identification, accepts_name};
use crate::types::PatientId;

/// Result of [PatientForm::update_field].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    /// The value was stored.
    Accepted,
    /// The value was rejected and the previous value kept.
    Rejected,
}

/// An image file chosen by the operator.
#[derive(Clone, Debug, Serialize)]
pub struct ImageFile {
    pub filename: String,
    /// Original file contents. These are the bytes which get submitted.
    #[serde(skip)]
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Patient metadata and selected image, editable until submission.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PatientForm {
    name: String,
    identification: String,
    age: String,
    sex: Option<Sex>,
    localization: Option<LesionLocalization>,
    observacion: String,
    image: Option<ImageFile>,
}

/// The names of required fields which were empty, in declared order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required fields: {}", display_fields(.0))]
pub struct MissingFields(pub Vec<FormField>);

fn display_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(FormField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A snapshot of a complete [PatientForm], ready to be sent to the backend.
#[derive(Clone, Debug)]
pub struct ValidatedSubmission {
    pub name: String,
    pub identification: PatientId,
    /// Kept as entered. See [ValidatedSubmission::age_number].
    pub age: String,
    pub sex: Sex,
    pub localization: LesionLocalization,
    pub observacion: String,
    pub image: ImageFile,
}

impl ValidatedSubmission {
    /// Age as a number, or 0 if it is not numeric.
    pub fn age_number(&self) -> u32 {
        self.age.parse().unwrap_or(0)
    }
}

impl PatientForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field from raw operator input.
    ///
    /// `name`, `identification` and `age` must satisfy their patterns, and `sex` and
    /// `localization` must name an option (or be empty to unset). Other values are quietly
    /// rejected, keeping the prior value.
    pub fn update_field(&mut self, field: FormField, raw: &str) -> FieldUpdate {
        let accepted = match field {
            FormField::Name => replace_if(&mut self.name, raw, accepts_name),
            FormField::Identification => {
                replace_if(&mut self.identification, raw, accepts_identification)
            }
            FormField::Age => replace_if(&mut self.age, raw, accepts_age),
            FormField::Sex => select_option(&mut self.sex, raw),
            FormField::Localization => select_option(&mut self.localization, raw),
            FormField::Observacion => replace_if(&mut self.observacion, raw, |_| true),
            FormField::Image => false,
        };
        if accepted {
            FieldUpdate::Accepted
        } else {
            tracing::trace!(field = field.as_str(), "edit rejected");
            FieldUpdate::Rejected
        }
    }

    pub fn select_sex(&mut self, sex: Option<Sex>) {
        self.sex = sex;
    }

    pub fn select_localization(&mut self, localization: Option<LesionLocalization>) {
        self.localization = localization;
    }

    pub fn set_image(&mut self, image: ImageFile) {
        self.image = Some(image);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identification(&self) -> &str {
        &self.identification
    }

    pub fn age(&self) -> &str {
        &self.age
    }

    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    pub fn localization(&self) -> Option<LesionLocalization> {
        self.localization
    }

    pub fn observacion(&self) -> &str {
        &self.observacion
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    /// Check that every required field is filled in.
    pub fn validate_for_submission(&self) -> Result<ValidatedSubmission, MissingFields> {
        let missing: Vec<_> = FormField::TEXT_FIELDS
            .into_iter()
            .chain(std::iter::once(FormField::Image))
            .filter(|field| self.is_empty(*field))
            .collect();
        match (self.sex, self.localization, &self.image) {
            (Some(sex), Some(localization), Some(image)) if missing.is_empty() => {
                Ok(ValidatedSubmission {
                    name: self.name.clone(),
                    identification: PatientId::new(self.identification.clone()),
                    age: self.age.clone(),
                    sex,
                    localization,
                    observacion: self.observacion.clone(),
                    image: image.clone(),
                })
            }
            _ => Err(MissingFields(missing)),
        }
    }

    fn is_empty(&self, field: FormField) -> bool {
        match field {
            FormField::Name => self.name.is_empty(),
            FormField::Identification => self.identification.is_empty(),
            FormField::Age => self.age.is_empty(),
            FormField::Sex => self.sex.is_none(),
            FormField::Localization => self.localization.is_none(),
            FormField::Observacion => self.observacion.is_empty(),
            FormField::Image => self.image.is_none(),
        }
    }
}

fn replace_if(slot: &mut String, raw: &str, accepts: impl FnOnce(&str) -> bool) -> bool {
    if accepts(raw) {
        raw.clone_into(slot);
        true
    } else {
        false
    }
}

fn select_option<T: std::str::FromStr>(slot: &mut Option<T>, raw: &str) -> bool {
    if raw.is_empty() {
        *slot = None;
        return true;
    }
    match raw.parse() {
        Ok(value) => {
            *slot = Some(value);
            true
        }
        Err(_) => false,
    }
}
