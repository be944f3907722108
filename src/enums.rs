use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fields of the patient form, in the order they are declared (and reported when missing).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Identification,
    Age,
    Sex,
    Localization,
    Observacion,
    Image,
}

impl FormField {
    /// The text fields, without [FormField::Image].
    pub const TEXT_FIELDS: [FormField; 6] = [
        FormField::Name,
        FormField::Identification,
        FormField::Age,
        FormField::Sex,
        FormField::Localization,
        FormField::Observacion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Identification => "identification",
            FormField::Age => "age",
            FormField::Sex => "sex",
            FormField::Localization => "localization",
            FormField::Observacion => "observacion",
            FormField::Image => "image",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Masculino,
    Femenino,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Masculino => "masculino",
            Sex::Femenino => "femenino",
        }
    }
}

/// Anatomical site of the lesion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LesionLocalization {
    #[serde(rename = "Miembro inferior")]
    MiembroInferior,
    #[serde(rename = "Cabeza/cuello")]
    CabezaCuello,
    #[serde(rename = "Tórax anterior")]
    ToraxAnterior,
    #[serde(rename = "Miembro superior")]
    MiembroSuperior,
    #[serde(rename = "Espalda")]
    Espalda,
    #[serde(rename = "Palmas/plantas")]
    PalmasPlantas,
    #[serde(rename = "Lateral torso")]
    LateralTorso,
    #[serde(rename = "Oral/genital")]
    OralGenital,
}

impl LesionLocalization {
    pub const ALL: [LesionLocalization; 8] = [
        LesionLocalization::MiembroInferior,
        LesionLocalization::CabezaCuello,
        LesionLocalization::ToraxAnterior,
        LesionLocalization::MiembroSuperior,
        LesionLocalization::Espalda,
        LesionLocalization::PalmasPlantas,
        LesionLocalization::LateralTorso,
        LesionLocalization::OralGenital,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LesionLocalization::MiembroInferior => "Miembro inferior",
            LesionLocalization::CabezaCuello => "Cabeza/cuello",
            LesionLocalization::ToraxAnterior => "Tórax anterior",
            LesionLocalization::MiembroSuperior => "Miembro superior",
            LesionLocalization::Espalda => "Espalda",
            LesionLocalization::PalmasPlantas => "Palmas/plantas",
            LesionLocalization::LateralTorso => "Lateral torso",
            LesionLocalization::OralGenital => "Oral/genital",
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("\"{value}\" is not a valid {what}")]
pub struct UnknownOption {
    what: &'static str,
    value: String,
}

impl FromStr for Sex {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Sex::Masculino, Sex::Femenino]
            .into_iter()
            .find(|sex| sex.as_str() == s)
            .ok_or_else(|| UnknownOption {
                what: "sex",
                value: s.to_string(),
            })
    }
}

impl FromStr for LesionLocalization {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|site| site.as_str() == s)
            .ok_or_else(|| UnknownOption {
                what: "lesion localization",
                value: s.to_string(),
            })
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for LesionLocalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
