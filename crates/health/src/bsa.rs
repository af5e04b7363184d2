use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validation::{Checks, FieldReader, FromForm, UnknownChoice, Validate, ValidationErrors};

/// Published body-surface-area regressions. All take kg and cm and yield m².
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BsaFormula {
    #[default]
    Mosteller,
    DuBois,
    Haycock,
    GehanGeorge,
}

impl BsaFormula {
    pub fn apply(&self, weight_kg: f64, height_cm: f64) -> f64 {
        match self {
            BsaFormula::Mosteller => (weight_kg * height_cm / 3600.0).sqrt(),
            BsaFormula::DuBois => 0.007184 * weight_kg.powf(0.425) * height_cm.powf(0.725),
            BsaFormula::Haycock => 0.024265 * weight_kg.powf(0.5378) * height_cm.powf(0.3964),
            BsaFormula::GehanGeorge => 0.0235 * weight_kg.powf(0.51456) * height_cm.powf(0.42246),
        }
    }
}

impl FromStr for BsaFormula {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "mosteller" => Ok(Self::Mosteller),
            "dubois" => Ok(Self::DuBois),
            "haycock" => Ok(Self::Haycock),
            "gehangeorge" | "gehan" => Ok(Self::GehanGeorge),
            _ => Err(UnknownChoice::new(s, "mosteller, du-bois, haycock, gehan-george")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BsaParams {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub formula: BsaFormula,
}

impl Validate for BsaParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("weight_kg", self.weight_kg)
            .at_most("weight_kg", self.weight_kg, 700.0)
            .positive("height_cm", self.height_cm)
            .at_most("height_cm", self.height_cm, 300.0);
        checks.finish()
    }
}

impl FromForm for BsaParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            weight_kg: reader.number("weight_kg"),
            height_cm: reader.number("height_cm"),
            formula: reader.choice_or("formula", BsaFormula::default()),
        }
    }
}

/// Body surface area in m².
pub fn body_surface_area(params: &BsaParams) -> f64 {
    let bsa = params.formula.apply(params.weight_kg, params.height_cm);
    tracing::debug!(formula = ?params.formula, bsa, "Body surface area computed");
    bsa
}
