use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validation::{Checks, FieldReader, FromForm, UnknownChoice, Validate, ValidationErrors};

/// Scales `lb / in²` to `kg / m²`.
pub const IMPERIAL_BMI_FACTOR: f64 = 703.0;

/// Measurement system of the submitted weight and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Kilograms and centimetres.
    #[default]
    Metric,
    /// Pounds and inches.
    Imperial,
}

impl UnitSystem {
    fn max_weight(&self) -> f64 {
        match self {
            UnitSystem::Metric => 700.0,
            UnitSystem::Imperial => 1500.0,
        }
    }

    fn max_height(&self) -> f64 {
        match self {
            UnitSystem::Metric => 300.0,
            UnitSystem::Imperial => 120.0,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" | "si" => Ok(Self::Metric),
            "imperial" | "us" => Ok(Self::Imperial),
            _ => Err(UnknownChoice::new(s, "metric, imperial")),
        }
    }
}

/// WHO adult BMI bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        match bmi {
            b if b < 18.5 => BmiCategory::Underweight,
            b if b < 25.0 => BmiCategory::Normal,
            b if b < 30.0 => BmiCategory::Overweight,
            _ => BmiCategory::Obese,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiParams {
    pub weight: f64,
    pub height: f64,
    pub units: UnitSystem,
}

impl Validate for BmiParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("weight", self.weight)
            .at_most("weight", self.weight, self.units.max_weight())
            .positive("height", self.height)
            .at_most("height", self.height, self.units.max_height());
        checks.finish()
    }
}

impl FromForm for BmiParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            weight: reader.number("weight"),
            height: reader.number("height"),
            units: reader.choice_or("units", UnitSystem::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
}

pub fn body_mass_index(params: &BmiParams) -> BmiResult {
    let bmi = match params.units {
        UnitSystem::Metric => {
            let metres = params.height / 100.0;
            params.weight / (metres * metres)
        }
        UnitSystem::Imperial => IMPERIAL_BMI_FACTOR * params.weight / (params.height * params.height),
    };
    let category = BmiCategory::from_bmi(bmi);
    tracing::debug!(bmi, ?category, "BMI computed");
    BmiResult { bmi, category }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation::FormInput;

    #[test]
    fn metric_bmi() {
        let result = body_mass_index(&BmiParams {
            weight: 70.0,
            height: 175.0,
            units: UnitSystem::Metric,
        });
        assert!((result.bmi - 22.857).abs() < 0.001);
        assert_eq!(result.category, BmiCategory::Normal);
    }

    #[test]
    fn imperial_bmi_uses_703_factor() {
        let result = body_mass_index(&BmiParams {
            weight: 200.0,
            height: 70.0,
            units: UnitSystem::Imperial,
        });
        assert!((result.bmi - 28.694).abs() < 0.001);
        assert_eq!(result.category, BmiCategory::Overweight);
    }

    #[test]
    fn category_boundaries_are_lower_inclusive() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn limits_follow_the_unit_system() {
        // 250 is a plausible weight in pounds but not a height in inches.
        let form = FormInput::new()
            .with("weight", "250")
            .with("height", "250")
            .with("units", "imperial");
        let errors = BmiParams::from_form(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "height");
    }
}
