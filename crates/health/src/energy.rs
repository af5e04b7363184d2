use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validation::{Checks, FieldReader, FromForm, UnknownChoice, Validate, ValidationErrors};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Female,
    Male,
}

impl FromStr for Sex {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Self::Female),
            "male" | "m" => Ok(Self::Male),
            _ => Err(UnknownChoice::new(s, "female, male")),
        }
    }
}

/// Basal metabolic rate equations, kcal/day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    #[default]
    MifflinStJeor,
    /// Roza & Shizgal revision.
    HarrisBenedict,
}

impl FromStr for BmrFormula {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "mifflinstjeor" | "mifflin" => Ok(Self::MifflinStJeor),
            "harrisbenedict" | "harris" => Ok(Self::HarrisBenedict),
            _ => Err(UnknownChoice::new(s, "mifflin-st-jeor, harris-benedict")),
        }
    }
}

/// Multiplier from BMR to total daily energy expenditure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "veryactive" => Ok(Self::VeryActive),
            _ => Err(UnknownChoice::new(
                s,
                "sedentary, light, moderate, active, very-active",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdeeParams {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    pub formula: BmrFormula,
    pub activity: ActivityLevel,
}

impl Validate for TdeeParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("weight_kg", self.weight_kg)
            .at_most("weight_kg", self.weight_kg, 700.0)
            .positive("height_cm", self.height_cm)
            .at_most("height_cm", self.height_cm, 300.0)
            .between("age_years", self.age_years, 1, 120);
        checks.finish()
    }
}

impl FromForm for TdeeParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            weight_kg: reader.number("weight_kg"),
            height_cm: reader.number("height_cm"),
            age_years: reader.count("age_years"),
            sex: reader.choice("sex"),
            formula: reader.choice_or("formula", BmrFormula::default()),
            activity: reader.choice_or("activity", ActivityLevel::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyResult {
    pub bmr: f64,
    pub tdee: f64,
}

pub fn basal_metabolic_rate(params: &TdeeParams) -> f64 {
    let (w, h, a) = (params.weight_kg, params.height_cm, f64::from(params.age_years));
    match (params.formula, params.sex) {
        (BmrFormula::MifflinStJeor, Sex::Male) => 10.0 * w + 6.25 * h - 5.0 * a + 5.0,
        (BmrFormula::MifflinStJeor, Sex::Female) => 10.0 * w + 6.25 * h - 5.0 * a - 161.0,
        (BmrFormula::HarrisBenedict, Sex::Male) => 88.362 + 13.397 * w + 4.799 * h - 5.677 * a,
        (BmrFormula::HarrisBenedict, Sex::Female) => 447.593 + 9.247 * w + 3.098 * h - 4.330 * a,
    }
}

pub fn daily_energy_expenditure(params: &TdeeParams) -> EnergyResult {
    let bmr = basal_metabolic_rate(params);
    let tdee = bmr * params.activity.factor();
    tracing::debug!(formula = ?params.formula, activity = ?params.activity, bmr, tdee, "Energy expenditure computed");
    EnergyResult { bmr, tdee }
}

/// Activities with their metabolic equivalent (Compendium of Physical Activities).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Sleeping,
    Sitting,
    Yoga,
    #[default]
    Walking,
    BriskWalking,
    Dancing,
    Swimming,
    Hiking,
    Cycling,
    Running,
    JumpingRope,
}

impl Activity {
    pub fn met(&self) -> f64 {
        match self {
            Activity::Sleeping => 0.95,
            Activity::Sitting => 1.3,
            Activity::Yoga => 2.5,
            Activity::Walking => 3.5,
            Activity::BriskWalking => 4.3,
            Activity::Dancing => 5.0,
            Activity::Swimming => 5.8,
            Activity::Hiking => 6.0,
            Activity::Cycling => 8.0,
            Activity::Running => 9.8,
            Activity::JumpingRope => 12.3,
        }
    }
}

impl FromStr for Activity {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "sleeping" => Ok(Self::Sleeping),
            "sitting" => Ok(Self::Sitting),
            "yoga" => Ok(Self::Yoga),
            "walking" => Ok(Self::Walking),
            "briskwalking" => Ok(Self::BriskWalking),
            "dancing" => Ok(Self::Dancing),
            "swimming" => Ok(Self::Swimming),
            "hiking" => Ok(Self::Hiking),
            "cycling" => Ok(Self::Cycling),
            "running" => Ok(Self::Running),
            "jumpingrope" => Ok(Self::JumpingRope),
            _ => Err(UnknownChoice::new(
                s,
                "sleeping, sitting, yoga, walking, brisk-walking, dancing, swimming, hiking, cycling, running, jumping-rope",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCaloriesParams {
    pub activity: Activity,
    pub weight_kg: f64,
    pub minutes: f64,
}

impl Validate for ActivityCaloriesParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("weight_kg", self.weight_kg)
            .at_most("weight_kg", self.weight_kg, 700.0)
            .positive("minutes", self.minutes)
            .at_most("minutes", self.minutes, 1440.0);
        checks.finish()
    }
}

impl FromForm for ActivityCaloriesParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            activity: reader.choice("activity"),
            weight_kg: reader.number("weight_kg"),
            minutes: reader.number("minutes"),
        }
    }
}

/// kcal burned: `MET · 3.5 · kg / 200` per minute.
pub fn activity_calories(params: &ActivityCaloriesParams) -> f64 {
    let kcal = params.activity.met() * 3.5 * params.weight_kg / 200.0 * params.minutes;
    tracing::debug!(activity = ?params.activity, kcal, "Activity calories computed");
    kcal
}
