use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validation::{Checks, FieldReader, FromForm, UnknownChoice, Validate, ValidationErrors};

const UNIT_CHOICES: &str = "mm, cm, m, km, in, ft, yd, mi, mg, g, kg, t, oz, lb, st, ml, l, m3, tsp, tbsp, floz, cup, pt, qt, gal, c, f, k";

/// Kelvin offset of 0 °C.
const CELSIUS_OFFSET: f64 = 273.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Length,
    Mass,
    Volume,
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Millimetre,
    Centimetre,
    Metre,
    Kilometre,
    Inch,
    Foot,
    Yard,
    Mile,
}

impl LengthUnit {
    /// Size of one unit in metres.
    pub fn in_metres(&self) -> f64 {
        match self {
            LengthUnit::Millimetre => 0.001,
            LengthUnit::Centimetre => 0.01,
            LengthUnit::Metre => 1.0,
            LengthUnit::Kilometre => 1000.0,
            LengthUnit::Inch => 0.0254,
            LengthUnit::Foot => 0.3048,
            LengthUnit::Yard => 0.9144,
            LengthUnit::Mile => 1609.344,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Millimetre => "mm",
            LengthUnit::Centimetre => "cm",
            LengthUnit::Metre => "m",
            LengthUnit::Kilometre => "km",
            LengthUnit::Inch => "in",
            LengthUnit::Foot => "ft",
            LengthUnit::Yard => "yd",
            LengthUnit::Mile => "mi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassUnit {
    Milligram,
    Gram,
    Kilogram,
    Tonne,
    Ounce,
    Pound,
    Stone,
}

impl MassUnit {
    /// Size of one unit in kilograms.
    pub fn in_kilograms(&self) -> f64 {
        match self {
            MassUnit::Milligram => 1e-6,
            MassUnit::Gram => 0.001,
            MassUnit::Kilogram => 1.0,
            MassUnit::Tonne => 1000.0,
            MassUnit::Ounce => 0.028349523125,
            MassUnit::Pound => 0.45359237,
            MassUnit::Stone => 6.35029318,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Milligram => "mg",
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
            MassUnit::Tonne => "t",
            MassUnit::Ounce => "oz",
            MassUnit::Pound => "lb",
            MassUnit::Stone => "st",
        }
    }
}

/// Volume units; customary units are US measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeUnit {
    Millilitre,
    Litre,
    CubicMetre,
    Teaspoon,
    Tablespoon,
    FluidOunce,
    Cup,
    Pint,
    Quart,
    Gallon,
}

impl VolumeUnit {
    /// Size of one unit in litres.
    pub fn in_litres(&self) -> f64 {
        match self {
            VolumeUnit::Millilitre => 0.001,
            VolumeUnit::Litre => 1.0,
            VolumeUnit::CubicMetre => 1000.0,
            VolumeUnit::Teaspoon => 0.00492892159375,
            VolumeUnit::Tablespoon => 0.01478676478125,
            VolumeUnit::FluidOunce => 0.0295735295625,
            VolumeUnit::Cup => 0.2365882365,
            VolumeUnit::Pint => 0.473176473,
            VolumeUnit::Quart => 0.946352946,
            VolumeUnit::Gallon => 3.785411784,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            VolumeUnit::Millilitre => "ml",
            VolumeUnit::Litre => "l",
            VolumeUnit::CubicMetre => "m3",
            VolumeUnit::Teaspoon => "tsp",
            VolumeUnit::Tablespoon => "tbsp",
            VolumeUnit::FluidOunce => "floz",
            VolumeUnit::Cup => "cup",
            VolumeUnit::Pint => "pt",
            VolumeUnit::Quart => "qt",
            VolumeUnit::Gallon => "gal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub fn to_kelvin(&self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value + CELSIUS_OFFSET,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + CELSIUS_OFFSET,
            TemperatureUnit::Kelvin => value,
        }
    }

    pub fn from_kelvin(&self, kelvin: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => kelvin - CELSIUS_OFFSET,
            TemperatureUnit::Fahrenheit => (kelvin - CELSIUS_OFFSET) * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => kelvin,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

/// Any supported unit, tagged with its dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Length(LengthUnit),
    Mass(MassUnit),
    Volume(VolumeUnit),
    Temperature(TemperatureUnit),
}

impl Unit {
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Length(_) => Dimension::Length,
            Unit::Mass(_) => Dimension::Mass,
            Unit::Volume(_) => Dimension::Volume,
            Unit::Temperature(_) => Dimension::Temperature,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Length(u) => u.symbol(),
            Unit::Mass(u) => u.symbol(),
            Unit::Volume(u) => u.symbol(),
            Unit::Temperature(u) => u.symbol(),
        }
    }
}

/// Placeholder for unreadable form input only.
impl Default for Unit {
    fn default() -> Self {
        Unit::Length(LengthUnit::Metre)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use LengthUnit as L;
        use MassUnit as M;
        use TemperatureUnit as T;
        use VolumeUnit as V;

        let unit = match s.to_ascii_lowercase().trim_start_matches('°') {
            "mm" | "millimetre" | "millimeter" => Unit::Length(L::Millimetre),
            "cm" | "centimetre" | "centimeter" => Unit::Length(L::Centimetre),
            "m" | "metre" | "meter" => Unit::Length(L::Metre),
            "km" | "kilometre" | "kilometer" => Unit::Length(L::Kilometre),
            "in" | "inch" => Unit::Length(L::Inch),
            "ft" | "foot" | "feet" => Unit::Length(L::Foot),
            "yd" | "yard" => Unit::Length(L::Yard),
            "mi" | "mile" => Unit::Length(L::Mile),
            "mg" | "milligram" => Unit::Mass(M::Milligram),
            "g" | "gram" => Unit::Mass(M::Gram),
            "kg" | "kilogram" => Unit::Mass(M::Kilogram),
            "t" | "tonne" => Unit::Mass(M::Tonne),
            "oz" | "ounce" => Unit::Mass(M::Ounce),
            "lb" | "lbs" | "pound" => Unit::Mass(M::Pound),
            "st" | "stone" => Unit::Mass(M::Stone),
            "ml" | "millilitre" | "milliliter" => Unit::Volume(V::Millilitre),
            "l" | "litre" | "liter" => Unit::Volume(V::Litre),
            "m3" | "cubic-metre" | "cubic-meter" => Unit::Volume(V::CubicMetre),
            "tsp" | "teaspoon" => Unit::Volume(V::Teaspoon),
            "tbsp" | "tablespoon" => Unit::Volume(V::Tablespoon),
            "floz" | "fl-oz" | "fluid-ounce" => Unit::Volume(V::FluidOunce),
            "cup" => Unit::Volume(V::Cup),
            "pt" | "pint" => Unit::Volume(V::Pint),
            "qt" | "quart" => Unit::Volume(V::Quart),
            "gal" | "gallon" => Unit::Volume(V::Gallon),
            "c" | "celsius" => Unit::Temperature(T::Celsius),
            "f" | "fahrenheit" => Unit::Temperature(T::Fahrenheit),
            "k" | "kelvin" => Unit::Temperature(T::Kelvin),
            _ => return Err(UnknownChoice::new(s, UNIT_CHOICES)),
        };
        Ok(unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionParams {
    pub value: f64,
    pub from: Unit,
    pub to: Unit,
}

impl ConversionParams {
    fn below_absolute_zero(&self) -> bool {
        match self.from {
            Unit::Temperature(unit) => unit.to_kelvin(self.value) < 0.0,
            _ => false,
        }
    }
}

impl Validate for ConversionParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        match self.from {
            // Temperatures may be negative; the floor is absolute zero.
            Unit::Temperature(_) => {
                checks.ensure(
                    !self.below_absolute_zero(),
                    "value",
                    "temperature is below absolute zero",
                );
            }
            _ => {
                checks.non_negative("value", self.value);
            }
        }
        checks.ensure(
            self.from.dimension() == self.to.dimension(),
            "to",
            &format!("cannot convert {} to {}", self.from, self.to),
        );
        checks.finish()
    }
}

impl FromForm for ConversionParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            value: reader.number("value"),
            from: reader.choice("from"),
            to: reader.choice("to"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub value: f64,
    pub from: Unit,
    pub converted: f64,
    pub to: Unit,
}

/// Converts through the dimension's base unit (metre, kilogram, litre, kelvin).
pub fn convert(params: &ConversionParams) -> Result<ConversionResult, ConversionError> {
    let value = params.value;
    let converted = match (params.from, params.to) {
        (Unit::Length(from), Unit::Length(to)) => value * from.in_metres() / to.in_metres(),
        (Unit::Mass(from), Unit::Mass(to)) => value * from.in_kilograms() / to.in_kilograms(),
        (Unit::Volume(from), Unit::Volume(to)) => value * from.in_litres() / to.in_litres(),
        (Unit::Temperature(from), Unit::Temperature(to)) => {
            let kelvin = from.to_kelvin(value);
            if kelvin < 0.0 {
                return Err(ConversionError::BelowAbsoluteZero {
                    value,
                    unit: from.symbol().to_string(),
                });
            }
            to.from_kelvin(kelvin)
        }
        (from, to) => {
            return Err(ConversionError::IncompatibleUnits {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    };

    tracing::debug!(value, from = %params.from, converted, to = %params.to, "Unit converted");
    Ok(ConversionResult {
        value,
        from: params.from,
        converted,
        to: params.to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation::FormInput;

    fn run(value: f64, from: &str, to: &str) -> f64 {
        let params = ConversionParams {
            value,
            from: from.parse().unwrap(),
            to: to.parse().unwrap(),
        };
        convert(&params).unwrap().converted
    }

    #[test]
    fn length_mass_volume() {
        assert!((run(1.0, "mi", "km") - 1.609344).abs() < 1e-12);
        assert!((run(12.0, "in", "ft") - 1.0).abs() < 1e-12);
        assert!((run(1.0, "kg", "lb") - 2.2046226218).abs() < 1e-9);
        assert!((run(1.0, "gal", "l") - 3.785411784).abs() < 1e-12);
        assert!((run(3.0, "tsp", "tbsp") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn temperature_is_affine() {
        assert!((run(100.0, "c", "f") - 212.0).abs() < 1e-9);
        assert!((run(-40.0, "f", "c") + 40.0).abs() < 1e-9);
        assert!((run(0.0, "k", "c") + 273.15).abs() < 1e-9);
    }

    #[test]
    fn below_absolute_zero_is_rejected() {
        let form = FormInput::new()
            .with("value", "-500")
            .with("from", "°F")
            .with("to", "c");
        let errors = ConversionParams::from_form(&form).unwrap_err();
        assert_eq!(errors.errors()[0].field, "value");

        let params = ConversionParams {
            value: -1.0,
            from: Unit::Temperature(TemperatureUnit::Kelvin),
            to: Unit::Temperature(TemperatureUnit::Celsius),
        };
        assert!(matches!(convert(&params), Err(ConversionError::BelowAbsoluteZero { .. })));
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let form = FormInput::new()
            .with("value", "5")
            .with("from", "kg")
            .with("to", "km");
        let errors = ConversionParams::from_form(&form).unwrap_err();
        assert_eq!(errors.errors()[0].field, "to");

        let params = ConversionParams {
            value: 5.0,
            from: Unit::Mass(MassUnit::Kilogram),
            to: Unit::Length(LengthUnit::Kilometre),
        };
        assert!(matches!(convert(&params), Err(ConversionError::IncompatibleUnits { .. })));
    }

    #[test]
    fn unknown_unit_lists_choices() {
        let err = "furlong".parse::<Unit>().unwrap_err();
        assert!(err.to_string().contains("furlong"));
    }
}
