use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecipeError;

/// Measurement unit accepted for an ingredient quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Ml,
    G,
    Cups,
    Tsp,
    Tbsp,
    Pcs,
    Oz,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Ml => "ml",
            Unit::G => "g",
            Unit::Cups => "cups",
            Unit::Tsp => "tsp",
            Unit::Tbsp => "tbsp",
            Unit::Pcs => "pcs",
            Unit::Oz => "oz",
        }
    }

    /// Parses form input where an empty selection means "no unit".
    pub fn parse_optional(s: &str) -> Result<Option<Unit>, RecipeError> {
        let s = s.trim();
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Unit {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ml" => Ok(Unit::Ml),
            "g" => Ok(Unit::G),
            "cups" => Ok(Unit::Cups),
            "tsp" => Ok(Unit::Tsp),
            "tbsp" => Ok(Unit::Tbsp),
            "pcs" => Ok(Unit::Pcs),
            "oz" => Ok(Unit::Oz),
            _ => Err(RecipeError::validation(format!(
                "Invalid unit '{}'. Valid options: ml, g, cups, tsp, tbsp, pcs, oz",
                s
            ))),
        }
    }
}

/// One ingredient line. Quantity is free text ("1 1/2", "a pinch").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    #[serde(default, deserialize_with = "deserialize_unit")]
    pub unit: Option<Unit>,
}

/// Accepts `null`, `""` (no unit selected) or a unit name.
fn deserialize_unit<'de, D>(deserializer: D) -> Result<Option<Unit>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(s) => Unit::parse_optional(&s).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>, unit: Option<Unit>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit,
        }
    }

    /// Trimmed copy, or `None` when name or quantity is blank.
    pub fn normalized(&self) -> Option<Ingredient> {
        let name = self.name.trim();
        let quantity = self.quantity.trim();
        if name.is_empty() || quantity.is_empty() {
            return None;
        }
        Some(Ingredient::new(name, quantity, self.unit))
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{}: {} {}", self.name, self.quantity, unit),
            None => write!(f, "{}: {}", self.name, self.quantity),
        }
    }
}

/// One preparation step. Order comes from insertion order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Direction {
    pub step: String,
}

/// Accepts a bare string or the `{"step": ...}` shape the direction is
/// serialized as, so fetched recipes can be sent back unchanged.
impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawDirection {
            Text(String),
            Object { step: String },
        }

        match RawDirection::deserialize(deserializer)? {
            RawDirection::Text(step) | RawDirection::Object { step } => Ok(Direction::new(step)),
        }
    }
}

impl Direction {
    pub fn new(step: impl Into<String>) -> Self {
        Self { step: step.into() }
    }

    pub fn normalized(&self) -> Option<Direction> {
        let step = self.step.trim();
        if step.is_empty() {
            None
        } else {
            Some(Direction::new(step))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step)
    }
}
