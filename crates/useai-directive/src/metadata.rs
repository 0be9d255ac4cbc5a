//! Generation metadata
//!
//! Flat record of optional generation options. Field declaration order is the
//! serialization order, and absent fields are skipped, so the JSON form of a
//! given record is always byte-identical. The cache fingerprint relies on it.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt::{self, Display, Formatter};

/// Numeric hint value, or the raw text when it does not parse as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    /// Finite number; integers stay integers
    Number(Number),
    /// Non-numeric text, kept verbatim
    Raw(String),
}

impl HintValue {
    /// Parse text as a number, falling back to the raw string
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Ok(int) = text.parse::<i64>() {
            return Self::Number(Number::from(int));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Self::Raw(text.to_string()), Self::Number)
    }

    /// Value as float, if numeric
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Raw(_) => None,
        }
    }

    /// Value as integer, if numeric and integral
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            }),
            Self::Raw(_) => None,
        }
    }
}

impl From<f64> for HintValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or_else(|| Self::Raw(value.to_string()), Self::Number)
    }
}

impl From<i64> for HintValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl Display for HintValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Raw(s) => f.write_str(s),
        }
    }
}

/// Generation options for one function
///
/// Every field is optional. The extractor fills only the keys present in the
/// source; [`Metadata::merged_over`] applies plugin defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Generation service model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<HintValue>,

    /// Reproducibility seed, honoured by some services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<HintValue>,

    /// Free-text hint appended to the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Metadata {
    /// Create empty metadata
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// With temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: impl Into<HintValue>) -> Self {
        self.temperature = Some(temperature.into());
        self
    }

    /// With seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<HintValue>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// With instructions
    #[inline]
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// No field set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.temperature.is_none()
            && self.seed.is_none()
            && self.instructions.is_none()
    }

    /// Overlay `other` on `self`: fields present in `other` win
    #[must_use]
    pub fn overlay(mut self, other: Metadata) -> Self {
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.instructions.is_some() {
            self.instructions = other.instructions;
        }
        self
    }

    /// Apply plugin defaults beneath inline hints
    ///
    /// Inline `model` and `temperature` win over the defaults; `seed` and
    /// `instructions` only ever come from inline hints.
    #[must_use]
    pub fn merged_over(self, default_model: &str, default_temperature: f64) -> Self {
        Self {
            model: self.model.or_else(|| Some(default_model.to_string())),
            temperature: self
                .temperature
                .or_else(|| Some(HintValue::from(default_temperature))),
            seed: self.seed,
            instructions: self.instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hint_value_integer_stays_integer() {
        let v = HintValue::parse("42");
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(serde_json::to_string(&v).unwrap(), "42");
    }

    #[test]
    fn hint_value_float() {
        let v = HintValue::parse("0.5");
        assert_eq!(v.as_f64(), Some(0.5));
        assert_eq!(v.as_i64(), None);
    }

    #[test]
    fn hint_value_raw_fallback() {
        assert_eq!(HintValue::parse("warm"), HintValue::Raw("warm".to_string()));
        assert_eq!(HintValue::parse("NaN"), HintValue::Raw("NaN".to_string()));
        assert_eq!(HintValue::parse("inf"), HintValue::Raw("inf".to_string()));
    }

    #[test]
    fn serialization_skips_absent_fields_in_fixed_order() {
        let m = Metadata::new()
            .with_instructions("be brief")
            .with_seed(7_i64)
            .with_model("foo/bar");
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"model":"foo/bar","seed":7,"instructions":"be brief"}"#);
    }

    #[test]
    fn deserialize_ignores_unknown_fields() {
        let m: Metadata =
            serde_json::from_str(r#"{"model":"m","temperature":"hot","extra":true}"#).unwrap();
        assert_eq!(m.model.as_deref(), Some("m"));
        assert_eq!(m.temperature, Some(HintValue::Raw("hot".to_string())));
    }

    #[test]
    fn merge_inline_wins() {
        let inline = Metadata::new().with_temperature(0.2).with_seed(1_i64);
        let merged = inline.merged_over("openai/gpt-4-turbo", 0.7);
        assert_eq!(merged.model.as_deref(), Some("openai/gpt-4-turbo"));
        assert_eq!(merged.temperature.and_then(|t| t.as_f64()), Some(0.2));
        assert_eq!(merged.seed.and_then(|s| s.as_i64()), Some(1));
        assert!(merged.instructions.is_none());
    }

    #[test]
    fn overlay_replaces_present_fields_only() {
        let base = Metadata::new().with_model("a").with_temperature(0.1);
        let top = Metadata::new().with_temperature(0.9);
        let out = base.overlay(top);
        assert_eq!(out.model.as_deref(), Some("a"));
        assert_eq!(out.temperature.and_then(|t| t.as_f64()), Some(0.9));
    }
}
