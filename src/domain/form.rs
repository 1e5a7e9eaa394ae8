//! Biometric form input and validation.
//!
//! Raw strings from the input controls become a [`FormInput`] only after
//! passing every range rule. Rules are checked in a fixed order and the first
//! failure is reported.

use serde::{Deserialize, Serialize};

/// Inclusive age bounds in years.
pub const AGE_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

/// Inclusive height bounds in centimetres.
pub const HEIGHT_RANGE_CM: std::ops::RangeInclusive<f64> = 30.0..=250.0;

/// Inclusive weight bounds in kilograms.
pub const WEIGHT_RANGE_KG: std::ops::RangeInclusive<f64> = 5.0..=200.0;

/// Gender as accepted by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// Other or unspecified
    Other,
}

impl Gender {
    /// All selectable values, in display order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Wire value (`male`, `female`, `other`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Parse a select value. Empty or unknown values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Language of the generated recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Gujarati,
}

impl Language {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Gujarati => "ગુજરાતી",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::English => write!(f, "english"),
            Self::Gujarati => write!(f, "gujarati"),
        }
    }
}

/// A validation failure. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select your gender")]
    MissingGender,

    #[error("Age must be between 1 and 100 years")]
    AgeOutOfRange,

    #[error("Height must be between 30 and 250 cm")]
    HeightOutOfRange,

    #[error("Weight must be between 5 and 200 kg")]
    WeightOutOfRange,
}

impl ValidationError {
    /// Name of the offending form field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingGender => "gender",
            Self::AgeOutOfRange => "age",
            Self::HeightOutOfRange => "height",
            Self::WeightOutOfRange => "weight",
        }
    }
}

/// Unparsed values as read from the input controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFormValues {
    pub gender: String,
    pub age: String,
    pub height: String,
    pub weight: String,
}

impl RawFormValues {
    /// Parse and validate into a request payload.
    ///
    /// # Errors
    /// Returns the first failing rule, in the order gender, age, height, weight.
    pub fn validate(&self, language: Language) -> Result<FormInput, ValidationError> {
        let gender = Gender::parse(&self.gender).ok_or(ValidationError::MissingGender)?;

        let age = parse_age(&self.age)
            .filter(|age| AGE_RANGE.contains(age))
            .ok_or(ValidationError::AgeOutOfRange)?;

        let height_cm = parse_measure(&self.height)
            .filter(|h| HEIGHT_RANGE_CM.contains(h))
            .ok_or(ValidationError::HeightOutOfRange)?;

        let weight_kg = parse_measure(&self.weight)
            .filter(|w| WEIGHT_RANGE_KG.contains(w))
            .ok_or(ValidationError::WeightOutOfRange)?;

        Ok(FormInput {
            gender,
            // AGE_RANGE is 1..=100, always fits
            age: age as u8,
            height_cm,
            weight_kg,
            language,
        })
    }
}

/// Integer parse; a decimal age is truncated toward zero.
fn parse_age(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(age) = raw.parse::<i64>() {
        return Some(age);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}

fn parse_measure(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validated payload for `POST /api/health-report`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    pub gender: Gender,

    /// Age in whole years (1-100)
    pub age: u8,

    /// Height in cm (30-250)
    #[serde(rename = "height")]
    pub height_cm: f64,

    /// Weight in kg (5-200)
    #[serde(rename = "weight")]
    pub weight_kg: f64,

    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(gender: &str, age: &str, height: &str, weight: &str) -> RawFormValues {
        RawFormValues {
            gender: gender.to_string(),
            age: age.to_string(),
            height: height.to_string(),
            weight: weight.to_string(),
        }
    }

    #[test]
    fn test_valid_input() {
        let input = raw("female", "12", "140.5", "35")
            .validate(Language::Gujarati)
            .expect("Should validate");
        assert_eq!(input.gender, Gender::Female);
        assert_eq!(input.age, 12);
        assert!((input.height_cm - 140.5).abs() < f64::EPSILON);
        assert!((input.weight_kg - 35.0).abs() < f64::EPSILON);
        assert_eq!(input.language, Language::Gujarati);
    }

    #[test]
    fn test_inclusive_bounds() {
        for (age, height, weight) in [("1", "30", "5"), ("100", "250", "200")] {
            assert!(
                raw("male", age, height, weight)
                    .validate(Language::English)
                    .is_ok(),
                "bounds {age}/{height}/{weight} should pass"
            );
        }
    }

    #[test]
    fn test_each_rule_message() {
        let cases = [
            (raw("", "10", "140", "35"), "Please select your gender"),
            (raw("male", "0", "140", "35"), "Age must be between 1 and 100 years"),
            (raw("male", "101", "140", "35"), "Age must be between 1 and 100 years"),
            (raw("male", "10", "29.9", "35"), "Height must be between 30 and 250 cm"),
            (raw("male", "10", "250.1", "35"), "Height must be between 30 and 250 cm"),
            (raw("male", "10", "140", "4.9"), "Weight must be between 5 and 200 kg"),
            (raw("male", "10", "140", "201"), "Weight must be between 5 and 200 kg"),
        ];

        for (values, expected) in cases {
            let err = values.validate(Language::English).unwrap_err();
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let err = raw("", "0", "10", "1")
            .validate(Language::English)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingGender);

        let err = raw("other", "0", "10", "1")
            .validate(Language::English)
            .unwrap_err();
        assert_eq!(err, ValidationError::AgeOutOfRange);

        let err = raw("other", "50", "10", "1")
            .validate(Language::English)
            .unwrap_err();
        assert_eq!(err.field(), "height");
    }

    #[test]
    fn test_unparsable_numbers_fail_their_rule() {
        let err = raw("male", "", "140", "35")
            .validate(Language::English)
            .unwrap_err();
        assert_eq!(err, ValidationError::AgeOutOfRange);

        let err = raw("male", "10", "abc", "35")
            .validate(Language::English)
            .unwrap_err();
        assert_eq!(err, ValidationError::HeightOutOfRange);

        let err = raw("male", "10", "140", "NaN")
            .validate(Language::English)
            .unwrap_err();
        assert_eq!(err, ValidationError::WeightOutOfRange);
    }

    #[test]
    fn test_decimal_age_truncated() {
        let input = raw("male", "12.9", "140", "35")
            .validate(Language::English)
            .expect("Should validate");
        assert_eq!(input.age, 12);

        // 0.5 truncates to 0, which is out of range
        assert!(raw("male", "0.5", "140", "35")
            .validate(Language::English)
            .is_err());
    }

    #[test]
    fn test_wire_format() {
        let input = raw(" Male ", "10", "140", "35")
            .validate(Language::Gujarati)
            .expect("Should validate");
        let json = serde_json::to_value(input).expect("Should serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "gender": "male",
                "age": 10,
                "height": 140.0,
                "weight": 35.0,
                "language": "gujarati"
            })
        );
    }
}
