use serde::{Deserialize, Serialize};

use super::parse::{parse_float_prefix, parse_int_prefix};

/// One raw dataset row.
///
/// Every column is kept as the raw string it arrived as; interpretation
/// happens in the feature encoder and the stats summarizer. Empty cells and
/// missing columns are `None`. Unknown columns are ignored on ingestion.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Record {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub hypertension: Option<String>,
    #[serde(default)]
    pub heart_disease: Option<String>,
    #[serde(default)]
    pub smoking_history: Option<String>,
    #[serde(default)]
    pub bmi: Option<String>,
    #[serde(default, rename = "HbA1c_level")]
    pub hba1c_level: Option<String>,
    #[serde(default)]
    pub blood_glucose_level: Option<String>,
    #[serde(default)]
    pub diabetes: Option<String>,
}

/// Named record columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Gender,
    Age,
    Hypertension,
    HeartDisease,
    SmokingHistory,
    Bmi,
    HbA1cLevel,
    BloodGlucoseLevel,
    Diabetes,
}

impl Field {
    /// Column name as it appears in the CSV header
    pub fn column(self) -> &'static str {
        match self {
            Field::Gender => "gender",
            Field::Age => "age",
            Field::Hypertension => "hypertension",
            Field::HeartDisease => "heart_disease",
            Field::SmokingHistory => "smoking_history",
            Field::Bmi => "bmi",
            Field::HbA1cLevel => "HbA1c_level",
            Field::BloodGlucoseLevel => "blood_glucose_level",
            Field::Diabetes => "diabetes",
        }
    }
}

impl Record {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Raw value of a column, with surrounding whitespace and blanks removed
    pub fn get(&self, field: Field) -> Option<&str> {
        let raw = match field {
            Field::Gender => &self.gender,
            Field::Age => &self.age,
            Field::Hypertension => &self.hypertension,
            Field::HeartDisease => &self.heart_disease,
            Field::SmokingHistory => &self.smoking_history,
            Field::Bmi => &self.bmi,
            Field::HbA1cLevel => &self.hba1c_level,
            Field::BloodGlucoseLevel => &self.blood_glucose_level,
            Field::Diabetes => &self.diabetes,
        };
        raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Numeric value of a column, `None` when absent or unparseable
    pub fn numeric(&self, field: Field) -> Option<f64> {
        self.get(field)
            .and_then(parse_float_prefix)
            .filter(|v| !v.is_nan())
    }

    /// The label test shared by class stats and training: integer value 1
    pub fn is_positive(&self) -> bool {
        self.get(Field::Diabetes).and_then(parse_int_prefix) == Some(1)
    }
}

/// Builder for records coming from forms and tests
#[derive(Debug, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn gender(mut self, value: impl Into<String>) -> Self {
        self.record.gender = Some(value.into());
        self
    }

    pub fn age(mut self, value: impl ToString) -> Self {
        self.record.age = Some(value.to_string());
        self
    }

    pub fn hypertension(mut self, value: impl Into<String>) -> Self {
        self.record.hypertension = Some(value.into());
        self
    }

    pub fn heart_disease(mut self, value: impl Into<String>) -> Self {
        self.record.heart_disease = Some(value.into());
        self
    }

    pub fn smoking_history(mut self, value: impl Into<String>) -> Self {
        self.record.smoking_history = Some(value.into());
        self
    }

    pub fn bmi(mut self, value: impl ToString) -> Self {
        self.record.bmi = Some(value.to_string());
        self
    }

    pub fn hba1c_level(mut self, value: impl ToString) -> Self {
        self.record.hba1c_level = Some(value.to_string());
        self
    }

    pub fn blood_glucose_level(mut self, value: impl ToString) -> Self {
        self.record.blood_glucose_level = Some(value.to_string());
        self
    }

    pub fn diabetes(mut self, value: impl ToString) -> Self {
        self.record.diabetes = Some(value.to_string());
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}
