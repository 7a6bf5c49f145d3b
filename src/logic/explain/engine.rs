use super::types::{Explanation, FactorKind, FactorValue, RiskFactor, RiskLevel};
use crate::logic::features::PatientFeatures;

/// Rule-based factor list for one prediction.
///
/// Order is fixed: HbA1c, glucose, BMI, hypertension, heart disease, age.
pub fn explain(probability: f32, features: &PatientFeatures) -> Explanation {
    let risk_factors = vec![
        hba1c_factor(features.hba1c_level),
        glucose_factor(features.blood_glucose_level),
        bmi_factor(features.bmi),
        hypertension_factor(features.has_hypertension()),
        heart_disease_factor(features.has_heart_disease()),
        age_factor(features.age),
    ];

    Explanation {
        risk_level: RiskLevel::from_probability(probability),
        risk_percentage: format!("{:.2}", probability * 100.0),
        risk_factors,
    }
}

fn hba1c_factor(hba1c: Option<f64>) -> RiskFactor {
    let Some(value) = hba1c.filter(|v| !v.is_nan()) else {
        return RiskFactor::new(
            "HbA1c",
            FactorValue::text("Not provided"),
            FactorKind::Protective,
            "No HbA1c value entered, model used other features only",
        );
    };

    let (name, kind, comment) = if value > 6.5 {
        ("High HbA1c Level", FactorKind::Risk, "High (≥ 6.5, diabetes range)")
    } else if value < 5.7 {
        ("Normal HbA1c", FactorKind::Protective, "Normal (< 5.7)")
    } else {
        ("Borderline HbA1c", FactorKind::Risk, "Elevated (5.7–6.4, pre-diabetes range)")
    };
    RiskFactor::new(name, FactorValue::Number(value), kind, comment)
}

fn glucose_factor(glucose: f64) -> RiskFactor {
    let (name, kind, comment) = if glucose > 125.0 {
        ("High Blood Glucose", FactorKind::Risk, "High (≥ 126 mg/dL)")
    } else if glucose < 100.0 {
        ("Normal Blood Glucose", FactorKind::Protective, "Normal (< 100 mg/dL)")
    } else {
        ("Borderline Blood Glucose", FactorKind::Risk, "Elevated (100–125 mg/dL)")
    };
    RiskFactor::new(name, FactorValue::Number(glucose), kind, comment)
}

fn bmi_factor(bmi: Option<f64>) -> RiskFactor {
    let Some(value) = bmi.filter(|v| !v.is_nan()) else {
        return RiskFactor::new(
            "BMI",
            FactorValue::text("Not provided"),
            FactorKind::Protective,
            "No BMI value entered, you can calculate it using weight and height",
        );
    };

    let (name, kind, comment) = if value >= 35.0 {
        ("High BMI", FactorKind::Risk, "Severely obese (≥ 35)")
    } else if value >= 30.0 {
        ("High BMI", FactorKind::Risk, "Obese (30–34.9)")
    } else if value >= 25.0 {
        ("Overweight BMI", FactorKind::Risk, "Overweight (25–29.9)")
    } else if value >= 18.5 {
        ("Healthy BMI", FactorKind::Protective, "Healthy range (18.5–24.9)")
    } else {
        ("Low BMI", FactorKind::Risk, "Underweight (< 18.5)")
    };
    RiskFactor::new(name, FactorValue::Number(value), kind, comment)
}

fn hypertension_factor(present: bool) -> RiskFactor {
    if present {
        RiskFactor::new(
            "Hypertension Present",
            FactorValue::text("Yes"),
            FactorKind::Risk,
            "Known cardiovascular risk factor",
        )
    } else {
        RiskFactor::new(
            "No Hypertension",
            FactorValue::text("No"),
            FactorKind::Protective,
            "No diagnosed high blood pressure",
        )
    }
}

fn heart_disease_factor(present: bool) -> RiskFactor {
    if present {
        RiskFactor::new(
            "Heart Disease Present",
            FactorValue::text("Yes"),
            FactorKind::Risk,
            "Significant cardiovascular risk factor",
        )
    } else {
        RiskFactor::new(
            "No Heart Disease",
            FactorValue::text("No"),
            FactorKind::Protective,
            "No diagnosed heart disease reported",
        )
    }
}

/// The kind flips at 45 while the comment buckets split at 35/45/60
fn age_factor(age: f64) -> RiskFactor {
    let comment = if age < 35.0 {
        "Younger adult (lower age-related risk)"
    } else if age < 45.0 {
        "Mid-age adult (moderate age-related risk)"
    } else if age < 60.0 {
        "Higher age-related risk (45–59)"
    } else {
        "Older age group (≥ 60, higher risk)"
    };
    let kind = if age >= 45.0 { FactorKind::Risk } else { FactorKind::Protective };

    RiskFactor::new("Age", FactorValue::Number(age), kind, comment)
}
