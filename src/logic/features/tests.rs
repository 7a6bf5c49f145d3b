//! Encoder tests across strict and display modes

use crate::error::EncodingError;
use crate::logic::dataset::Record;
use crate::logic::features::encoder::{encode_display, encode_strict, smoking_code};
use crate::logic::features::layout::{self, FEATURE_COUNT};

fn full_record() -> Record {
    Record::builder()
        .gender("Female")
        .age(54)
        .hypertension("Yes")
        .heart_disease("No")
        .smoking_history("Former")
        .bmi(27.3)
        .hba1c_level(6.6)
        .blood_glucose_level(140)
        .diabetes(1)
        .build()
}

#[test]
fn test_strict_encoding_field_order() {
    let vector = encode_strict(&full_record()).unwrap();

    assert_eq!(vector.values.len(), FEATURE_COUNT);
    assert_eq!(vector.values, [0.0, 54.0, 1.0, 0.0, 3.0, 27.3, 6.6, 140.0]);
}

#[test]
fn test_strict_encoding_never_nan() {
    let record = Record::builder()
        .gender("Male")
        .age("unknown")
        .smoking_history("never")
        .bmi("")
        .build();

    let vector = encode_strict(&record).unwrap();

    assert!(vector.values.iter().all(|v| !v.is_nan()));
    assert_eq!(vector.values[layout::AGE], 0.0);
    assert_eq!(vector.values[layout::BMI], 0.0);
    assert_eq!(vector.values[layout::HBA1C_LEVEL], 0.0);
    assert_eq!(vector.values[layout::BLOOD_GLUCOSE_LEVEL], 0.0);
}

#[test]
fn test_gender_mapping() {
    let female = encode_strict(&Record::builder().gender("Female").smoking_history("Never").build()).unwrap();
    let male = encode_strict(&Record::builder().gender("Male").smoking_history("Never").build()).unwrap();
    let other = encode_strict(&Record::builder().gender("Other").smoking_history("Never").build()).unwrap();
    let absent = encode_strict(&Record::builder().smoking_history("Never").build()).unwrap();

    assert_eq!(female.values[layout::GENDER], 0.0);
    assert_eq!(male.values[layout::GENDER], 1.0);
    assert_eq!(other.values[layout::GENDER], 1.0);
    assert_eq!(absent.values[layout::GENDER], 1.0);
}

#[test]
fn test_gender_label_is_case_sensitive() {
    let encode = |label: &str| {
        encode_strict(&Record::builder().gender(label).smoking_history("Never").build())
            .unwrap()
            .values[layout::GENDER]
    };

    assert_eq!(encode(" Female "), 0.0);
    assert_eq!(encode("female"), 1.0);
    assert_eq!(encode("FEMALE"), 1.0);
}

#[test]
fn test_flags_accept_yes_and_dataset_digits() {
    let record = Record::builder()
        .hypertension("1")
        .heart_disease("Yes")
        .smoking_history("No Info")
        .build();
    let vector = encode_strict(&record).unwrap();
    assert_eq!(vector.values[layout::HYPERTENSION], 1.0);
    assert_eq!(vector.values[layout::HEART_DISEASE], 1.0);

    let record = Record::builder()
        .hypertension("0")
        .heart_disease("No")
        .smoking_history("No Info")
        .build();
    let vector = encode_strict(&record).unwrap();
    assert_eq!(vector.values[layout::HYPERTENSION], 0.0);
    assert_eq!(vector.values[layout::HEART_DISEASE], 0.0);
}

#[test]
fn test_smoking_codes() {
    assert_eq!(smoking_code("Never"), Some(0.0));
    assert_eq!(smoking_code("No Info"), Some(1.0));
    assert_eq!(smoking_code("current"), Some(2.0));
    assert_eq!(smoking_code("former"), Some(3.0));
    assert_eq!(smoking_code("ever"), Some(4.0));
    assert_eq!(smoking_code("not current"), Some(5.0));
    assert_eq!(smoking_code("sometimes"), None);
}

#[test]
fn test_unknown_smoking_fails_fast() {
    let record = Record::builder().smoking_history("occasionally").build();

    let err = encode_strict(&record).unwrap_err();
    assert_eq!(
        err,
        EncodingError::UnknownCategory {
            field: "smoking_history",
            value: "occasionally".to_string(),
        }
    );
    assert!(encode_display(&full_record_with_smoking("occasionally")).is_err());
}

#[test]
fn test_absent_smoking_fails_fast() {
    let record = Record::builder().age(40).build();
    assert!(matches!(
        encode_strict(&record),
        Err(EncodingError::UnknownCategory { .. })
    ));
}

#[test]
fn test_display_preserves_missing_optionals() {
    let mut record = full_record();
    record.bmi = None;
    record.hba1c_level = Some("n/a".to_string());

    let patient = encode_display(&record).unwrap();

    assert_eq!(patient.bmi, None);
    assert_eq!(patient.hba1c_level, None);
    assert_eq!(patient.age, 54.0);
    assert!(patient.has_hypertension());
    assert!(!patient.has_heart_disease());
}

#[test]
fn test_display_requires_age_and_glucose() {
    let mut record = full_record();
    record.age = None;
    assert_eq!(
        encode_display(&record).unwrap_err(),
        EncodingError::MissingField { field: "age" }
    );

    let mut record = full_record();
    record.blood_glucose_level = Some("high".to_string());
    assert_eq!(
        encode_display(&record).unwrap_err(),
        EncodingError::MissingField { field: "blood_glucose_level" }
    );
}

#[test]
fn test_display_keeps_entered_precision() {
    let mut record = full_record();
    record.age = Some("44.99999999".to_string());
    record.hba1c_level = Some("6.50000001".to_string());
    record.blood_glucose_level = Some("125.000001".to_string());

    let patient = encode_display(&record).unwrap();

    assert_eq!(patient.age, 44.99999999);
    assert_eq!(patient.hba1c_level, Some(6.50000001));
    assert_eq!(patient.blood_glucose_level, 125.000001);
}

#[test]
fn test_display_and_strict_agree_when_complete() {
    let record = full_record();
    let strict = encode_strict(&record).unwrap();
    let display = encode_display(&record).unwrap().to_feature_vector();
    assert_eq!(strict, display);
}

fn full_record_with_smoking(value: &str) -> Record {
    let mut record = full_record();
    record.smoking_history = Some(value.to_string());
    record
}
