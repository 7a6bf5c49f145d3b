//! Binned exploratory distributions (age, BMI).

use serde::{Deserialize, Serialize};

use crate::logic::dataset::{Field, Record};

/// Bin label + exclusive upper edge. The last bin is open-ended.
type BinEdges = [(&'static str, f64); 5];

const AGE_BINS: BinEdges = [
    ("<30", 30.0),
    ("30-39", 40.0),
    ("40-49", 50.0),
    ("50-59", 60.0),
    ("60+", f64::INFINITY),
];

const BMI_BINS: BinEdges = [
    ("<18.5", 18.5),
    ("18.5-24.9", 25.0),
    ("25-29.9", 30.0),
    ("30-34.9", 35.0),
    ("35+", f64::INFINITY),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistogramBin {
    pub label: String,
    pub count: usize,
}

/// Ordered histogram over fixed bins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    fn empty(edges: &BinEdges) -> Self {
        Self {
            bins: edges
                .iter()
                .map(|(label, _)| HistogramBin { label: label.to_string(), count: 0 })
                .collect(),
        }
    }

    fn add(&mut self, edges: &BinEdges, value: f64) {
        let index = bin_index(edges, value);
        self.bins[index].count += 1;
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdaStats {
    pub age: Histogram,
    pub bmi: Histogram,
}

fn bin_index(edges: &BinEdges, value: f64) -> usize {
    edges
        .iter()
        .position(|(_, upper)| value < *upper)
        .unwrap_or(edges.len() - 1)
}

/// Bin every row with a parseable age / BMI. A row with an unparseable
/// value is dropped from that histogram only.
pub fn summarize_eda(records: &[Record]) -> EdaStats {
    let mut age = Histogram::empty(&AGE_BINS);
    let mut bmi = Histogram::empty(&BMI_BINS);

    for record in records {
        if let Some(value) = record.numeric(Field::Age) {
            age.add(&AGE_BINS, value);
        }
        if let Some(value) = record.numeric(Field::Bmi) {
            bmi.add(&BMI_BINS, value);
        }
    }

    EdaStats { age, bmi }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_bin(age: f64) -> &'static str {
        AGE_BINS[bin_index(&AGE_BINS, age)].0
    }

    fn bmi_bin(bmi: f64) -> &'static str {
        BMI_BINS[bin_index(&BMI_BINS, bmi)].0
    }

    #[test]
    fn test_age_boundaries() {
        assert_eq!(age_bin(29.0), "<30");
        assert_eq!(age_bin(30.0), "30-39");
        assert_eq!(age_bin(39.99), "30-39");
        assert_eq!(age_bin(59.9), "50-59");
        assert_eq!(age_bin(60.0), "60+");
        assert_eq!(age_bin(f64::INFINITY), "60+");
    }

    #[test]
    fn test_bmi_boundaries() {
        assert_eq!(bmi_bin(18.4), "<18.5");
        assert_eq!(bmi_bin(18.5), "18.5-24.9");
        assert_eq!(bmi_bin(25.0), "25-29.9");
        assert_eq!(bmi_bin(34.99), "30-34.9");
        assert_eq!(bmi_bin(35.0), "35+");
    }

    #[test]
    fn test_unparseable_dropped_per_field() {
        let records = vec![
            Record::builder().age(25).bmi("n/a").build(),
            Record::builder().age("unknown").bmi(31.2).build(),
            Record::builder().age(61).bmi(22).build(),
        ];

        let stats = summarize_eda(&records);

        assert_eq!(stats.age.total(), 2);
        assert_eq!(stats.bmi.total(), 2);
        assert_eq!(stats.age.bins[0].count, 1);
        assert_eq!(stats.age.bins[4].count, 1);
        assert_eq!(stats.bmi.bins[3].count, 1);
        assert_eq!(stats.bmi.bins[1].count, 1);
    }

    #[test]
    fn test_bin_order_is_fixed() {
        let stats = summarize_eda(&[]);
        let labels = |h: &Histogram| h.bins.iter().map(|b| b.label.clone()).collect::<Vec<_>>();
        assert_eq!(labels(&stats.age), vec!["<30", "30-39", "40-49", "50-59", "60+"]);
        assert_eq!(labels(&stats.bmi), vec!["<18.5", "18.5-24.9", "25-29.9", "30-34.9", "35+"]);
        assert_eq!(stats.age.total(), 0);
    }
}
