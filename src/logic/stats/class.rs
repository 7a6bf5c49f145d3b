use serde::{Deserialize, Serialize};

use crate::logic::dataset::Record;

/// Label balance of a dataset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ClassStats {
    pub positives: usize,
    pub negatives: usize,
    pub total: usize,
}

impl ClassStats {
    pub fn positive_percent(&self) -> f64 {
        percent(self.positives, self.total)
    }

    pub fn negative_percent(&self) -> f64 {
        percent(self.negatives, self.total)
    }

    /// "x% negative and y% positive", one decimal each
    pub fn distribution_line(&self) -> String {
        format!(
            "{:.1}% negative and {:.1}% positive",
            self.negative_percent(),
            self.positive_percent()
        )
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Count positive labels (integer value 1); every other row is negative.
pub fn summarize_classes(records: &[Record]) -> ClassStats {
    let positives = records.iter().filter(|r| r.is_positive()).count();
    let total = records.len();

    ClassStats {
        positives,
        negatives: total - positives,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(values: &[&str]) -> Vec<Record> {
        values
            .iter()
            .map(|v| Record::builder().diabetes(v).build())
            .collect()
    }

    #[test]
    fn test_label_parsing() {
        let stats = summarize_classes(&labelled(&["1", "0", "abc"]));
        assert_eq!(stats.positives, 1);
        assert_eq!(stats.negatives, 2);
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn test_integer_prefix_counts_as_positive() {
        let stats = summarize_classes(&labelled(&["1.0", " 1", "2", "-1"]));
        assert_eq!(stats.positives, 2);
        assert_eq!(stats.positives + stats.negatives, stats.total);
    }

    #[test]
    fn test_missing_label_is_negative() {
        let records = vec![Record::default(), Record::builder().age(40).build()];
        let stats = summarize_classes(&records);
        assert_eq!(stats, ClassStats { positives: 0, negatives: 2, total: 2 });
    }

    #[test]
    fn test_empty_input() {
        let stats = summarize_classes(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.positive_percent(), 0.0);
    }

    #[test]
    fn test_distribution_line() {
        let stats = summarize_classes(&labelled(&["1", "0", "0", "0"]));
        assert_eq!(stats.distribution_line(), "75.0% negative and 25.0% positive");
    }
}
