//! Split scoring for categorical attributes.
use crate::data::dataset::{Categorical, Record};
use std::collections::BTreeMap;

/// Examples grouped by the value they take on one attribute.
pub type Partition<'a, XT> = BTreeMap<XT, Vec<&'a Record<XT>>>;

pub fn positive_count<XT: Categorical>(examples: &[&Record<XT>]) -> usize {
    examples.iter().filter(|record| record.is_positive()).count()
}

/// Binary Shannon entropy of the labels, in bits.
pub fn entropy<XT: Categorical>(examples: &[&Record<XT>]) -> f64 {
    let total = examples.len();
    let positive = positive_count(examples);
    if positive == 0 || positive == total {
        return 0.0;
    }
    let p = positive as f64 / total as f64;
    let n = 1.0 - p;
    -p * p.log2() - n * n.log2()
}

/// Groups `examples` by their value of attribute `feature_index`.
pub fn compute_range<'a, XT: Categorical>(
    examples: &[&'a Record<XT>],
    feature_index: usize,
) -> Partition<'a, XT> {
    let mut range: Partition<'a, XT> = BTreeMap::new();
    for &record in examples {
        range
            .entry(record.features()[feature_index])
            .or_default()
            .push(record);
    }
    range
}

pub fn information_gain<XT: Categorical>(examples: &[&Record<XT>], feature_index: usize) -> f64 {
    let total = examples.len() as f64;
    let remainder = compute_range(examples, feature_index)
        .values()
        .map(|subset| subset.len() as f64 / total * entropy(subset))
        .sum::<f64>();
    entropy(examples) - remainder
}

/// Pearson chi-square statistic of the label/value contingency table.
///
/// `positive` and `total` describe the examples that were partitioned. A term whose expected
/// count is zero is skipped, so the statistic is always finite.
pub fn chi_square<XT: Categorical>(positive: usize, total: usize, range: &Partition<XT>) -> f64 {
    let mut sum = 0.0;
    for subset in range.values() {
        let size = subset.len() as f64;
        let expected_positive = positive as f64 * size / total as f64;
        let expected_negative = (total - positive) as f64 * size / total as f64;
        let observed_positive = positive_count(subset) as f64;
        let observed_negative = size - observed_positive;

        if expected_positive > 0.0 {
            sum += (expected_positive - observed_positive).powi(2) / expected_positive;
        }
        if expected_negative > 0.0 {
            sum += (expected_negative - observed_negative).powi(2) / expected_negative;
        }
    }
    sum
}
