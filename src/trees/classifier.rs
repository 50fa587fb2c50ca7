//! Decision Tree Classifier
//!
//! ID3-style induction over categorical attributes: splits are chosen greedily by information
//! gain and kept only when a chi-square test finds the split significant.
use super::{
    criterion::{chi_square, compute_range, information_gain, positive_count},
    node::TreeNode,
    params::{check_significance, TreeParams},
};
use crate::{
    data::dataset::{Categorical, Dataset, Label, Record},
    metrics::confusion::ClassificationMetrics,
    stats::chi_square::critical_value,
};
use nalgebra::{DMatrix, DVector};
use std::{
    collections::{BTreeMap, BTreeSet},
    error::Error,
};

/// Majority label, ties going to the positive class.
pub(crate) fn majority_label(positive: usize, total: usize) -> Label {
    if positive >= total - positive {
        1
    } else {
        0
    }
}

/// Induces a decision tree from `examples`.
///
/// Attributes whose index is in `excluded` are never split on. Every example must have one
/// value per entry of `feature_names`.
///
/// # Errors
///
/// Fails if `examples` is empty, if a feature vector has the wrong length, if `excluded` names
/// an attribute that does not exist, or if `significance` is not in (0, 1).
pub fn induce<XT: Categorical>(
    examples: &[&Record<XT>],
    feature_names: &[String],
    excluded: &BTreeSet<usize>,
    significance: f64,
) -> Result<TreeNode<XT>, Box<dyn Error>> {
    if examples.is_empty() {
        return Err("Cannot induce a tree from an empty example set.".into());
    }
    check_significance(significance)?;
    if let Some(record) = examples
        .iter()
        .find(|record| record.num_features() != feature_names.len())
    {
        return Err(format!(
            "Record has {} features but {} attribute names were given.",
            record.num_features(),
            feature_names.len()
        )
        .into());
    }
    if let Some(index) = excluded.iter().find(|&&index| index >= feature_names.len()) {
        return Err(format!("Excluded attribute {} does not exist.", index).into());
    }

    grow(examples, feature_names, excluded, significance)
}

fn grow<XT: Categorical>(
    examples: &[&Record<XT>],
    feature_names: &[String],
    excluded: &BTreeSet<usize>,
    significance: f64,
) -> Result<TreeNode<XT>, Box<dyn Error>> {
    let total = examples.len();
    let positive = positive_count(examples);

    if positive == total {
        return Ok(TreeNode::leaf(1));
    }
    if positive == 0 {
        return Ok(TreeNode::leaf(0));
    }

    let majority = majority_label(positive, total);
    if excluded.len() == feature_names.len() {
        return Ok(TreeNode::leaf(majority));
    }

    let feature_index = best_attribute(examples, feature_names.len(), excluded)
        .ok_or("No attribute left to split on.")?;

    let range = compute_range(examples, feature_index);
    let statistic = chi_square(positive, total, &range);
    if statistic <= critical_value(significance, range.len() - 1)? {
        return Ok(TreeNode::leaf(majority));
    }

    let mut child_excluded = excluded.clone();
    child_excluded.insert(feature_index);

    let branches = range
        .into_iter()
        .map(|(value, subset)| -> Result<_, Box<dyn Error>> {
            let child = grow(&subset, feature_names, &child_excluded, significance)?;
            Ok((value, child))
        })
        .collect::<Result<BTreeMap<_, _>, Box<dyn Error>>>()?;

    Ok(TreeNode::Split {
        feature_index,
        feature_name: feature_names[feature_index].clone(),
        default_label: majority,
        branches,
    })
}

/// Attribute with the strictly highest information gain; the lowest index wins ties.
fn best_attribute<XT: Categorical>(
    examples: &[&Record<XT>],
    num_features: usize,
    excluded: &BTreeSet<usize>,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for feature_index in (0..num_features).filter(|index| !excluded.contains(index)) {
        let gain = information_gain(examples, feature_index);
        if best.map_or(true, |(_, best_gain)| gain > best_gain) {
            best = Some((feature_index, gain));
        }
    }
    best.map(|(feature_index, _)| feature_index)
}

/// Predicts the label of `record` by walking the tree from `root`.
pub fn predict<XT: Categorical>(
    record: &Record<XT>,
    root: &TreeNode<XT>,
) -> Result<Label, Box<dyn Error>> {
    make_prediction(record.features(), root)
}

fn make_prediction<XT: Categorical>(
    features: &DVector<XT>,
    node: &TreeNode<XT>,
) -> Result<Label, Box<dyn Error>> {
    match node {
        TreeNode::Leaf { label } => Ok(*label),
        TreeNode::Split {
            feature_index,
            default_label,
            branches,
            ..
        } => {
            let value = features.as_slice().get(*feature_index).ok_or_else(|| {
                format!(
                    "Attribute {} is missing from a record with {} features.",
                    feature_index,
                    features.len()
                )
            })?;
            match branches.get(value) {
                Some(child) => make_prediction(features, child),
                None => Ok(*default_label),
            }
        }
    }
}

/// Decision Tree Classifier
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<XT: Categorical> {
    root: Option<TreeNode<XT>>,
    tree_params: TreeParams,
}

impl<XT: Categorical> Default for DecisionTreeClassifier<XT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<XT: Categorical> ClassificationMetrics for DecisionTreeClassifier<XT> {}

impl<XT: Categorical> DecisionTreeClassifier<XT> {
    /// Creates a new classifier with a significance threshold of 0.05.
    pub fn new() -> Self {
        Self {
            root: None,
            tree_params: TreeParams::new(),
        }
    }

    /// Creates a new classifier with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `significance` is not in (0, 1).
    pub fn with_params(significance: Option<f64>) -> Result<Self, Box<dyn Error>> {
        let mut tree = Self::new();
        if let Some(significance) = significance {
            tree.set_significance(significance)?;
        }
        Ok(tree)
    }

    pub fn set_significance(&mut self, significance: f64) -> Result<(), Box<dyn Error>> {
        self.tree_params.set_significance(significance)
    }

    pub fn significance(&self) -> f64 {
        self.tree_params.significance()
    }

    pub fn root(&self) -> Option<&TreeNode<XT>> {
        self.root.as_ref()
    }

    /// Builds the tree from every record of `dataset`.
    ///
    /// # Returns
    ///
    /// A status message with the size of the tree.
    pub fn fit(
        &mut self,
        dataset: &Dataset<XT>,
        feature_names: &[String],
    ) -> Result<String, Box<dyn Error>> {
        let examples = dataset.records().iter().collect::<Vec<_>>();
        let root = induce(&examples, feature_names, &BTreeSet::new(), self.significance())?;
        let message = format!(
            "Finished building the tree with {} nodes.",
            root.node_count()
        );
        self.root = Some(root);
        Ok(message)
    }

    pub fn predict_record(&self, record: &Record<XT>) -> Result<Label, Box<dyn Error>> {
        let root = self.root.as_ref().ok_or("Tree wasn't built yet.")?;
        predict(record, root)
    }

    pub fn predict_dataset(&self, dataset: &Dataset<XT>) -> Result<DVector<Label>, Box<dyn Error>> {
        let root = self.root.as_ref().ok_or("Tree wasn't built yet.")?;
        let predictions = dataset
            .records()
            .iter()
            .map(|record| predict(record, root))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DVector::from_vec(predictions))
    }

    /// Predicts a label for every row of `features`.
    pub fn predict(&self, features: &DMatrix<XT>) -> Result<DVector<Label>, Box<dyn Error>> {
        let root = self.root.as_ref().ok_or("Tree wasn't built yet.")?;
        let predictions = features
            .row_iter()
            .map(|row| make_prediction(&row.transpose(), root))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DVector::from_vec(predictions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: u8, features: &[u32]) -> Record<u32> {
        Record::from_slice(label, features).unwrap()
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    // Root split on attribute 0, then both branches split on attribute 1.
    fn nested() -> Vec<Record<u32>> {
        let mut records = Vec::new();
        records.extend((0..4).map(|_| record(1, &[0, 0])));
        records.extend((0..2).map(|_| record(0, &[0, 1])));
        records.extend((0..4).map(|_| record(0, &[1, 0])));
        records.push(record(1, &[1, 1]));
        records
    }

    fn grow_tree(records: &[Record<u32>], names: &[String], significance: f64) -> TreeNode<u32> {
        let examples = records.iter().collect::<Vec<_>>();
        induce(&examples, names, &BTreeSet::new(), significance).unwrap()
    }

    #[test]
    fn test_single_binary_attribute() {
        let records = vec![
            record(1, &[0]),
            record(1, &[0]),
            record(0, &[1]),
            record(0, &[1]),
        ];
        let tree = grow_tree(&records, &names(&["a"]), 0.5);

        let expected = TreeNode::Split {
            feature_index: 0,
            feature_name: "a".to_string(),
            default_label: 1,
            branches: BTreeMap::from([(0, TreeNode::leaf(1)), (1, TreeNode::leaf(0))]),
        };
        assert_eq!(tree, expected);
        assert_eq!(predict(&record(0, &[0]), &tree).unwrap(), 1);
        assert_eq!(predict(&record(1, &[1]), &tree).unwrap(), 0);
    }

    #[test]
    fn test_pure_examples_give_leaf() {
        let positives = vec![record(1, &[0, 1]), record(1, &[1, 0]), record(1, &[2, 2])];
        let negatives = vec![record(0, &[0, 1]), record(0, &[1, 0])];
        for significance in [0.001, 0.05, 0.5, 0.99] {
            let tree = grow_tree(&positives, &names(&["a", "b"]), significance);
            assert_eq!(tree, TreeNode::leaf(1));
            let tree = grow_tree(&negatives, &names(&["a", "b"]), significance);
            assert_eq!(tree, TreeNode::leaf(0));
        }
    }

    #[test]
    fn test_no_attribute_left_ties_to_positive() {
        let records = vec![record(1, &[0]), record(0, &[1]), record(1, &[0]), record(0, &[1])];
        let examples = records.iter().collect::<Vec<_>>();
        let tree = induce(&examples, &names(&["a"]), &BTreeSet::from([0]), 0.5).unwrap();
        assert_eq!(tree, TreeNode::leaf(1));
    }

    #[test]
    fn test_insignificant_split_is_pruned() {
        let records = vec![record(1, &[0]), record(0, &[0]), record(1, &[1]), record(0, &[1])];
        let tree = grow_tree(&records, &names(&["a"]), 0.5);
        assert_eq!(tree, TreeNode::leaf(1));
    }

    #[test]
    fn test_single_value_attribute_is_pruned() {
        let records = vec![record(1, &[3]), record(0, &[3]), record(0, &[3])];
        let tree = grow_tree(&records, &names(&["a"]), 0.99);
        assert_eq!(tree, TreeNode::leaf(0));
    }

    #[test]
    fn test_ties_pick_lowest_index() {
        let records = vec![
            record(1, &[0, 0]),
            record(1, &[0, 0]),
            record(0, &[1, 1]),
            record(0, &[1, 1]),
        ];
        let tree = grow_tree(&records, &names(&["a", "b"]), 0.5);
        match tree {
            TreeNode::Split {
                feature_index,
                feature_name,
                ..
            } => {
                assert_eq!(feature_index, 0);
                assert_eq!(feature_name, "a");
            }
            TreeNode::Leaf { .. } => panic!("expected a split"),
        }
    }

    #[test]
    fn test_sibling_branches_reuse_attribute() {
        let tree = grow_tree(&nested(), &names(&["a", "b"]), 0.5);

        let expected = TreeNode::Split {
            feature_index: 0,
            feature_name: "a".to_string(),
            default_label: 0,
            branches: BTreeMap::from([
                (
                    0,
                    TreeNode::Split {
                        feature_index: 1,
                        feature_name: "b".to_string(),
                        default_label: 1,
                        branches: BTreeMap::from([
                            (0, TreeNode::leaf(1)),
                            (1, TreeNode::leaf(0)),
                        ]),
                    },
                ),
                (
                    1,
                    TreeNode::Split {
                        feature_index: 1,
                        feature_name: "b".to_string(),
                        default_label: 0,
                        branches: BTreeMap::from([
                            (0, TreeNode::leaf(0)),
                            (1, TreeNode::leaf(1)),
                        ]),
                    },
                ),
            ]),
        };
        assert_eq!(tree, expected);
        assert_eq!(tree.node_count(), 7);
    }

    #[test]
    fn test_unseen_value_uses_default_label() {
        let tree = grow_tree(&nested(), &names(&["a", "b"]), 0.5);
        assert_eq!(predict(&record(1, &[5, 0]), &tree).unwrap(), 0);
        assert_eq!(predict(&record(0, &[0, 7]), &tree).unwrap(), 1);
        assert_eq!(predict(&record(0, &[1, 1]), &tree).unwrap(), 1);
    }

    #[test]
    fn test_relaxed_threshold_grows_tree() {
        let records = nested();
        let counts = [0.001, 0.05, 0.5, 0.9]
            .iter()
            .map(|&significance| {
                grow_tree(&records, &names(&["a", "b"]), significance).node_count()
            })
            .collect::<Vec<_>>();

        assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(counts[0], 1);
        assert_eq!(counts[2], 7);
    }

    #[test]
    fn test_predictions_are_binary() {
        let records = nested();
        let tree = grow_tree(&records, &names(&["a", "b"]), 0.5);
        for a in 0..3 {
            for b in 0..3 {
                let label = predict(&record(0, &[a, b]), &tree).unwrap();
                assert!(label == 0 || label == 1);
            }
        }
    }

    #[test]
    fn test_induce_rejects_bad_input() {
        let records = vec![record(1, &[0]), record(0, &[1])];
        let examples = records.iter().collect::<Vec<_>>();
        let empty: Vec<&Record<u32>> = Vec::new();

        assert!(induce(&empty, &names(&["a"]), &BTreeSet::new(), 0.5).is_err());
        assert!(induce(&examples, &names(&["a", "b"]), &BTreeSet::new(), 0.5).is_err());
        assert!(induce(&examples, &names(&["a"]), &BTreeSet::from([3]), 0.5).is_err());
        assert!(induce(&examples, &names(&["a"]), &BTreeSet::new(), 1.0).is_err());
        assert!(induce(&examples, &names(&["a"]), &BTreeSet::new(), 0.0).is_err());
    }

    #[test]
    fn test_predict_short_record() {
        let records = vec![record(1, &[0]), record(1, &[0]), record(0, &[1]), record(0, &[1])];
        let tree = grow_tree(&records, &names(&["a"]), 0.5);
        let short = Record::<u32>::from_slice(1, &[]).unwrap();
        assert!(predict(&short, &tree).is_err());
    }

    #[test]
    fn test_classifier_fit_and_predict() {
        let dataset = Dataset::from_records(nested()).unwrap();
        let mut classifier = DecisionTreeClassifier::with_params(Some(0.5)).unwrap();
        assert!(classifier.predict(&DMatrix::from_row_slice(1, 2, &[0u32, 0])).is_err());

        classifier.fit(&dataset, &names(&["a", "b"])).unwrap();
        assert_eq!(classifier.root().unwrap().node_count(), 7);

        let x = DMatrix::from_row_slice(4, 2, &[0u32, 0, 0, 1, 1, 0, 1, 1]);
        let predictions = classifier.predict(&x).unwrap();
        assert_eq!(predictions, DVector::from_vec(vec![1, 0, 0, 1]));
        assert_eq!(classifier.predict_record(&record(0, &[1, 1])).unwrap(), 1);

        let fitted = classifier.predict_dataset(&dataset).unwrap();
        assert_eq!(classifier.accuracy(&dataset.labels(), &fitted).unwrap(), 1.0);
    }

    #[test]
    fn test_classifier_with_params() {
        assert!(DecisionTreeClassifier::<u32>::with_params(Some(1.2)).is_err());
        let classifier = DecisionTreeClassifier::<u32>::with_params(None).unwrap();
        assert_eq!(classifier.significance(), 0.05);
    }
}
