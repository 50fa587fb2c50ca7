//! Bagging ensemble of chi-square pruned decision trees.
use std::collections::BTreeSet;
use std::error::Error;

use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use super::params::BaggingParams;
use crate::{
    data::dataset::{Categorical, Dataset, Label, Record},
    metrics::confusion::ClassificationMetrics,
    trees::{
        classifier::{induce, majority_label, predict},
        node::TreeNode,
    },
};

/// Induces `sample_count` trees, each on its own bootstrap sample of `training_set`.
///
/// Every tree gets a seed drawn from one master generator, so a fixed `seed` reproduces the
/// whole ensemble even though the trees are grown in parallel.
pub fn build_ensemble<XT: Categorical>(
    training_set: &Dataset<XT>,
    feature_names: &[String],
    sample_count: usize,
    significance: f64,
    seed: Option<u64>,
) -> Result<Vec<TreeNode<XT>>, Box<dyn Error>> {
    if sample_count < 1 {
        return Err("The number of trees must be greater than 0.".into());
    }
    if training_set.is_empty() {
        return Err("Cannot build an ensemble from an empty training set.".into());
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        _ => StdRng::from_entropy(),
    };
    let seeds = (0..sample_count)
        .map(|_| rng.gen::<u64>())
        .collect::<Vec<_>>();

    let trees: Result<Vec<_>, String> = seeds
        .into_par_iter()
        .map(|tree_seed| {
            let sample = training_set.samples(training_set.len(), Some(tree_seed));
            let examples = sample.records().iter().collect::<Vec<_>>();
            induce(&examples, feature_names, &BTreeSet::new(), significance)
                .map_err(|error| error.to_string())
        })
        .collect();

    Ok(trees?)
}

/// Majority vote of every tree in `ensemble`; ties go to the positive class.
pub fn classify<XT: Categorical>(
    record: &Record<XT>,
    ensemble: &[TreeNode<XT>],
) -> Result<Label, Box<dyn Error>> {
    if ensemble.is_empty() {
        return Err("Cannot classify with an empty ensemble.".into());
    }
    let mut positive = 0;
    for tree in ensemble {
        if predict(record, tree)? == 1 {
            positive += 1;
        }
    }
    Ok(majority_label(positive, ensemble.len()))
}

/// Bagging classifier
#[derive(Clone, Debug)]
pub struct BaggingClassifier<XT: Categorical> {
    trees: Vec<TreeNode<XT>>,
    params: BaggingParams,
}

impl<XT: Categorical> Default for BaggingClassifier<XT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<XT: Categorical> ClassificationMetrics for BaggingClassifier<XT> {}

impl<XT: Categorical> BaggingClassifier<XT> {
    pub fn new() -> Self {
        Self {
            trees: Vec::new(),
            params: BaggingParams::new(),
        }
    }

    /// Creates a new classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `num_trees` - Number of bootstrap samples, and therefore trees.
    /// * `significance` - Chi-square pruning threshold for every tree.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_trees` is 0 or `significance` is not in (0, 1).
    pub fn with_params(
        num_trees: Option<usize>,
        significance: Option<f64>,
    ) -> Result<Self, Box<dyn Error>> {
        let mut bagging = Self::new();
        if let Some(num_trees) = num_trees {
            bagging.set_num_trees(num_trees)?;
        }
        if let Some(significance) = significance {
            bagging.set_significance(significance)?;
        }
        Ok(bagging)
    }

    pub fn set_num_trees(&mut self, num_trees: usize) -> Result<(), Box<dyn Error>> {
        self.params.set_num_trees(num_trees)
    }

    pub fn set_significance(&mut self, significance: f64) -> Result<(), Box<dyn Error>> {
        self.params.set_significance(significance)
    }

    pub fn num_trees(&self) -> usize {
        self.params.num_trees()
    }

    pub fn significance(&self) -> f64 {
        self.params.significance()
    }

    pub fn trees(&self) -> &[TreeNode<XT>] {
        &self.trees
    }

    pub fn fit(
        &mut self,
        dataset: &Dataset<XT>,
        feature_names: &[String],
        seed: Option<u64>,
    ) -> Result<String, Box<dyn Error>> {
        self.trees = build_ensemble(
            dataset,
            feature_names,
            self.num_trees(),
            self.significance(),
            seed,
        )?;
        Ok(format!("Finished building {} trees.", self.trees.len()))
    }

    pub fn classify(&self, record: &Record<XT>) -> Result<Label, Box<dyn Error>> {
        if self.trees.is_empty() {
            return Err("Ensemble wasn't built yet.".into());
        }
        classify(record, &self.trees)
    }

    pub fn predict_dataset(&self, dataset: &Dataset<XT>) -> Result<DVector<Label>, Box<dyn Error>> {
        let predictions = dataset
            .records()
            .iter()
            .map(|record| self.classify(record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DVector::from_vec(predictions))
    }

    /// Predicts a label for every row of `features`.
    pub fn predict(&self, features: &DMatrix<XT>) -> Result<DVector<Label>, Box<dyn Error>> {
        let mut predictions = DVector::from_element(features.nrows(), 0);

        for (i, row) in features.row_iter().enumerate() {
            // Queries carry no label; 0 is a placeholder the trees never read.
            let record = Record::new(0, row.transpose())?;
            predictions[i] = self.classify(&record)?;
        }
        Ok(predictions)
    }
}
