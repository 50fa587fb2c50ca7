use std::error::Error;

use crate::trees::params::TreeParams;

#[derive(Clone, Debug)]
pub struct BaggingParams {
    num_trees: usize,
    tree_params: TreeParams,
}

impl Default for BaggingParams {
    fn default() -> Self {
        Self::new()
    }
}

impl BaggingParams {
    pub fn new() -> Self {
        Self {
            num_trees: 10,
            tree_params: TreeParams::new(),
        }
    }

    /// Sets the number of bootstrap samples, one tree per sample.
    pub fn set_num_trees(&mut self, num_trees: usize) -> Result<(), Box<dyn Error>> {
        if num_trees < 1 {
            return Err("The number of trees must be greater than 0.".into());
        }
        self.num_trees = num_trees;
        Ok(())
    }

    pub fn set_significance(&mut self, significance: f64) -> Result<(), Box<dyn Error>> {
        self.tree_params.set_significance(significance)
    }

    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    pub fn significance(&self) -> f64 {
        self.tree_params.significance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = BaggingParams::default();
        assert_eq!(params.num_trees(), 10);
        assert_eq!(params.significance(), 0.05);
    }

    #[test]
    fn test_setters_validate() {
        let mut params = BaggingParams::new();
        assert!(params.set_num_trees(0).is_err());
        assert!(params.set_num_trees(1).is_ok());
        assert!(params.set_significance(1.0).is_err());
        assert!(params.set_significance(0.2).is_ok());
        assert_eq!(params.num_trees(), 1);
        assert_eq!(params.significance(), 0.2);
    }
}
