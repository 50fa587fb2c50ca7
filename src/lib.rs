//! # Rusty-id3
//!
//! `rusty-id3` grows decision trees over categorical attributes and combines them into bagging
//! ensembles. Splits are chosen by information gain and kept only when a chi-square test finds
//! the dependence between attribute value and label significant.
//!
//! ## Getting Started
//!
//! To use `rusty-id3`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-id3 = "*"
//! ```
//!
//! ## Example Usage
//!
//! Training a single tree and a bagging ensemble on a tiny dataset:
//!
//! ```rust
//! use rusty_id3::data::dataset::Dataset;
//! use rusty_id3::forests::classifier::BaggingClassifier;
//! use rusty_id3::trees::classifier::DecisionTreeClassifier;
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_row_slice(4, 1, &[0u32, 0, 1, 1]);
//! let y = DVector::from_vec(vec![1, 1, 0, 0]);
//! let dataset = Dataset::new(x, y).unwrap();
//! let names = vec!["color".to_string()];
//!
//! let mut tree = DecisionTreeClassifier::with_params(Some(0.5)).unwrap();
//! tree.fit(&dataset, &names).unwrap();
//!
//! let test_x = DMatrix::from_row_slice(2, 1, &[0u32, 1]);
//! assert_eq!(tree.predict(&test_x).unwrap(), DVector::from_vec(vec![1, 0]));
//!
//! let mut bagging = BaggingClassifier::with_params(Some(5), Some(0.5)).unwrap();
//! bagging.fit(&dataset, &names, Some(7)).unwrap();
//! assert_eq!(bagging.trees().len(), 5);
//! ```

/// Records, datasets and readers
pub mod data;
/// Bagging ensembles
pub mod forests;
/// Functions for evaluating model performance
pub mod metrics;
/// Chi-square distribution
pub mod stats;
/// Decision trees
pub mod trees;
