use crate::data::dataset::{Categorical, Label};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Decision tree node
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode<XT: Categorical> {
    /// Terminal decision.
    Leaf { label: Label },
    /// Test on one attribute, with one child per value observed during training.
    /// `default_label` answers values that have no branch.
    Split {
        feature_index: usize,
        feature_name: String,
        default_label: Label,
        branches: BTreeMap<XT, TreeNode<XT>>,
    },
}

impl<XT: Categorical> TreeNode<XT> {
    pub fn leaf(label: Label) -> Self {
        Self::Leaf { label }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Total number of nodes in the subtree rooted here.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { branches, .. } => {
                1 + branches.values().map(TreeNode::node_count).sum::<usize>()
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { branches, .. } => branches.values().map(TreeNode::leaf_count).sum(),
        }
    }

    /// Number of splits on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Split { branches, .. } => {
                1 + branches.values().map(TreeNode::depth).max().unwrap_or(0)
            }
        }
    }

    fn render(&self, f: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Self::Leaf { label } => writeln!(f, "{:indent$}-> {}", "", label, indent = indent),
            Self::Split {
                feature_name,
                default_label,
                branches,
                ..
            } => {
                writeln!(
                    f,
                    "{:indent$}[{}] default -> {}",
                    "",
                    feature_name,
                    default_label,
                    indent = indent
                )?;
                for (value, child) in branches {
                    writeln!(
                        f,
                        "{:indent$}{} = {}:",
                        "",
                        feature_name,
                        value,
                        indent = indent + 2
                    )?;
                    child.render(f, indent + 4)?;
                }
                Ok(())
            }
        }
    }
}

impl<XT: Categorical> Display for TreeNode<XT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
