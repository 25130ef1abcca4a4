// Built-in model types the default type registry can decode.

pub mod filtered;
pub mod header;
pub mod linear;
pub mod tree;

pub use filtered::FilteredModel;
pub use header::{Attribute, AttributeKind, DatasetHeader};
pub use linear::LinearRegression;
pub use tree::{Branch, DecisionTree, TreeNode};
