use crate::domain::model::GraphType;
use crate::domain::ports::{DecodedObject, Drawable};
use crate::models::tree::DecisionTree;
use crate::utils::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 先經過前處理過濾器再訓練的決策樹
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredModel {
    pub filter: String,
    pub model: DecisionTree,
}

impl FilteredModel {
    pub fn new(filter: impl Into<String>, model: DecisionTree) -> Self {
        Self {
            filter: filter.into(),
            model,
        }
    }
}

impl fmt::Display for FilteredModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "FilteredModel using {} on data filtered through {}",
            self.model.simple_type_name(),
            self.filter
        )?;
        writeln!(f)?;
        writeln!(f, "Classifier Model")?;
        write!(f, "{}", self.model)
    }
}

impl Drawable for FilteredModel {
    // 能否繪圖取決於內部模型，而非包裝型別本身
    fn graph_type(&self) -> GraphType {
        if self.model.is_built() {
            self.model.graph_type()
        } else {
            GraphType::NotDrawable
        }
    }

    fn graph(&self) -> Result<String, GraphError> {
        self.model.graph()
    }
}

impl DecodedObject for FilteredModel {
    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }
}
